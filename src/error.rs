quick_error! {
    #[derive(Debug)]
    pub enum Error {
        IoFile(err: std::io::Error) {
            from()
            display("{}", err)
        }
        /// Encountered when a sky position cannot be parsed or is out of range
        CoordinateParse(input: String, reason: &'static str) {
            display("could not parse coordinate '{}': {}", input, reason)
        }
        /// The footprint boundary could not be read or parsed
        FootprintLoad(msg: String) {
            display("footprint could not be loaded: {}", msg)
        }
        /// Encountered when the projection cannot be instantiated
        InitProjection(proj_name: &'static str, msg: &'static str) {
            display("{} init error: {}", proj_name, msg)
        }
        /// Not implemented projection error
        NotImplementedProjection(proj_name: String) {
            display("Projection '{}' has not been implemented!", proj_name)
        }
        UnknownBand(band: String) {
            display("Value of band '{}' not understood. Accepted values are: {}", band, crate::band::BAND_NAMES.join(", "))
        }
        UnknownTile(tile: String) {
            display("'{}' is not a COSMOS-Web tile", tile)
        }
        InvalidExtension(band: &'static str, ext: String) {
            display("extension '{}' is not available for band '{}'", ext, band)
        }
        /// No tile can be assigned to a position outside the survey footprint
        OutsideFootprint(ra: f64, dec: f64) {
            display("({}, {}) lies outside the COSMOS-Web footprint", ra, dec)
        }
        InvalidCutoutSize(input: String) {
            display("invalid cutout size '{}'", input)
        }
        InvalidPixelScale(pixscale: f64) {
            display("pixel scale must be a positive number of arcsec, got {}", pixscale)
        }
        NameCountMismatch(names: usize, positions: usize) {
            display("{} names were given for {} positions", names, positions)
        }
        MissingCredentials {
            display("no username/password found in arguments or environment, and no terminal to ask for them")
        }
        /// Failure reported by the remote mosaic collaborator
        Source(msg: String) {
            display("remote mosaic error: {}", msg)
        }
    }
}
