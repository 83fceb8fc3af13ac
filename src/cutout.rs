//! Cutouts from the hosted mosaics
//!
//! Reading the remote FITS files, resampling and writing images is done by
//! a [`MosaicSource`]. This module decides what to ask of it: which file,
//! which region, onto which grid and under which name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::band::{self, Band, Extension};
use crate::credentials::Credentials;
use crate::error::Error;
use crate::locator::TileLocator;
use crate::params::WCSParams;
use crate::position::SkyPosition;
use crate::tiles::TileId;
use crate::utils;

/// Extra margin taken around a cutout that will be reprojected
pub const REPROJECTION_PADDING: f64 = 1.2;

/// Side length of a square cutout
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CutoutSize {
    Arcsec(f64),
    Arcmin(f64),
    Deg(f64),
}

impl CutoutSize {
    pub fn to_arcsec(&self) -> f64 {
        match *self {
            CutoutSize::Arcsec(v) => v,
            CutoutSize::Arcmin(v) => v * 60.0,
            CutoutSize::Deg(v) => v * 3600.0,
        }
    }
}

impl From<f64> for CutoutSize {
    /// A bare number is in arcsec
    fn from(v: f64) -> Self {
        CutoutSize::Arcsec(v)
    }
}

impl fmt::Display for CutoutSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutoutSize::Arcsec(v) => write!(f, "{}arcsec", v),
            CutoutSize::Arcmin(v) => write!(f, "{}arcmin", v),
            CutoutSize::Deg(v) => write!(f, "{}deg", v),
        }
    }
}

const SIZE_UNITS: [(&str, fn(f64) -> CutoutSize); 5] = [
    ("arcsec", CutoutSize::Arcsec),
    ("\"", CutoutSize::Arcsec),
    ("arcmin", CutoutSize::Arcmin),
    ("'", CutoutSize::Arcmin),
    ("deg", CutoutSize::Deg),
];

/// `10`, `10arcsec`, `10"`, `0.5arcmin`, `1'`, `0.01deg`, `1e-3deg`
impl FromStr for CutoutSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let (value, unit): (&str, fn(f64) -> CutoutSize) = SIZE_UNITS
            .iter()
            .find_map(|(suffix, unit)| t.strip_suffix(suffix).map(|v| (v, *unit)))
            .unwrap_or((t, CutoutSize::Arcsec));

        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidCutoutSize(s.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidCutoutSize(s.to_string()));
        }

        Ok(unit(value))
    }
}

/// Settings of a cutout run. Every field has a default so that a partial
/// configuration deserializes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CutoutOptions {
    pub ext: Extension,
    /// Output pixel scale in arcsec. `None` keeps the native scale of the mosaic
    pub pixscale: Option<f64>,
    /// Directory the cutouts are written to. Nothing is written when `None`
    pub outdir: Option<PathBuf>,
    /// Names used in the output file names, one per position. IAU-style
    /// designations are used when `None`
    pub names: Option<Vec<String>>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub base_url: String,
}

impl Default for CutoutOptions {
    fn default() -> Self {
        CutoutOptions {
            ext: Extension::Sci,
            pixscale: None,
            outdir: None,
            names: None,
            user: None,
            password: None,
            base_url: band::DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// What is asked of a [`MosaicSource`] for one cutout
#[derive(Debug)]
pub struct CutoutRequest<'a> {
    pub url: &'a str,
    pub credentials: &'a Credentials,
    pub position: SkyPosition,
    /// side length of the region to extract, in arcsec
    pub size: f64,
}

/// Access to the remote mosaics.
///
/// Implementors read the requested sub-region of the remote file over HTTP,
/// resample images and write FITS files. Their failures are reported as
/// [`Error::Source`].
pub trait MosaicSource {
    type Cutout;

    /// Extract the square region of `request.size` arcsec centered on
    /// `request.position` from the mosaic at `request.url`
    fn extract(&self, request: &CutoutRequest<'_>) -> Result<Self::Cutout, Error>;

    /// Pixel size of the cutout, in arcsec
    fn pixel_scale(&self, cutout: &Self::Cutout) -> f64;

    /// Width of the cutout, in pixels
    fn width(&self, cutout: &Self::Cutout) -> usize;

    /// Resample the cutout onto `grid`
    fn reproject(&self, cutout: Self::Cutout, grid: &WCSParams) -> Result<Self::Cutout, Error>;

    /// Write the cutout to `path` as a FITS file, replacing any existing file
    fn write(&self, cutout: &Self::Cutout, path: &Path) -> Result<(), Error>;
}

/// A cutout along with where it comes from
#[derive(Debug)]
pub struct Cutout<C> {
    pub position: SkyPosition,
    pub tile: TileId,
    pub url: String,
    /// `[left, right, bottom, top]` in arcsec from the center, for plotting
    pub extent: [f64; 4],
    /// Where the cutout was written, if it was
    pub path: Option<PathBuf>,
    pub data: C,
}

/// `[left, right, bottom, top]` of a square image of `width` pixels of
/// `pixscale` arcsec, centered on 0
pub fn extent(width: usize, pixscale: f64) -> [f64; 4] {
    let half = width as f64 * pixscale / 2.0;
    [-half, half, -half, half]
}

/// `cutout_{name}_{band}_{ext}.fits`
pub fn output_file_name(name: &str, band: &Band, ext: Extension) -> String {
    format!("cutout_{}_{}_{}.fits", name, band, ext)
}

pub struct CutoutFetcher<'a, S> {
    source: S,
    locator: TileLocator<'a>,
    credentials: Credentials,
    options: CutoutOptions,
}

impl<S: MosaicSource> CutoutFetcher<'static, S> {
    /// A fetcher over the bundled footprint. Credentials are looked up as
    /// described in [`Credentials::resolve`].
    pub fn new(source: S, options: CutoutOptions) -> Result<Self, Error> {
        let credentials =
            Credentials::resolve(options.user.as_deref(), options.password.as_deref())?;
        Ok(CutoutFetcher {
            source,
            locator: TileLocator::new()?,
            credentials,
            options,
        })
    }
}

impl<'a, S: MosaicSource> CutoutFetcher<'a, S> {
    pub fn with_credentials(
        source: S,
        locator: TileLocator<'a>,
        credentials: Credentials,
        options: CutoutOptions,
    ) -> Self {
        CutoutFetcher {
            source,
            locator,
            credentials,
            options,
        }
    }

    pub fn options(&self) -> &CutoutOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Make a cutout of `size` around each of `positions` in `band`.
    ///
    /// Every position must lie within the footprint; this is checked, along
    /// with the options, before anything is requested from the source.
    pub fn fetch<T: Into<CutoutSize>>(
        &self,
        band: &Band,
        positions: &[SkyPosition],
        size: T,
    ) -> Result<Vec<Cutout<S::Cutout>>, Error> {
        let size = size.into();
        let size_arcsec = size.to_arcsec();
        if !size_arcsec.is_finite() || size_arcsec <= 0.0 {
            return Err(Error::InvalidCutoutSize(size.to_string()));
        }
        if !matches!(size, CutoutSize::Arcsec(_)) {
            log::debug!("Converting cutout size {} to {} arcsec", size, size_arcsec);
        }

        let opts = &self.options;
        if let Some(pixscale) = opts.pixscale {
            if !pixscale.is_finite() || pixscale <= 0.0 {
                return Err(Error::InvalidPixelScale(pixscale));
            }
        }
        if let Some(names) = &opts.names {
            if names.len() != positions.len() {
                return Err(Error::NameCountMismatch(names.len(), positions.len()));
            }
        }

        let tiles = positions
            .iter()
            .map(|p| self.locator.require_tile(p))
            .collect::<Result<Vec<_>, _>>()?;

        // cutouts to be reprojected are taken a bit larger
        let size_cut = if opts.pixscale.is_some() {
            size_arcsec * REPROJECTION_PADDING
        } else {
            size_arcsec
        };

        let mut cutouts = Vec::with_capacity(positions.len());
        for (i, (position, tile)) in positions.iter().zip(tiles).enumerate() {
            let url = band::download_url(&opts.base_url, band, &tile, opts.ext)?;
            log::info!(
                "Cutout {}/{} at ({:.6}, {:.6}) from tile {}",
                i + 1,
                positions.len(),
                position.ra(),
                position.dec(),
                tile
            );

            let request = CutoutRequest {
                url: &url,
                credentials: &self.credentials,
                position: *position,
                size: size_cut,
            };
            let mut data = self.source.extract(&request)?;

            if let Some(pixscale) = opts.pixscale {
                let native = utils::round_to(self.source.pixel_scale(&data), 2);
                if native != pixscale {
                    if pixscale < native {
                        log::warn!(
                            "Requested pixel scale {}\" is finer than the native {}\", the cutout is upsampled",
                            pixscale,
                            native
                        );
                    }
                    log::debug!(
                        "Reprojecting from {} to {} arcsec/pix",
                        self.source.pixel_scale(&data),
                        pixscale
                    );
                    let grid = WCSParams::tangent_grid(position, size_arcsec, pixscale);
                    data = self.source.reproject(data, &grid)?;
                }
            }

            let extent = extent(self.source.width(&data), self.source.pixel_scale(&data));
            cutouts.push(Cutout {
                position: *position,
                tile,
                url,
                extent,
                path: None,
                data,
            });
        }

        if let Some(outdir) = &opts.outdir {
            self.write_all(band, outdir, &mut cutouts)?;
        }

        Ok(cutouts)
    }

    fn write_all(
        &self,
        band: &Band,
        outdir: &Path,
        cutouts: &mut [Cutout<S::Cutout>],
    ) -> Result<(), Error> {
        log::info!("Writing cutouts to {}", outdir.display());
        std::fs::create_dir_all(outdir)?;

        if self.options.names.is_none() {
            log::debug!("No object names provided, using IAU-style coordinate designations");
        }

        for (i, cutout) in cutouts.iter_mut().enumerate() {
            let name = match &self.options.names {
                Some(names) => names[i].clone(),
                None => cutout.position.iau_designation(),
            };
            let path = outdir.join(output_file_name(&name, band, self.options.ext));
            self.source.write(&cutout.data, &path)?;
            cutout.path = Some(path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::tiles::TILES;

    /// Records what it is asked and hands back fake images
    #[derive(Default)]
    struct MockSource {
        native_scale: f64,
        extracted: RefCell<Vec<(String, f64)>>,
        reprojected: RefCell<Vec<WCSParams>>,
        fail_on: Option<usize>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct FakeImage {
        width: usize,
        pixscale: f64,
    }

    impl MosaicSource for MockSource {
        type Cutout = FakeImage;

        fn extract(&self, request: &CutoutRequest<'_>) -> Result<FakeImage, Error> {
            let mut extracted = self.extracted.borrow_mut();
            if Some(extracted.len()) == self.fail_on {
                return Err(Error::Source("401 Unauthorized".to_owned()));
            }
            extracted.push((request.url.to_owned(), request.size));
            Ok(FakeImage {
                width: (request.size / self.native_scale).round() as usize,
                pixscale: self.native_scale,
            })
        }

        fn pixel_scale(&self, cutout: &FakeImage) -> f64 {
            cutout.pixscale
        }

        fn width(&self, cutout: &FakeImage) -> usize {
            cutout.width
        }

        fn reproject(&self, _: FakeImage, grid: &WCSParams) -> Result<FakeImage, Error> {
            self.reprojected.borrow_mut().push(grid.clone());
            Ok(FakeImage {
                width: grid.naxis1.unwrap_or(0) as usize,
                pixscale: grid.pixel_scale(),
            })
        }

        fn write(&self, _: &FakeImage, path: &Path) -> Result<(), Error> {
            std::fs::write(path, b"SIMPLE  =                    T")?;
            Ok(())
        }
    }

    fn source(native_scale: f64) -> MockSource {
        MockSource {
            native_scale,
            ..Default::default()
        }
    }

    fn fetcher(source: MockSource, options: CutoutOptions) -> CutoutFetcher<'static, MockSource> {
        CutoutFetcher::with_credentials(
            source,
            TileLocator::new().unwrap(),
            Credentials::new("user", "pw"),
            options,
        )
    }

    fn positions() -> Vec<SkyPosition> {
        [(150.2613374, 2.3162508), (149.8540891, 2.1146467), (150.0282134, 2.5518383)]
            .into_iter()
            .map(|p| SkyPosition::try_from(p).unwrap())
            .collect()
    }

    #[test]
    fn native_scale_cutouts() {
        let band: Band = "hsc_r".parse().unwrap();
        let f = fetcher(source(0.168), CutoutOptions::default());

        let cutouts = f.fetch(&band, &positions(), 10.0).unwrap();

        let tiles = cutouts.iter().map(|c| c.tile.as_str()).collect::<Vec<_>>();
        assert_eq!(tiles, ["B9", "A1", "B1"]);

        let extracted = f.source().extracted.borrow();
        assert_eq!(extracted.len(), 3);
        assert_eq!(
            extracted[0].0,
            "https://exchg.calet.org/cosmosweb/.misc/hsc_r_sci_B9.fits"
        );
        assert!(extracted.iter().all(|(_, size)| *size == 10.0));
        assert!(f.source().reprojected.borrow().is_empty());

        // 60 pixels of 0.168"
        let half = 60.0 * 0.168 / 2.0;
        assert_eq!(cutouts[0].extent, [-half, half, -half, half]);
        assert!(cutouts.iter().all(|c| c.path.is_none()));
    }

    #[test]
    fn reprojection_pads_and_resamples() {
        let band: Band = "f444w".parse().unwrap();
        let options = CutoutOptions {
            pixscale: Some(0.03),
            ..Default::default()
        };
        let f = fetcher(source(0.06), options);

        let cutouts = f.fetch(&band, &positions()[..1], CutoutSize::Arcsec(10.0)).unwrap();

        let (url, size) = f.source().extracted.borrow()[0].clone();
        assert_eq!(url, "https://exchg.calet.org/cosmosweb/.misc/CW_f444w_60mas_tot_v8.fits");
        assert!((size - 12.0).abs() < 1e-12);

        let grids = f.source().reprojected.borrow();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].naxis1, Some(333));
        assert_eq!(grids[0].crval1, 150.2613374);
        assert!((grids[0].crpix1 - 10.0 / 0.03 / 2.0).abs() < 1e-9);

        assert!((cutouts[0].extent[1] - 333.0 * 0.03 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn matching_scale_is_not_reprojected() {
        let band: Band = "uvista_H".parse().unwrap();
        let options = CutoutOptions {
            pixscale: Some(0.15),
            ..Default::default()
        };
        let f = fetcher(source(0.150004), options);

        f.fetch(&band, &positions(), CutoutSize::Arcmin(0.1)).unwrap();

        assert!(f.source().reprojected.borrow().is_empty());
        // padded even when no resampling turns out to be needed
        assert!(f
            .source()
            .extracted
            .borrow()
            .iter()
            .all(|(_, size)| (size - 7.2).abs() < 1e-9));
    }

    #[test]
    fn requested_scale_is_not_rounded() {
        // 0.034 rounds to the native 0.03 but is still a different grid
        let band: Band = "f444w".parse().unwrap();
        let options = CutoutOptions {
            pixscale: Some(0.034),
            ..Default::default()
        };
        let f = fetcher(source(0.03), options);

        let cutouts = f.fetch(&band, &positions()[..1], 10.0).unwrap();

        let grids = f.source().reprojected.borrow();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].naxis1, Some(294));
        assert!((cutouts[0].extent[1] - 294.0 * 0.034 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn outside_footprint_fails_before_any_request() {
        let band: Band = "f277w".parse().unwrap();
        let f = fetcher(source(0.06), CutoutOptions::default());

        let mut ps = positions();
        ps.push(SkyPosition::from_degrees(0.0, 0.0).unwrap());

        assert!(matches!(f.fetch(&band, &ps, 5.0), Err(Error::OutsideFootprint(..))));
        assert!(f.source().extracted.borrow().is_empty());
    }

    #[test]
    fn invalid_options() {
        let band: Band = "f277w".parse().unwrap();

        let f = fetcher(
            source(0.06),
            CutoutOptions {
                names: Some(vec!["only_one".to_owned()]),
                ..Default::default()
            },
        );
        assert!(matches!(
            f.fetch(&band, &positions(), 5.0),
            Err(Error::NameCountMismatch(1, 3))
        ));

        let f = fetcher(
            source(0.06),
            CutoutOptions {
                pixscale: Some(-0.1),
                ..Default::default()
            },
        );
        assert!(matches!(f.fetch(&band, &positions(), 5.0), Err(Error::InvalidPixelScale(_))));

        let f = fetcher(
            source(0.06),
            CutoutOptions {
                ext: Extension::Err,
                ..Default::default()
            },
        );
        assert!(matches!(
            f.fetch(&band, &positions(), 5.0),
            Err(Error::InvalidExtension("f277w", _))
        ));

        assert!(matches!(f.fetch(&band, &positions(), 0.0), Err(Error::InvalidCutoutSize(_))));
        assert!(f.source().extracted.borrow().is_empty());
    }

    #[test]
    fn source_errors_propagate() {
        let band: Band = "f150w".parse().unwrap();
        let f = fetcher(
            MockSource {
                native_scale: 0.06,
                fail_on: Some(1),
                ..Default::default()
            },
            CutoutOptions::default(),
        );
        assert!(matches!(f.fetch(&band, &positions(), 5.0), Err(Error::Source(_))));
    }

    #[test]
    fn files_named_after_designations() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("cutouts").join("nested");
        let band: Band = "f277w".parse().unwrap();
        let f = fetcher(
            source(0.06),
            CutoutOptions {
                outdir: Some(outdir.clone()),
                ..Default::default()
            },
        );

        let cutouts = f.fetch(&band, &positions(), 10.0).unwrap();

        let expected = outdir.join("cutout_J100102.72+021858.50_f277w_sci.fits");
        assert_eq!(cutouts[0].path.as_deref(), Some(expected.as_path()));
        assert!(expected.exists());
        assert_eq!(std::fs::read_dir(&outdir).unwrap().count(), 3);
    }

    #[test]
    fn files_named_by_caller() {
        let dir = tempfile::tempdir().unwrap();
        let band: Band = "uvista_Ks".parse().unwrap();
        let f = fetcher(
            source(0.15),
            CutoutOptions {
                ext: Extension::Wht,
                outdir: Some(dir.path().to_owned()),
                names: Some(vec!["ex_A".into(), "ex_B".into(), "ex_C".into()]),
                ..Default::default()
            },
        );

        f.fetch(&band, &positions(), 10.0).unwrap();

        for name in ["ex_A", "ex_B", "ex_C"] {
            assert!(dir
                .path()
                .join(format!("cutout_{}_uvista_Ks_wht.fits", name))
                .exists());
        }
    }

    #[test]
    fn options_from_json() {
        let opts: CutoutOptions =
            serde_json::from_str(r#"{"ext": "err", "pixscale": 0.1, "outdir": "cutouts"}"#).unwrap();
        assert_eq!(opts.ext, Extension::Err);
        assert_eq!(opts.pixscale, Some(0.1));
        assert_eq!(opts.outdir, Some(PathBuf::from("cutouts")));
        assert_eq!(opts.base_url, band::DEFAULT_BASE_URL);

        assert!(serde_json::from_str::<CutoutOptions>(r#"{"ext": "bad"}"#).is_err());
        assert!(serde_json::from_str::<CutoutOptions>(r#"{"size": 3}"#).is_err());
        assert_eq!(serde_json::from_str::<CutoutOptions>("{}").unwrap(), CutoutOptions::default());
    }

    #[test]
    fn sizes() {
        assert_eq!("10".parse::<CutoutSize>().unwrap(), CutoutSize::Arcsec(10.0));
        assert_eq!("10 arcsec".parse::<CutoutSize>().unwrap(), CutoutSize::Arcsec(10.0));
        assert_eq!("5\"".parse::<CutoutSize>().unwrap(), CutoutSize::Arcsec(5.0));
        assert_eq!("0.5arcmin".parse::<CutoutSize>().unwrap().to_arcsec(), 30.0);
        assert_eq!("1'".parse::<CutoutSize>().unwrap(), CutoutSize::Arcmin(1.0));
        assert_eq!("0.01deg".parse::<CutoutSize>().unwrap().to_arcsec(), 36.0);
        assert!("ten".parse::<CutoutSize>().is_err());
        assert!("10 parsec".parse::<CutoutSize>().is_err());
        assert!("-1arcmin".parse::<CutoutSize>().is_err());
        assert!("inf".parse::<CutoutSize>().is_err());
        assert_eq!("1e-3deg".parse::<CutoutSize>().unwrap(), CutoutSize::Deg(1e-3));
        assert_eq!("2.5E1\"".parse::<CutoutSize>().unwrap(), CutoutSize::Arcsec(25.0));
        assert_eq!(CutoutSize::from(3.0).to_arcsec(), 3.0);
    }

    #[test]
    fn tiles_used_in_urls_match_the_locator() {
        let band: Band = "hsc_y".parse().unwrap();
        let f = fetcher(source(0.168), CutoutOptions::default());
        let centers = TILES.iter().map(|t| t.center()).collect::<Vec<_>>();

        let cutouts = f.fetch(&band, &centers, 2.0).unwrap();
        for (cutout, tile) in cutouts.iter().zip(TILES.iter()) {
            assert_eq!(cutout.tile, tile.id);
            assert!(cutout.url.ends_with(&format!("hsc_y_sci_{}.fits", tile.id)));
        }
    }
}
