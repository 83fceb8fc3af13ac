use serde::{Deserialize, Serialize};

use crate::position::SkyPosition;

/// Celestial WCS cards of a two dimensional image.
///
/// Serializes with the FITS keyword names so that it can be merged into a
/// header by whoever writes the image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct WCSParams {
    /// size of the first axis
    pub naxis1: Option<u64>,
    /// size of the second axis
    pub naxis2: Option<u64>,

    pub ctype1: String,
    pub ctype2: String,

    /// reference pixel, 1-based
    pub crpix1: f64,
    pub crpix2: f64,
    /// celestial coordinates of the reference pixel, in degrees
    pub crval1: f64,
    pub crval2: f64,
    /// deg/px
    pub cdelt1: f64,
    pub cdelt2: f64,
    /// rotation in the pixel space, in degrees
    pub crota2: Option<f64>,
}

/// Tangent point of the grid the footprint outline is tested on
pub const FOOTPRINT_CRVAL: (f64, f64) = (150.11632752531, 2.2009681511549);
/// Pixel size of that grid, in arcsec
pub const FOOTPRINT_PIXSCALE: f64 = 180e-3;
/// Reference pixel of that grid
pub const FOOTPRINT_CRPIX: (f64, f64) = (19785.0 / 2.0, 19212.0 / 2.0);

impl WCSParams {
    /// The fixed 180 mas TAN grid centered on COSMOS used for footprint
    /// membership tests
    pub fn footprint() -> Self {
        WCSParams {
            naxis1: None,
            naxis2: None,
            ctype1: "RA---TAN".to_owned(),
            ctype2: "DEC--TAN".to_owned(),
            crpix1: FOOTPRINT_CRPIX.0,
            crpix2: FOOTPRINT_CRPIX.1,
            crval1: FOOTPRINT_CRVAL.0,
            crval2: FOOTPRINT_CRVAL.1,
            cdelt1: -FOOTPRINT_PIXSCALE / 3600.0,
            cdelt2: FOOTPRINT_PIXSCALE / 3600.0,
            crota2: None,
        }
    }

    /// A square north-up TAN grid centered on `center`
    ///
    /// # Params
    /// * `center`: position the grid is centered on
    /// * `size`: side length of the grid, in arcsec
    /// * `pixscale`: pixel size, in arcsec
    pub fn tangent_grid(center: &SkyPosition, size: f64, pixscale: f64) -> Self {
        let n = size / pixscale;
        let npix = n.round() as u64;
        WCSParams {
            naxis1: Some(npix),
            naxis2: Some(npix),
            ctype1: "RA---TAN".to_owned(),
            ctype2: "DEC--TAN".to_owned(),
            crpix1: n / 2.0,
            crpix2: n / 2.0,
            crval1: center.ra(),
            crval2: center.dec(),
            cdelt1: -pixscale / 3600.0,
            cdelt2: pixscale / 3600.0,
            crota2: None,
        }
    }

    /// Pixel scale along the second axis, in arcsec
    pub fn pixel_scale(&self) -> f64 {
        self.cdelt2.abs() * 3600.0
    }

    /// The `XXX` part of `CTYPE1`, e.g. `TAN` for `RA---TAN`
    pub fn proj_name(&self) -> &str {
        self.ctype1.get(5..8).unwrap_or("")
    }
}
