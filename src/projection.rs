//! This module builds the gnomonic (TAN) projection described by a set of
//! WCS cards.
//!
//! Only the TAN projection is needed here: the footprint grid and the
//! reprojection grids are all tangent-plane grids.

use std::f64::consts::FRAC_PI_2;

use mapproj::{
    img2celestial::Img2Celestial, img2proj::WcsImgXY2ProjXY, zenithal::tan::Tan,
    CanonicalProjection, CenteredProjection,
};

use crate::{error::Error, params::WCSParams, utils, ImgXY, LonLat};

/// Image <-> sphere mapping of a TAN grid.
///
/// Pixel coordinates are 0-based: the FITS reference pixel `CRPIXi` lands on
/// `CRPIXi - 1`.
pub struct TanProjection {
    img2lonlat: Img2Celestial<Tan, WcsImgXY2ProjXY>,
    /// tangent point
    crval: LonLat,
}

impl TanProjection {
    pub fn new(params: &WCSParams) -> Result<Self, Error> {
        let proj_name = params.proj_name();
        if proj_name != "TAN" {
            return Err(Error::NotImplementedProjection(proj_name.to_string()));
        }

        let cdelt_ok = |c: f64| c.is_finite() && c != 0.0;
        if !cdelt_ok(params.cdelt1) || !cdelt_ok(params.cdelt2) {
            return Err(Error::InitProjection(Tan::NAME, "CDELTi must be finite and non zero"));
        }
        if !params.crval2.is_finite() || params.crval2.abs() > 90.0 {
            return Err(Error::InitProjection(Tan::NAME, "CRVAL2 must lie in [-90, 90]"));
        }

        let crval = LonLat::new(params.crval1.to_radians(), params.crval2.to_radians());
        let mut proj = CenteredProjection::new(Tan::new());
        proj.set_proj_center_from_lonlat(&crval);

        let img2proj = WcsImgXY2ProjXY::from_cr(
            params.crpix1,
            params.crpix2,
            params.crota2.unwrap_or(0.0),
            params.cdelt1,
            params.cdelt2,
        );

        Ok(TanProjection {
            img2lonlat: Img2Celestial::new(img2proj, proj),
            crval,
        })
    }

    /// Project a (lon, lat) sphere position, given in radians, onto the image.
    ///
    /// Positions on the far hemisphere, 90 degrees or more from the tangent
    /// point, have no image and give `None`.
    pub fn proj(&self, lonlat: &LonLat) -> Option<ImgXY> {
        if utils::angular_dist(&self.crval, lonlat) >= FRAC_PI_2 {
            return None;
        }

        self.img2lonlat
            .lonlat2img(lonlat)
            .map(|xy| ImgXY::new(xy.x() - 1.0, xy.y() - 1.0))
    }

    /// Unproject a 0-based (X, Y) pixel to get its (lon, lat) in radians
    #[cfg(test)]
    pub fn unproj(&self, img_pos: &ImgXY) -> Option<LonLat> {
        let img_pos = ImgXY::new(img_pos.x() + 1.0, img_pos.y() + 1.0);
        self.img2lonlat.img2lonlat(&img_pos)
    }
}
