//! Tile lookup and cutouts for the COSMOS-Web survey
//!
//! The COSMOS-Web mosaics are split into 20 tiles. This crate tells which
//! tile a sky position falls in, whether it lies inside the survey footprint
//! at all, and drives the extraction of cutouts from the hosted mosaics.
//!
//! ```no_run
//! use cosmosweb::{SkyPosition, TileLocator};
//!
//! let locator = TileLocator::new()?;
//! let pos = SkyPosition::parse("10h00m26.358s", "+02d15m26.923s")?;
//! assert_eq!(locator.resolve_tile(&pos).map(|t| t.as_str()), Some("B8"));
//! # Ok::<(), cosmosweb::Error>(())
//! ```

extern crate mapproj;
#[macro_use]
extern crate quick_error;

#[cfg(test)]
macro_rules! assert_delta {
    ($x:expr, $y:expr, $d:expr) => {
        if ($x - $y).abs() > $d {
            panic!("{} != {} (delta {})", $x, $y, $d);
        }
    };
}

pub mod band;
pub mod coo_system;
pub mod credentials;
pub mod cutout;
mod error;
pub mod footprint;
pub mod locator;
pub mod params;
pub mod position;
mod projection;
pub mod region;
pub mod tiles;
mod utils;

pub use band::{Band, Extension, Mosaic};
pub use credentials::Credentials;
pub use cutout::{CutoutFetcher, CutoutOptions, CutoutSize, MosaicSource};
pub use error::Error;
pub use footprint::Footprint;
pub use locator::TileLocator;
pub use params::WCSParams;
pub use position::SkyPosition;
pub use tiles::{Tile, TileId, TILES};

/// Structure alias coming from mapproj defining
/// image space pixel coordinates
pub type ImgXY = mapproj::ImgXY;
/// Structure alias coming from mapproj defining
/// longitude and latitude expressed in radians
pub type LonLat = mapproj::LonLat;

/// The tile of each of `positions` in the bundled footprint, `None` for the
/// positions lying outside of it
pub fn resolve_tiles(positions: &[SkyPosition]) -> Result<Vec<Option<TileId>>, Error> {
    Ok(TileLocator::new()?.resolve_tiles(positions))
}

/// Whether each of `positions` lies within the bundled footprint
pub fn check_in_footprint(positions: &[SkyPosition]) -> Result<Vec<bool>, Error> {
    Ok(TileLocator::new()?.check_in_footprint(positions))
}
