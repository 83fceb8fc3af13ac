//! The COSMOS-Web survey footprint
//!
//! The outline is a polygon given on the sky. Membership is decided in the
//! pixel space of a fixed 180 mas TAN grid (see [`WCSParams::footprint`]):
//! each vertex and each tested position is projected onto that grid before
//! an even-odd point-in-polygon test. Points lying on an edge, within
//! [`EDGE_TOLERANCE`] pixel, are inside.

use std::path::Path;

use crate::error::Error;
use crate::params::WCSParams;
use crate::position::SkyPosition;
use crate::projection::TanProjection;
use crate::region::{self, PolygonRegion};

/// Outline of the NIRCam long wavelength mosaic, bundled in the crate
pub const COSMOS_WEB_OUTLINE: &str = include_str!("../data/lw_outline.reg");

/// Distance to an edge, in pixels, under which a point counts as on the edge
pub const EDGE_TOLERANCE: f64 = 1e-9;

lazy_static::lazy_static! {
    static ref COSMOS_WEB: Result<Footprint, String> = {
        let footprint = Footprint::from_region_str(COSMOS_WEB_OUTLINE);
        match footprint {
            Ok(f) => {
                log::info!("Loaded the COSMOS-Web footprint ({} vertices)", f.vertices.len());
                Ok(f)
            }
            Err(Error::FootprintLoad(msg)) => Err(msg),
            Err(e) => Err(e.to_string()),
        }
    };
}

pub struct Footprint {
    proj: TanProjection,
    /// polygon vertices in 0-based pixel coordinates of the grid
    vertices: Vec<(f64, f64)>,
}

impl Footprint {
    /// The bundled COSMOS-Web footprint.
    ///
    /// Parsed and projected on first use, then shared for the lifetime of the
    /// process. A load failure is kept as well and returned on every call.
    pub fn cosmos_web() -> Result<&'static Footprint, Error> {
        COSMOS_WEB
            .as_ref()
            .map_err(|msg| Error::FootprintLoad(msg.clone()))
    }

    pub fn from_region(region: &PolygonRegion) -> Result<Self, Error> {
        let proj = TanProjection::new(&WCSParams::footprint())?;

        let vertices = region
            .vertices
            .iter()
            .map(|v| {
                proj.proj(&v.to_lonlat())
                    .map(|xy| (xy.x(), xy.y()))
                    .ok_or_else(|| {
                        Error::FootprintLoad(format!(
                            "vertex ({}, {}) cannot be projected onto the footprint grid",
                            v.ra(),
                            v.dec()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Footprint { proj, vertices })
    }

    /// Read the footprint from the content of a DS9 region file
    pub fn from_region_str(src: &str) -> Result<Self, Error> {
        let region = region::parse_polygon(src)?;
        Self::from_region(&region)
    }

    /// Read the footprint from a DS9 region file
    pub fn from_region_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| Error::FootprintLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_region_str(&src)
    }

    /// Polygon vertices in pixel coordinates of the footprint grid
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Whether `pos` falls within the footprint
    pub fn contains(&self, pos: &SkyPosition) -> bool {
        match self.proj.proj(&pos.to_lonlat()) {
            Some(xy) => self.contains_xy(xy.x(), xy.y()),
            None => false,
        }
    }

    /// Whether the pixel (x, y) of the footprint grid falls within the polygon
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        let mut inside = false;

        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];

            if on_segment(a, b, (x, y)) {
                return true;
            }

            if (a.1 > y) != (b.1 > y) {
                let x_cross = a.0 + (y - a.1) * (b.0 - a.0) / (b.1 - a.1);
                if x < x_cross {
                    inside = !inside;
                }
            }
        }

        inside
    }
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len = abx.hypot(aby);

    if len == 0.0 {
        return apx.hypot(apy) <= EDGE_TOLERANCE;
    }

    let dist = (abx * apy - aby * apx).abs() / len;
    let along = (abx * apx + aby * apy) / len;
    dist <= EDGE_TOLERANCE && along >= -EDGE_TOLERANCE && along <= len + EDGE_TOLERANCE
}
