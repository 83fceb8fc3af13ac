//! Reading of the polygon held by a DS9 region file
//!
//! Only what the footprint outline needs is understood: comment and `global`
//! lines, a coordinate frame keyword, and a `polygon(...)` shape. Statements
//! may be separated by newlines or `;`. The first shape of the file is the
//! one returned and it must be a polygon.

use crate::coo_system::CooSystem;
use crate::error::Error;
use crate::position::SkyPosition;

/// A polygon read from a region file, vertices in ICRS degrees
#[derive(Debug, Clone)]
pub struct PolygonRegion {
    pub frame: CooSystem,
    pub vertices: Vec<SkyPosition>,
}

pub fn parse_polygon(src: &str) -> Result<PolygonRegion, Error> {
    let mut frame = None;

    let statements = src
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("global"))
        .flat_map(|l| l.split(';'))
        // strip trailing comments, e.g. `polygon(...) # color=red`
        .map(|s| s.split('#').next().unwrap_or("").trim())
        .filter(|s| !s.is_empty());

    for stmt in statements {
        if let Some(coo) = CooSystem::parse(stmt) {
            frame = Some(coo);
            continue;
        }

        let shape = stmt.trim_start_matches('+');
        if shape.starts_with('-') {
            return Err(Error::FootprintLoad(format!(
                "excluded region '{}' cannot describe a footprint",
                stmt
            )));
        }
        let Some(args) = shape
            .strip_prefix("polygon")
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix('('))
        else {
            return Err(Error::FootprintLoad(format!(
                "expected a polygon region, found '{}'",
                stmt
            )));
        };
        let Some((args, _)) = args.split_once(')') else {
            return Err(Error::FootprintLoad("unterminated polygon".to_owned()));
        };

        let frame = frame.ok_or_else(|| {
            Error::FootprintLoad("no coordinate frame declared before the polygon".to_owned())
        })?;
        if !frame.is_equatorial_j2000() {
            return Err(Error::FootprintLoad(format!(
                "unsupported region frame {:?}, expected icrs or fk5",
                frame
            )));
        }

        let vertices = parse_vertices(args)?;
        log::debug!("Read a polygon of {} vertices in frame {:?}", vertices.len(), frame);
        return Ok(PolygonRegion { frame, vertices });
    }

    Err(Error::FootprintLoad("no polygon found".to_owned()))
}

fn parse_vertices(args: &str) -> Result<Vec<SkyPosition>, Error> {
    let coords = args.split(',').map(str::trim).collect::<Vec<_>>();
    if coords.len() % 2 != 0 {
        return Err(Error::FootprintLoad(format!(
            "polygon has an odd number of coordinates ({})",
            coords.len()
        )));
    }
    if coords.len() < 6 {
        return Err(Error::FootprintLoad(
            "polygon needs at least three vertices".to_owned(),
        ));
    }

    coords
        .chunks_exact(2)
        .map(|c| {
            SkyPosition::parse(c[0], c[1])
                .map_err(|e| Error::FootprintLoad(format!("bad polygon vertex: {}", e)))
        })
        .collect()
}
