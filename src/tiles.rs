//! The COSMOS-Web tile catalog
//!
//! The mosaic is split into 20 tiles laid out on a 5 x 4 grid, `A1`..`A10`
//! in the south and `B1`..`B10` in the north. A position belongs to the tile
//! whose center is the closest on the sky.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::position::SkyPosition;

/// Name of one of the [`TILES`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(&'static str);

impl TileId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<&str> for TileId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for TileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TILES
            .iter()
            .find(|t| t.id.0 == s)
            .map(|t| t.id)
            .ok_or_else(|| Error::UnknownTile(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub id: TileId,
    /// right ascension of the tile center, in degrees
    pub ra: f64,
    /// declination of the tile center, in degrees
    pub dec: f64,
}

impl Tile {
    pub fn center(&self) -> SkyPosition {
        SkyPosition::from_catalog(self.ra, self.dec)
    }
}

macro_rules! tile {
    ($id:literal, $ra:literal, $dec:literal) => {
        Tile {
            id: TileId($id),
            ra: $ra,
            dec: $dec,
        }
    };
}

pub const TILES: [Tile; 20] = [
    tile!("A1", 149.83060849224526, 2.2105308808257207),
    tile!("A2", 149.96618456679428, 2.1612435187006245),
    tile!("A3", 150.10175329130632, 2.111943456573772),
    tile!("A4", 150.23731326578584, 2.062631644446241),
    tile!("A5", 150.37286289023743, 2.013309032319107),
    tile!("A6", 149.7647850185184, 2.0296854374792526),
    tile!("A7", 149.9003454431693, 1.9804026753817368),
    tile!("A8", 150.03589926778474, 1.9311082632823562),
    tile!("A9", 150.17144509237895, 1.8818031511845486),
    tile!("A10", 150.30698131694916, 1.8324881890870612),
    tile!("B1", 149.96220693940455, 2.5720372673973584),
    tile!("B2", 150.09747486414722, 2.5230015052794137),
    tile!("B3", 150.23328673819674, 2.473525843055812),
    tile!("B4", 150.36919886197347, 2.423885930793452),
    tile!("B5", 150.50453028662352, 2.374833668674315),
    tile!("B6", 149.89657956583684, 2.3912872741259417),
    tile!("B7", 150.03225868964083, 2.341569861870867),
    tile!("B8", 150.16766126474636, 2.292723449827574),
    tile!("B9", 150.30327548908838, 2.2433903376662596),
    tile!("B10", 150.4387048134958, 2.1941086255207374),
];

/// The tile whose center is the closest to `pos`, whether or not `pos` lies
/// within the survey footprint.
pub fn nearest_tile(pos: &SkyPosition) -> &'static Tile {
    // the catalog is not empty
    nearest_of(&TILES, pos).unwrap_or(&TILES[0])
}

/// Brute force scan of `tiles` by great-circle separation.
///
/// On an exact tie the tile listed first wins.
fn nearest_of<'a>(tiles: &'a [Tile], pos: &SkyPosition) -> Option<&'a Tile> {
    let lonlat = pos.to_lonlat();

    let mut best: Option<(&Tile, f64)> = None;
    for tile in tiles {
        let d = lonlat.haversine_dist(&tile.center().to_lonlat());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((tile, d)),
        }
    }

    best.map(|(tile, _)| tile)
}
