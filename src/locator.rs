use crate::error::Error;
use crate::footprint::Footprint;
use crate::position::SkyPosition;
use crate::tiles::{self, TileId};

/// Assigns sky positions to COSMOS-Web tiles.
///
/// A position gets the tile with the nearest center, but only if it lies
/// within the footprint. Nearest-center matching and footprint membership
/// are independent tests and both must pass.
#[derive(Clone, Copy)]
pub struct TileLocator<'a> {
    footprint: &'a Footprint,
}

impl TileLocator<'static> {
    /// A locator over the bundled COSMOS-Web footprint
    pub fn new() -> Result<Self, Error> {
        Ok(TileLocator {
            footprint: Footprint::cosmos_web()?,
        })
    }
}

impl<'a> TileLocator<'a> {
    pub fn with_footprint(footprint: &'a Footprint) -> Self {
        TileLocator { footprint }
    }

    pub fn footprint(&self) -> &'a Footprint {
        self.footprint
    }

    /// Whether `pos` falls within the footprint
    pub fn contains(&self, pos: &SkyPosition) -> bool {
        self.footprint.contains(pos)
    }

    /// The tile of `pos`, `None` outside the footprint
    pub fn resolve_tile(&self, pos: &SkyPosition) -> Option<TileId> {
        let nearest = tiles::nearest_tile(pos);
        self.contains(pos).then_some(nearest.id)
    }

    /// The tile of each position, in the same order.
    /// Positions outside the footprint give `None`.
    pub fn resolve_tiles(&self, positions: &[SkyPosition]) -> Vec<Option<TileId>> {
        positions.iter().map(|p| self.resolve_tile(p)).collect()
    }

    /// Footprint membership of each position, in the same order
    pub fn check_in_footprint(&self, positions: &[SkyPosition]) -> Vec<bool> {
        positions.iter().map(|p| self.contains(p)).collect()
    }

    /// Like [`resolve_tile`](Self::resolve_tile) but a position outside the
    /// footprint is an error
    pub fn require_tile(&self, pos: &SkyPosition) -> Result<TileId, Error> {
        self.resolve_tile(pos)
            .ok_or(Error::OutsideFootprint(pos.ra(), pos.dec()))
    }
}
