/// Coordinate frames a region file can declare before its shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooSystem {
    /// International Celestial Reference System
    ICRS,
    /// mean place, new (IAU 1984) system. Also spelled `j2000`
    FK5,
    /// mean place, old (Bessell-Newcomb) system. Also spelled `b1950`
    FK4,
    GALACTIC,
    ECLIPTIC,
    /// pixel coordinates of some image
    IMAGE,
    PHYSICAL,
}

impl CooSystem {
    /// Recognize a frame keyword, case insensitive. Returns `None` for
    /// anything that is not a frame keyword.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "icrs" => Some(CooSystem::ICRS),
            "fk5" | "j2000" => Some(CooSystem::FK5),
            "fk4" | "b1950" => Some(CooSystem::FK4),
            "galactic" => Some(CooSystem::GALACTIC),
            "ecliptic" => Some(CooSystem::ECLIPTIC),
            "image" => Some(CooSystem::IMAGE),
            "physical" => Some(CooSystem::PHYSICAL),
            _ => None,
        }
    }

    /// Frames whose coordinates can be used as ICRS (ra, dec) directly.
    ///
    /// FK5 and ICRS differ by a few tens of milliarcseconds, below the
    /// 180 mas pixel of the footprint grid.
    pub fn is_equatorial_j2000(&self) -> bool {
        matches!(self, CooSystem::ICRS | CooSystem::FK5)
    }
}
