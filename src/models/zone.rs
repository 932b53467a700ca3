//! Indiana State Plane zone selection.

use serde::{Deserialize, Serialize};

/// Longitude split between the East and West state-plane zones, midway
/// between the zones' central meridians (85°40'W and 87°05'W).
pub const ZONE_SPLIT_LON: f64 = -86.375;

/// Indiana State Plane zone (NAD83, US survey feet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatePlaneZone {
    East,
    West,
}

impl StatePlaneZone {
    /// EPSG code for the zone: NAD83 / Indiana East (ftUS) or
    /// NAD83 / Indiana West (ftUS).
    pub fn epsg(&self) -> u32 {
        match self {
            StatePlaneZone::East => 2965,
            StatePlaneZone::West => 2966,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatePlaneZone::East => "East",
            StatePlaneZone::West => "West",
        }
    }

    /// Zone for a longitude: East at or east of the split, West otherwise.
    /// This is a fixed geographic rule, independent of county membership.
    pub fn for_longitude(lon: f64) -> Self {
        if lon >= ZONE_SPLIT_LON {
            StatePlaneZone::East
        } else {
            StatePlaneZone::West
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indianapolis_is_east() {
        assert_eq!(StatePlaneZone::for_longitude(-86.1581), StatePlaneZone::East);
    }

    #[test]
    fn gary_is_west() {
        assert_eq!(StatePlaneZone::for_longitude(-87.3464), StatePlaneZone::West);
    }

    #[test]
    fn zone_codes() {
        assert_eq!(StatePlaneZone::East.epsg(), 2965);
        assert_eq!(StatePlaneZone::West.epsg(), 2966);
    }
}
