//! Approximate county detection from a static bounding-box table.

use super::PointLocator;
use crate::models::County;

/// Rectangular lat/lon bounds for one county.
#[derive(Debug, Clone, Copy)]
pub struct CountyBounds {
    pub county: &'static str,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl CountyBounds {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat <= lat && lat <= self.max_lat && self.min_lon <= lon && lon <= self.max_lon
    }
}

/// Approximate boxes for the highest-population counties, checked in
/// this order. First match wins: neighbouring boxes overlap at their
/// edges, and the priority order (not geometry) breaks those ties.
/// Counties not listed here are only resolvable by the polygon index.
pub const COUNTY_BOUNDS: &[CountyBounds] = &[
    CountyBounds { county: "LAKE", min_lat: 41.4, max_lat: 41.8, min_lon: -87.6, max_lon: -87.2 },
    CountyBounds { county: "PORTER", min_lat: 41.3, max_lat: 41.7, min_lon: -87.2, max_lon: -86.8 },
    CountyBounds { county: "LA_PORTE", min_lat: 41.3, max_lat: 41.8, min_lon: -86.8, max_lon: -86.4 },
    CountyBounds { county: "ST_JOSEPH", min_lat: 41.5, max_lat: 41.8, min_lon: -86.5, max_lon: -86.1 },
    CountyBounds { county: "ELKHART", min_lat: 41.4, max_lat: 41.8, min_lon: -86.1, max_lon: -85.6 },
    CountyBounds { county: "LAGRANGE", min_lat: 41.5, max_lat: 41.8, min_lon: -85.6, max_lon: -85.2 },
    CountyBounds { county: "STEUBEN", min_lat: 41.5, max_lat: 41.8, min_lon: -85.2, max_lon: -84.8 },
    CountyBounds { county: "ALLEN", min_lat: 40.9, max_lat: 41.4, min_lon: -85.3, max_lon: -84.8 },
    CountyBounds { county: "MARION", min_lat: 39.6, max_lat: 40.0, min_lon: -86.3, max_lon: -85.9 },
    CountyBounds { county: "HAMILTON", min_lat: 39.9, max_lat: 40.2, min_lon: -86.2, max_lon: -85.8 },
    CountyBounds { county: "HENDRICKS", min_lat: 39.7, max_lat: 40.0, min_lon: -86.7, max_lon: -86.3 },
];

/// Constant-time approximate locator; pure, no I/O.
pub struct BboxLocator;

impl PointLocator for BboxLocator {
    fn locate(&self, lat: f64, lon: f64) -> Option<County> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        COUNTY_BOUNDS
            .iter()
            .find(|bounds| bounds.contains(lat, lon))
            .map(|bounds| County::new(bounds.county))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_documented_cities() {
        let locator = BboxLocator;
        // Indianapolis
        assert_eq!(
            locator.locate(39.7684, -86.1581),
            Some(County::new("MARION"))
        );
        // Fort Wayne
        assert_eq!(
            locator.locate(41.0814, -85.1394),
            Some(County::new("ALLEN"))
        );
        // South Bend
        assert_eq!(
            locator.locate(41.6764, -86.2520),
            Some(County::new("ST_JOSEPH"))
        );
    }

    #[test]
    fn misses_points_outside_all_boxes() {
        let locator = BboxLocator;
        assert_eq!(locator.locate(0.0, 0.0), None);
        // Bloomington: Monroe county has no box in the table
        assert_eq!(locator.locate(39.1653, -86.5264), None);
    }

    #[test]
    fn is_deterministic() {
        let locator = BboxLocator;
        let first = locator.locate(39.7684, -86.1581);
        for _ in 0..100 {
            assert_eq!(locator.locate(39.7684, -86.1581), first);
        }
    }

    #[test]
    fn overlap_ties_break_by_priority_order() {
        // (39.95, -86.0) sits inside both the MARION and HAMILTON boxes;
        // MARION is listed first and wins.
        let locator = BboxLocator;
        assert_eq!(locator.locate(39.95, -86.0), Some(County::new("MARION")));
    }

    #[test]
    fn non_finite_input_never_matches() {
        let locator = BboxLocator;
        assert_eq!(locator.locate(f64::NAN, -86.0), None);
        assert_eq!(locator.locate(39.7, f64::INFINITY), None);
    }
}
