//! County resolution for WGS84 points.
//!
//! Two `PointLocator` implementations: a static bounding-box table for
//! fast approximate hits with no external dependency, and an exact
//! R-tree polygon index built from downloaded county boundaries.
//! `LocatorChain` tries them in that fixed fallback order.

mod bbox;
mod boundary;
mod index;

pub use bbox::{BboxLocator, CountyBounds, COUNTY_BOUNDS};
pub use boundary::{
    fetch_county_boundaries, parse_county_boundaries, CountyBoundary, FetchError,
    DEFAULT_BOUNDARY_URL,
};
pub use index::CountySpatialIndex;

use crate::models::County;

/// Strategy interface for point → county resolution.
pub trait PointLocator: Send + Sync {
    /// County containing the point, or `None` when the point lies in no
    /// known county (outside Indiana, or in a gap in the source data).
    fn locate(&self, lat: f64, lon: f64) -> Option<County>;
}

/// Ordered fallback chain of locators; first hit wins.
#[derive(Default)]
pub struct LocatorChain {
    locators: Vec<Box<dyn PointLocator>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, locator: Box<dyn PointLocator>) {
        self.locators.push(locator);
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl PointLocator for LocatorChain {
    fn locate(&self, lat: f64, lon: f64) -> Option<County> {
        self.locators.iter().find_map(|l| l.locate(lat, lon))
    }
}

/// The standard detection chain: bounding boxes first, then the polygon
/// index when boundary data was acquired.
pub fn detection_chain(index: Option<CountySpatialIndex>) -> LocatorChain {
    let mut chain = LocatorChain::new();
    chain.push(Box::new(BboxLocator));
    if let Some(index) = index {
        chain.push(Box::new(index));
    }
    chain
}
