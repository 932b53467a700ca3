//! Spatial index for exact county containment lookups.

use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::info;

use super::{CountyBoundary, PointLocator};
use crate::models::County;

/// Wrapper for R-tree indexing of county boundaries
#[derive(Clone)]
struct IndexedBoundary {
    boundary: Arc<CountyBoundary>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBoundary {
    fn new(boundary: CountyBoundary) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = boundary.bbox()?;
        Some(Self {
            boundary: Arc::new(boundary),
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// R-tree over county boundary envelopes with exact containment checks.
pub struct CountySpatialIndex {
    tree: RTree<IndexedBoundary>,
}

impl CountySpatialIndex {
    /// Build the index from fetched boundaries.
    pub fn build(boundaries: Vec<CountyBoundary>) -> Self {
        info!("Building spatial index for {} county boundaries", boundaries.len());

        let indexed: Vec<IndexedBoundary> = boundaries
            .into_iter()
            .filter_map(IndexedBoundary::new)
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} entries", tree.size());

        Self { tree }
    }

    /// Exact containment lookup.
    ///
    /// Counties partition the state, so at most one boundary should
    /// contain a point. If the source polygons overlap along a shared
    /// border, the first candidate wins; that is a known imprecision at
    /// boundary vertices inherited from the source data, not something
    /// this index papers over.
    pub fn lookup(&self, lon: f64, lat: f64) -> Option<County> {
        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .find(|ib| ib.boundary.geometry.contains(&point))
            .map(|ib| ib.boundary.county.clone())
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl PointLocator for CountySpatialIndex {
    fn locate(&self, lat: f64, lon: f64) -> Option<County> {
        self.lookup(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(county: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> CountyBoundary {
        let ring = polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
            (x: min_x, y: min_y),
        ];
        CountyBoundary {
            county: County::new(county),
            geometry: MultiPolygon(vec![ring]),
        }
    }

    #[test]
    fn exact_containment() {
        let index = CountySpatialIndex::build(vec![
            square("MARION", -86.3, 39.6, -85.9, 40.0),
            square("HAMILTON", -86.3, 40.0, -85.8, 40.2),
        ]);
        assert_eq!(index.len(), 2);

        assert_eq!(
            index.locate(39.7684, -86.1581),
            Some(County::new("MARION"))
        );
        assert_eq!(index.locate(40.05, -86.0), Some(County::new("HAMILTON")));
        assert_eq!(index.locate(0.0, 0.0), None);
    }

    #[test]
    fn empty_index_matches_nothing() {
        let index = CountySpatialIndex::build(vec![]);
        assert!(index.is_empty());
        assert_eq!(index.locate(39.7684, -86.1581), None);
    }

    #[test]
    fn envelope_hit_is_not_enough() {
        // A triangle whose envelope covers the query point but whose
        // geometry does not contain it.
        let triangle = CountyBoundary {
            county: County::new("BROWN"),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 2.0),
                (x: 0.0, y: 0.0),
            ]]),
        };
        let index = CountySpatialIndex::build(vec![triangle]);
        assert_eq!(index.locate(1.5, 0.5), None);
        assert_eq!(index.locate(0.5, 1.5), Some(County::new("BROWN")));
    }
}
