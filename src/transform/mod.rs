//! Coordinate transform orchestration.
//!
//! Resolves a county (when asked), picks the state-plane zone by
//! longitude, and reprojects through the CRS layer. Per-row failures
//! become per-row outcomes; a batch never aborts part-way.

mod crs;

pub use crs::{CrsTransformer, TransformError, EPSG_WGS84};

use tracing::{debug, warn};

use crate::locate::PointLocator;
use crate::models::{
    County, InputPoint, ProjectedPoint, RowOutcome, StatePlaneZone, TransformResult,
};
use crate::registry::CrsRegistry;

/// How the orchestrator picks the county system for a point.
#[derive(Debug, Clone)]
pub enum CountyChoice {
    /// Resolve per point via the detection chain.
    Auto,
    /// Use this county for every point.
    Fixed(County),
    /// State-plane output only.
    Skip,
}

/// Transform orchestrator: detection chain + registry + reprojection.
///
/// The two state-plane transformers are fixed, so they are built once
/// here; county transformers depend on the registry row and are built
/// per lookup.
pub struct Transformer<'a> {
    registry: &'a CrsRegistry,
    locator: &'a dyn PointLocator,
    east: CrsTransformer,
    west: CrsTransformer,
}

impl<'a> Transformer<'a> {
    pub fn new(
        registry: &'a CrsRegistry,
        locator: &'a dyn PointLocator,
    ) -> Result<Self, TransformError> {
        Ok(Self {
            registry,
            locator,
            east: CrsTransformer::from_wgs84(StatePlaneZone::East.epsg())?,
            west: CrsTransformer::from_wgs84(StatePlaneZone::West.epsg())?,
        })
    }

    /// Transform one point.
    ///
    /// A county without a registry entry, or whose registry code cannot
    /// be projected, degrades to a state-plane-only result; only invalid
    /// input or a state-plane reprojection failure errors the row.
    pub fn transform(
        &self,
        point: &InputPoint,
        choice: &CountyChoice,
    ) -> Result<TransformResult, TransformError> {
        point.validate()?;

        let county = match choice {
            CountyChoice::Auto => self.locator.locate(point.lat, point.lon),
            CountyChoice::Fixed(county) => Some(county.clone()),
            CountyChoice::Skip => None,
        };

        let zone = StatePlaneZone::for_longitude(point.lon);
        let plane = match zone {
            StatePlaneZone::East => &self.east,
            StatePlaneZone::West => &self.west,
        };
        let state_plane = project_with(plane, point)?;

        let county_system = match &county {
            Some(county) => match self.registry.lookup(county) {
                Some(entry) => match self.project_county(point, entry.epsg_code) {
                    Ok(projected) => Some(projected),
                    Err(e) => {
                        warn!("County reprojection for {} failed: {}", county, e);
                        None
                    }
                },
                None => {
                    debug!("No registry entry for county {}", county);
                    None
                }
            },
            None => None,
        };

        Ok(TransformResult {
            point: point.clone(),
            county,
            zone,
            state_plane,
            county_system,
        })
    }

    /// Transform a whole batch: one outcome per input row, input order
    /// preserved, no row ever aborts the rest.
    pub fn transform_batch(&self, points: &[InputPoint], choice: &CountyChoice) -> Vec<RowOutcome> {
        points
            .iter()
            .map(|point| match self.transform(point, choice) {
                Ok(result) => RowOutcome::Ok(result),
                Err(e) => RowOutcome::Failed {
                    point: point.clone(),
                    reason: e.to_string(),
                },
            })
            .collect()
    }

    fn project_county(
        &self,
        point: &InputPoint,
        epsg: u32,
    ) -> Result<ProjectedPoint, TransformError> {
        project_with(&CrsTransformer::from_wgs84(epsg)?, point)
    }
}

fn project_with(
    transformer: &CrsTransformer,
    point: &InputPoint,
) -> Result<ProjectedPoint, TransformError> {
    let (easting, northing) = transformer.transform(point.lon, point.lat)?;
    Ok(ProjectedPoint {
        easting,
        northing,
        epsg: transformer.target_epsg(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{BboxLocator, LocatorChain, PointLocator};
    use crate::registry::CrsRegistry;
    use std::io::Write;

    fn test_registry() -> (tempfile::NamedTempFile, CrsRegistry) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"County,EPSG_Code,Verified,Notes\n\
              MARION,7330,Yes,\n\
              ALLEN,7260,Yes,\n\
              ST_JOSEPH,7300,Yes,\n",
        )
        .unwrap();
        file.flush().unwrap();
        let registry = CrsRegistry::load(file.path()).unwrap();
        (file, registry)
    }

    fn indianapolis() -> InputPoint {
        InputPoint::new(Some("Monument Circle".into()), 39.7684, -86.1581)
    }

    #[test]
    fn auto_detect_resolves_county_and_zone() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        let result = transformer
            .transform(&indianapolis(), &CountyChoice::Auto)
            .unwrap();

        assert_eq!(result.county, Some(County::new("MARION")));
        assert_eq!(result.zone, StatePlaneZone::East);
        assert_eq!(result.state_plane.epsg, 2965);
        assert_eq!(result.county_system.as_ref().unwrap().epsg, 7330);
    }

    #[test]
    fn out_of_state_point_yields_state_plane_only() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        // Van Wert, Ohio: just across the state line, no county match
        let out_of_state = InputPoint::new(None, 40.8697, -84.5841);
        let result = transformer
            .transform(&out_of_state, &CountyChoice::Auto)
            .unwrap();

        assert_eq!(result.county, None);
        assert_eq!(result.county_system, None);
        assert!(result.state_plane.easting.is_finite());
    }

    #[test]
    fn far_out_of_domain_point_fails_its_row_only() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        // Null Island sits ~86 degrees east of the zone's central
        // meridian, outside the transverse-mercator domain, so the
        // state-plane leg itself is rejected.
        let null_island = InputPoint::new(None, 0.0, 0.0);
        let outcomes =
            transformer.transform_batch(&[null_island, indianapolis()], &CountyChoice::Auto);

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0] {
            RowOutcome::Failed { reason, .. } => assert!(!reason.is_empty()),
            RowOutcome::Ok(_) => panic!("projection far outside the zone should fail the row"),
        }
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn west_zone_point_uses_west_state_plane() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        // Gary: Lake County, west of the zone split
        let gary = InputPoint::new(Some("Gary".into()), 41.6021, -87.3372);
        let result = transformer.transform(&gary, &CountyChoice::Auto).unwrap();

        assert_eq!(result.county, Some(County::new("LAKE")));
        assert_eq!(result.zone, StatePlaneZone::West);
        assert_eq!(result.state_plane.epsg, 2966);
    }

    #[test]
    fn fixed_county_without_registry_entry_is_partial() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        let result = transformer
            .transform(
                &indianapolis(),
                &CountyChoice::Fixed(County::new("Monroe")),
            )
            .unwrap();

        assert_eq!(result.county, Some(County::new("MONROE")));
        assert!(result.county_system.is_none());
    }

    #[test]
    fn skip_produces_no_county() {
        let (_file, registry) = test_registry();
        let locator = BboxLocator;
        let transformer = Transformer::new(&registry, &locator).unwrap();

        let result = transformer
            .transform(&indianapolis(), &CountyChoice::Skip)
            .unwrap();
        assert_eq!(result.county, None);
        assert_eq!(result.state_plane.epsg, 2965);
    }

    #[test]
    fn batch_keeps_going_past_bad_rows() {
        let (_file, registry) = test_registry();
        let chain = {
            let mut chain = LocatorChain::new();
            chain.push(Box::new(BboxLocator));
            chain
        };
        let transformer = Transformer::new(&registry, &chain).unwrap();

        let points = vec![
            indianapolis(),
            InputPoint::new(Some("bad".into()), f64::NAN, f64::NAN),
            InputPoint::new(Some("Fort Wayne".into()), 41.0814, -85.1394),
        ];
        let outcomes = transformer.transform_batch(&points, &CountyChoice::Auto);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());

        match &outcomes[2] {
            RowOutcome::Ok(result) => {
                assert_eq!(result.county, Some(County::new("ALLEN")));
                assert_eq!(result.county_system.as_ref().unwrap().epsg, 7260);
            }
            RowOutcome::Failed { .. } => unreachable!(),
        }
    }

    #[test]
    fn chain_falls_through_to_later_locators() {
        struct Fixed(Option<County>);
        impl PointLocator for Fixed {
            fn locate(&self, _lat: f64, _lon: f64) -> Option<County> {
                self.0.clone()
            }
        }

        let mut chain = LocatorChain::new();
        chain.push(Box::new(Fixed(None)));
        chain.push(Box::new(Fixed(Some(County::new("VIGO")))));
        assert_eq!(chain.locate(39.47, -87.41), Some(County::new("VIGO")));
    }
}
