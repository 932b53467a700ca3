//! Transform output types.

use serde::{Deserialize, Serialize};

use super::{County, InputPoint, StatePlaneZone};

/// A reprojected coordinate pair annotated with the EPSG code used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub easting: f64,
    pub northing: f64,
    pub epsg: u32,
}

/// Outcome of transforming a single input point.
///
/// `county_system` is absent when no county resolved or when the registry
/// has no entry for the resolved county; the state-plane fields are
/// always populated. Partial results are valid, reportable outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    pub point: InputPoint,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<County>,

    pub zone: StatePlaneZone,

    pub state_plane: ProjectedPoint,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_system: Option<ProjectedPoint>,
}

/// Per-row batch outcome. A failed row carries its input back to the
/// caller so batch output always has one row per input row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RowOutcome {
    Ok(TransformResult),
    Failed { point: InputPoint, reason: String },
}

impl RowOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RowOutcome::Ok(_))
    }
}
