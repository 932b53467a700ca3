//! EPSG-coded coordinate transformation backed by proj4rs.

use proj4rs::proj::Proj;
use thiserror::Error;

use crate::models::InvalidInput;

/// WGS84 geographic (lon/lat degrees).
pub const EPSG_WGS84: u32 = 4326;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("EPSG:{0} has no known projection definition")]
    UnknownCrs(u32),

    #[error("EPSG:{code} definition rejected: {detail}")]
    BadDefinition { code: u32, detail: String },

    #[error("reprojection to EPSG:{code} failed: {detail}")]
    ProjectionFailed { code: u32, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Transformer between two EPSG-coded reference systems.
///
/// Geographic systems use degrees at the API surface; proj4rs works in
/// radians internally, so conversion happens on the way in and out.
pub struct CrsTransformer {
    source: Proj,
    target: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

impl CrsTransformer {
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, TransformError> {
        Ok(Self {
            source: proj_for_epsg(source_epsg)?,
            target: proj_for_epsg(target_epsg)?,
            source_epsg,
            target_epsg,
        })
    }

    /// Transformer from WGS84 lon/lat to another system.
    pub fn from_wgs84(target_epsg: u32) -> Result<Self, TransformError> {
        Self::new(EPSG_WGS84, target_epsg)
    }

    /// Transformer back to WGS84 lon/lat.
    pub fn to_wgs84(source_epsg: u32) -> Result<Self, TransformError> {
        Self::new(source_epsg, EPSG_WGS84)
    }

    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transform an `(x, y)` pair; x is longitude/easting, y is
    /// latitude/northing.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        let (in_x, in_y) = if is_geographic(self.source_epsg) {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (in_x, in_y, 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut point).map_err(|e| {
            TransformError::ProjectionFailed {
                code: self.target_epsg,
                detail: format!("{e:?}"),
            }
        })?;

        let (out_x, out_y) = if is_geographic(self.target_epsg) {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(TransformError::ProjectionFailed {
                code: self.target_epsg,
                detail: "non-finite result".to_string(),
            });
        }

        Ok((out_x, out_y))
    }
}

/// Degree-based systems this service deals in. Everything else in the
/// registry is a projected system working in linear units.
fn is_geographic(epsg: u32) -> bool {
    // WGS84 and NAD83 geographic
    matches!(epsg, 4326 | 4269)
}

fn proj_for_epsg(code: u32) -> Result<Proj, TransformError> {
    let short = u16::try_from(code).map_err(|_| TransformError::UnknownCrs(code))?;
    let def = crs_definitions::from_code(short).ok_or(TransformError::UnknownCrs(code))?;
    Proj::from_proj_string(def.proj4).map_err(|e| TransformError::BadDefinition {
        code,
        detail: format!("{e:?}"),
    })
}
