//! Input coordinate type and per-row validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single WGS84 input coordinate in decimal degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputPoint {
    /// Caller-supplied row identifier (boring number, point name, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Rejection reason for a coordinate that cannot be reprojected at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("non-finite coordinate ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },
    #[error("coordinate ({lat}, {lon}) outside the WGS84 domain")]
    OutOfRange { lat: f64, lon: f64 },
}

impl InputPoint {
    pub fn new(id: Option<String>, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    /// Check that the coordinate is numerically usable. Points outside
    /// Indiana pass validation; they simply will not match any county.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(InvalidInput::NonFinite {
                lat: self.lat,
                lon: self.lon,
            });
        }
        if self.lat.abs() > 90.0 || self.lon.abs() > 180.0 {
            return Err(InvalidInput::OutOfRange {
                lat: self.lat,
                lon: self.lon,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_indiana_and_faraway_points() {
        assert!(InputPoint::new(None, 39.7684, -86.1581).validate().is_ok());
        assert!(InputPoint::new(None, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn rejects_nan_and_out_of_range() {
        assert!(matches!(
            InputPoint::new(None, f64::NAN, -86.0).validate(),
            Err(InvalidInput::NonFinite { .. })
        ));
        assert!(matches!(
            InputPoint::new(None, 91.0, -86.0).validate(),
            Err(InvalidInput::OutOfRange { .. })
        ));
        assert!(matches!(
            InputPoint::new(None, 39.0, -190.0).validate(),
            Err(InvalidInput::OutOfRange { .. })
        ));
    }
}
