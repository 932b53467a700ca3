//! Wabash - Indiana coordinate transformation service.
//!
//! Resolves WGS84 points to Indiana counties (bounding-box table first,
//! exact polygon index as fallback), then reprojects them into Indiana
//! State Plane and county-specific InGCS reference systems using an
//! editable CSV registry of EPSG codes.

pub mod batch;
pub mod config;
pub mod locate;
pub mod models;
pub mod registry;
pub mod transform;

pub use models::{County, InputPoint, StatePlaneZone, TransformResult};
pub use registry::CrsRegistry;
pub use transform::{CountyChoice, Transformer};
