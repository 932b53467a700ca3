//! Core data models for the transformation service.

pub mod county;
pub mod point;
pub mod result;
pub mod zone;

pub use county::County;
pub use point::{InputPoint, InvalidInput};
pub use result::{ProjectedPoint, RowOutcome, TransformResult};
pub use zone::{StatePlaneZone, ZONE_SPLIT_LON};
