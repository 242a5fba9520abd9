//! Small geometry primitives for working with GPS coordinates: great-circle distances, initial
//! bearings, and angles that wrap around at 360 degrees.

mod angle;
mod distance;
mod gps;

pub use crate::angle::{normalize_degrees, Angle};
pub use crate::distance::Distance;
pub use crate::gps::{HashableLonLat, LonLat};

/// Mean radius of the earth, used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
