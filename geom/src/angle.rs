use std::f64;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An angle, stored in radians. Compass bearings use 0 degrees as north and grow clockwise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub(crate) fn new_rads(rads: f64) -> Angle {
        Angle(rads)
    }

    /// Create an angle in degrees.
    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    pub fn opposite(self) -> Angle {
        Angle(self.0 + f64::consts::PI)
    }

    /// Returns [0, 2pi)
    pub fn normalized_radians(self) -> f64 {
        normalize_degrees(self.0.to_degrees()).to_radians()
    }

    /// Returns [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        normalize_degrees(self.0.to_degrees())
    }

}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

/// Wraps any finite number of degrees into [0, 360).
pub fn normalize_degrees(degs: f64) -> f64 {
    let result = degs.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360
    if result >= 360.0 {
        0.0
    } else {
        result
    }
}
