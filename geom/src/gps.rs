use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, EARTH_RADIUS_METERS};

/// longitude is x, latitude is y
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// Haversine distance
    pub fn gps_dist(self, other: LonLat) -> Distance {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(EARTH_RADIUS_METERS * c)
    }

    /// The initial compass bearing of the great circle from this point towards another. Identical
    /// points produce a bearing of 0 degrees (north).
    pub fn bearing_to(self, other: LonLat) -> Angle {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
        Angle::new_rads(y.atan2(x))
    }

    /// Follow a great circle from this point for some distance along an initial bearing.
    pub fn project_away(self, dist: Distance, bearing: Angle) -> LonLat {
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let delta = dist.inner_meters() / EARTH_RADIUS_METERS;
        let theta = bearing.normalized_radians();

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
        // Keep longitude in [-180, 180)
        let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
        LonLat::new(lon2, lat2.to_degrees())
    }

    /// Both components are finite and in the usual WGS84 ranges.
    pub fn is_valid(self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Panics if either component is NaN.
    pub fn to_hashable(self) -> HashableLonLat {
        HashableLonLat::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// An exact, orderable version of a `LonLat`. Two coordinates are the same only if they're
/// bit-for-bit equal; no snapping happens here.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashableLonLat {
    lon_nan: NotNan<f64>,
    lat_nan: NotNan<f64>,
}

impl HashableLonLat {
    pub fn new(lon: f64, lat: f64) -> HashableLonLat {
        HashableLonLat {
            lon_nan: NotNan::new(lon).unwrap(),
            lat_nan: NotNan::new(lat).unwrap(),
        }
    }

    pub fn to_lonlat(self) -> LonLat {
        LonLat::new(self.lon_nan.into_inner(), self.lat_nan.into_inner())
    }
}

impl fmt::Display for HashableLonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_lonlat())
    }
}
