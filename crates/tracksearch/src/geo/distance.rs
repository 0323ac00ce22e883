//! Great-circle distance and distance units.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude (or of longitude on the equator).
pub const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * PI / 180.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Distance to `other` in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Unit a radius is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Metres,
    #[default]
    Kilometres,
    Miles,
    NauticalMiles,
    Feet,
}

impl DistanceUnit {
    /// Number of metres in one of this unit.
    pub fn metres_per_unit(self) -> f64 {
        match self {
            Self::Metres => 1.0,
            Self::Kilometres => 1_000.0,
            Self::Miles => 1_609.344,
            Self::NauticalMiles => 1_852.0,
            Self::Feet => 0.3048,
        }
    }

    pub fn to_metres(self, value: f64) -> f64 {
        value * self.metres_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metres => "m",
            Self::Kilometres => "km",
            Self::Miles => "mi",
            Self::NauticalMiles => "nm",
            Self::Feet => "ft",
        }
    }
}

/// Great-circle distance between two points, in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_M * c
}
