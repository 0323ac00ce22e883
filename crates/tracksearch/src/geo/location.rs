//! Radius-around-point location filter.

use super::distance::{DistanceUnit, GeoPoint, EARTH_RADIUS_M};

/// Slack used when comparing circles, in metres.
const CONTAINMENT_EPSILON_M: f64 = 1e-6;

/// Accepts tracks passing within a radius of a point.
///
/// The radius is converted to metres and to radians once, at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFilter {
    point: GeoPoint,
    radius: f64,
    unit: DistanceUnit,
    radius_m: f64,
    radius_rad: f64,
}

impl LocationFilter {
    /// Creates a filter. Negative or NaN radii are clamped to zero.
    pub fn new(point: GeoPoint, radius: f64, unit: DistanceUnit) -> Self {
        let radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
        let radius_m = unit.to_metres(radius);
        Self {
            point,
            radius,
            unit,
            radius_m,
            radius_rad: radius_m / EARTH_RADIUS_M,
        }
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Radius in the unit it was given in.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Radius as a central angle.
    pub fn radius_rad(&self) -> f64 {
        self.radius_rad
    }

    /// Returns true if `point` lies within the radius.
    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        self.point.distance_m(point) <= self.radius_m + CONTAINMENT_EPSILON_M
    }

    /// Returns true if every point accepted by `other` is accepted by `self`.
    pub fn includes(&self, other: &LocationFilter) -> bool {
        self.point.distance_m(&other.point) + other.radius_m
            <= self.radius_m + CONTAINMENT_EPSILON_M
    }

    /// Returns true if both filters accept exactly the same points.
    pub fn same_area(&self, other: &LocationFilter) -> bool {
        self.includes(other) && other.includes(self)
    }
}
