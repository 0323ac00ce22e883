//! Antimeridian-aware bounding structure for tracks.
//!
//! A single longitude min/max is useless for tracks near ±180° (or with
//! points on opposite sides of the globe): it would span nearly the whole
//! world. Instead longitudes are bucketed into 36 pockets of 10° each and
//! every pocket keeps its own min/max. A point is inside when it is inside
//! the latitude range and inside any one pocket. This is a coarse
//! approximation of the track's hull, not an exact path test.
//!
//! A track with points in both the westernmost and easternmost pocket is
//! treated as crossing the line: its eastern pocket is closed at +180°.

use super::distance::METRES_PER_DEGREE;
use super::location::LocationFilter;

/// Number of longitude pockets.
pub const POCKET_COUNT: usize = 36;

/// Width of one longitude pocket in degrees.
pub const POCKET_WIDTH_DEG: f64 = 10.0;

/// Below this many metres per degree of longitude the point is treated as
/// being at a pole, where every longitude is within any tolerance.
const POLAR_METRES_PER_DEGREE: f64 = 1e-6;

/// Inclusive degree range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DegreeRange {
    min: f64,
    max: f64,
}

impl DegreeRange {
    fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn extend(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn merge(&mut self, other: &DegreeRange) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    fn contains_within(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

/// Coarse geographic extent of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    latitude: Option<DegreeRange>,
    pockets: [Option<DegreeRange>; POCKET_COUNT],
    crosses_antimeridian: bool,
}

impl Default for TrackBounds {
    fn default() -> Self {
        Self {
            latitude: None,
            pockets: [None; POCKET_COUNT],
            crosses_antimeridian: false,
        }
    }
}

impl TrackBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point. Non-finite coordinates are ignored.
    pub fn add_point(&mut self, lat: f64, lon: f64) {
        if !lat.is_finite() || !lon.is_finite() {
            return;
        }
        let lat = lat.clamp(-90.0, 90.0);
        let lon = normalize_longitude(lon);

        match self.latitude.as_mut() {
            Some(range) => range.extend(lat),
            None => self.latitude = Some(DegreeRange::point(lat)),
        }
        match self.pockets[pocket_index(lon)].as_mut() {
            Some(range) => range.extend(lon),
            None => self.pockets[pocket_index(lon)] = Some(DegreeRange::point(lon)),
        }
        self.update_crossing();
    }

    fn update_crossing(&mut self) {
        self.crosses_antimeridian =
            self.pockets[0].is_some() && self.pockets[POCKET_COUNT - 1].is_some();
    }

    /// Returns true if the track has points on both sides of ±180°.
    pub fn crosses_antimeridian(&self) -> bool {
        self.crosses_antimeridian
    }

    /// Longitude range of pocket `index` as used for containment.
    fn effective_pocket(&self, index: usize) -> Option<DegreeRange> {
        let mut range = self.pockets[index]?;
        if self.crosses_antimeridian && index == POCKET_COUNT - 1 {
            range.max = 180.0;
        }
        Some(range)
    }

    /// Grows these bounds to also cover `other`.
    pub fn merge(&mut self, other: &TrackBounds) {
        if let Some(other_lat) = other.latitude {
            match self.latitude.as_mut() {
                Some(range) => range.merge(&other_lat),
                None => self.latitude = Some(other_lat),
            }
        }
        for (mine, theirs) in self.pockets.iter_mut().zip(other.pockets.iter()) {
            if let Some(theirs) = theirs {
                match mine.as_mut() {
                    Some(range) => range.merge(theirs),
                    None => *mine = Some(*theirs),
                }
            }
        }
        self.update_crossing();
    }

    /// Returns true if no point was ever added.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none()
    }

    /// Returns the (min, max) latitude, if any point was added.
    pub fn latitude_range(&self) -> Option<(f64, f64)> {
        self.latitude.map(|range| (range.min, range.max))
    }

    /// Number of pockets holding at least one point.
    pub fn occupied_pockets(&self) -> usize {
        self.pockets.iter().flatten().count()
    }

    /// Returns true if the point is inside the bounds, or within
    /// `tolerance_m` metres of them.
    pub fn includes_point(&self, lat: f64, lon: f64, tolerance_m: f64) -> bool {
        let Some(latitude) = self.latitude else {
            return false;
        };
        if !lat.is_finite() || !lon.is_finite() {
            return false;
        }
        let tolerance_m = tolerance_m.max(0.0);
        let lon = normalize_longitude(lon);

        let lat_tolerance = tolerance_m / METRES_PER_DEGREE;
        if !latitude.contains_within(lat, lat_tolerance) {
            return false;
        }

        let metres_per_lon_degree = METRES_PER_DEGREE * lat.to_radians().cos();
        if metres_per_lon_degree < POLAR_METRES_PER_DEGREE {
            return true;
        }
        let lon_tolerance = tolerance_m / metres_per_lon_degree;

        (0..POCKET_COUNT)
            .filter_map(|index| self.effective_pocket(index))
            .any(|range| longitude_within(&range, lon, lon_tolerance))
    }

    /// Coarse test of whether the track may pass within the filter's radius.
    pub fn overlaps(&self, filter: &LocationFilter) -> bool {
        let center = filter.point();
        self.includes_point(center.lat, center.lon, filter.radius_m())
    }
}

/// Maps a longitude into `[-180, 180)`.
fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

fn pocket_index(lon: f64) -> usize {
    let index = ((lon + 180.0) / POCKET_WIDTH_DEG).floor();
    (index.max(0.0) as usize).min(POCKET_COUNT - 1)
}

/// Returns true if `lon` is inside `range`, or within `tolerance` degrees of
/// one of its edges measured the short way around the globe.
fn longitude_within(range: &DegreeRange, lon: f64, tolerance: f64) -> bool {
    if range.contains_within(lon, 0.0) {
        return true;
    }
    angular_gap(lon, range.min) <= tolerance || angular_gap(lon, range.max) <= tolerance
}

fn angular_gap(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs().rem_euclid(360.0);
    delta.min(360.0 - delta)
}
