//! Geographic primitives for the location filter.
//!
//! - `distance` - great-circle distance and radius units
//! - `location` - radius-around-point filter
//! - `bounds` - antimeridian-aware bounding structure for tracks

mod bounds;
mod distance;
mod location;

pub use bounds::{TrackBounds, POCKET_COUNT, POCKET_WIDTH_DEG};
pub use distance::{haversine_m, DistanceUnit, GeoPoint, EARTH_RADIUS_M, METRES_PER_DEGREE};
pub use location::LocationFilter;
