//! Calendar values used by the date filter.
//!
//! - `Date` is a plain calendar day with lenient parsing
//! - `DateRange` is an inclusive span of days, or one of two sentinels
//!   that impose no constraint (`Empty`, `Invalid`)

mod parse;
mod range;
mod value;

pub use range::DateRange;
pub use value::Date;
