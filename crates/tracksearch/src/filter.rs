//! Composite search filter.
//!
//! - `value` - the immutable filter (text, date range, location)
//! - `change` - comparison of two filters (same, wider, narrower, different)
//! - `apply` - evaluation of a filter against one file

mod apply;
mod change;
mod value;

pub use change::FilterChange;
pub use value::Filter;
