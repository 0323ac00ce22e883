//! Filtering and publishing of search results.
//!
//! This module provides:
//! - The `TrackSearch` control surface tying discovery, scanning and
//!   matching into one session
//! - The single-flight `TrackMatcher`
//! - The `ResultSink` boundary results are pushed through

mod manager;
mod matcher;
mod sink;

#[cfg(test)]
mod tests;

// Re-export main types
pub use manager::TrackSearch;
pub use matcher::TrackMatcher;
pub use sink::ResultSink;
