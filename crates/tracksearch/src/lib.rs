//! Incremental, concurrent search over local track files.
//!
//! This crate provides the search core:
//! - Discovery of candidate files under a directory tree
//! - A bounded pool of scanners extracting searchable contents
//! - A composite filter (text, date range, geographic radius)
//! - A single-flight matcher that re-applies the filter as files and
//!   filter change, republishing the matching subset

pub mod config;
pub mod date;
pub mod error;
pub mod extract;
pub mod filter;
pub mod geo;
pub mod indexer;
pub mod search;
pub mod session;
pub mod track;
pub mod types;

// Re-export main types
pub use config::SearchConfig;
pub use date::{Date, DateRange};
pub use error::{Result, TrackSearchError};
pub use extract::{
    ContentExtractor, ExtensionBlacklist, ExtensionFilter, ExtractorFactory, ExtractorRegistry,
};
pub use filter::{Filter, FilterChange};
pub use geo::{DistanceUnit, GeoPoint, LocationFilter, TrackBounds};
pub use indexer::{
    FileScanner, ScanController, TrackFileFinder, TrackScanner, WorkerCoordinator,
    MAX_PARALLEL_SCANS,
};
pub use search::{ResultSink, TrackMatcher, TrackSearch};
pub use session::{SessionToken, SessionVersionTracker};
pub use track::{
    SearchResult, TrackContents, TrackContentsBuilder, TrackFile, TrackFileList,
    TrackFileListener, TrackFileStatus,
};
pub use types::{SearchHit, SearchProgress, SearchState};
