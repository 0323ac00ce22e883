//! Extraction traits.

use std::path::Path;

use chrono::FixedOffset;

use crate::error::Result;
use crate::geo::LocationFilter;
use crate::track::TrackContents;

/// Reads one recognized file.
pub trait ContentExtractor: Send {
    /// Extracts searchable contents, converting timestamps into `timezone`.
    fn contents(&self, timezone: FixedOffset) -> Result<TrackContents>;

    /// Exact test of whether the track passes within the filter's radius.
    ///
    /// Only called after the coarse bounding test passed.
    fn matches_location(&self, filter: &LocationFilter) -> Result<bool>;
}

/// Creates extractors for files it recognizes.
pub trait ExtractorFactory: Send + Sync {
    /// Returns `None` if the file is not in a format this factory handles.
    fn create_extractor(&self, path: &Path) -> Option<Box<dyn ContentExtractor>>;
}

impl<F> ExtractorFactory for F
where
    F: Fn(&Path) -> Option<Box<dyn ContentExtractor>> + Send + Sync,
{
    fn create_extractor(&self, path: &Path) -> Option<Box<dyn ContentExtractor>> {
        self(path)
    }
}

/// Decides whether a discovered file should enter the pipeline.
pub trait ExtensionFilter: Send + Sync {
    fn is_allowed(&self, path: &Path) -> bool;
}

impl<F> ExtensionFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_allowed(&self, path: &Path) -> bool {
        self(path)
    }
}
