//! Matcher's cached verdict for one file.

use std::sync::Arc;

use super::file::{TrackFile, TrackFileStatus};
use crate::types::SearchHit;

/// Result of applying the current filter to one file.
///
/// Created the first time the matcher reaches the file. The matcher skips
/// re-evaluation while the file's status still equals `status_when_checked`
/// and the result is not flagged for recheck.
#[derive(Debug, Clone)]
pub struct SearchResult {
    file: Arc<TrackFile>,
    status_when_checked: TrackFileStatus,
    is_match: bool,
    needs_recheck: bool,
    snippet: String,
}

impl SearchResult {
    pub fn new(file: Arc<TrackFile>) -> Self {
        let status_when_checked = file.status();
        Self {
            file,
            status_when_checked,
            is_match: false,
            needs_recheck: true,
            snippet: String::new(),
        }
    }

    pub fn file(&self) -> &Arc<TrackFile> {
        &self.file
    }

    pub fn status_when_checked(&self) -> TrackFileStatus {
        self.status_when_checked
    }

    pub fn is_match(&self) -> bool {
        self.is_match
    }

    pub fn needs_recheck(&self) -> bool {
        self.needs_recheck
    }

    /// Display text for the result row.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// Returns true if the file changed state or was flagged since the last check.
    pub fn is_stale(&self) -> bool {
        self.needs_recheck || self.file.status() != self.status_when_checked
    }

    /// Stores the outcome of a filter application.
    pub(crate) fn record(&mut self, status: TrackFileStatus, is_match: bool, snippet: &str) {
        self.status_when_checked = status;
        self.is_match = is_match;
        self.snippet = snippet.trim().to_string();
    }

    pub(crate) fn demote(&mut self) {
        self.is_match = false;
    }

    pub(crate) fn flag_for_recheck(&mut self) {
        self.needs_recheck = true;
    }

    pub(crate) fn clear_recheck(&mut self) {
        self.needs_recheck = false;
    }

    pub fn to_hit(&self) -> SearchHit {
        SearchHit {
            path: self.file.path().to_path_buf(),
            file_name: self.file.file_name(),
            snippet: self.snippet.clone(),
        }
    }
}
