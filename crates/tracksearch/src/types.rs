//! Result and progress types exposed to the host application.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of published search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Absolute path of the matching file.
    pub path: PathBuf,
    /// File name shown in the results table.
    pub file_name: String,
    /// Matching text, or the track name when no text filter is set.
    pub snippet: String,
}

/// State of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchState {
    Idle,
    Discovering,
    Scanning,
    Ready,
    Cancelled,
}

impl SearchState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Scanning => "scanning",
            Self::Ready => "ready",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Progress of the current search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Current state of the session.
    pub state: SearchState,
    /// Root directory being searched.
    pub root: Option<PathBuf>,
    /// Number of files discovered so far.
    pub found_files: usize,
    /// Number of files whose scan completed.
    pub scanned_files: usize,
    /// Scans currently running.
    pub active_scans: usize,
    /// Scans waiting for a free slot.
    pub queued_scans: usize,
    /// Whether discovery has finished.
    pub list_complete: bool,
    /// Whether a matcher sweep is in flight.
    pub matching: bool,
    /// Number of files in the last published result set.
    pub matched_files: usize,
}

impl SearchProgress {
    pub(crate) fn idle() -> Self {
        Self {
            state: SearchState::Idle,
            root: None,
            found_files: 0,
            scanned_files: 0,
            active_scans: 0,
            queued_scans: 0,
            list_complete: false,
            matching: false,
            matched_files: 0,
        }
    }
}
