//! Per-file state for the search pipeline.
//!
//! - `file` - the per-file state machine (Found → Scanning → Complete)
//! - `contents` - searchable contents extracted from a file
//! - `list` - append-only registry of discovered files with change notification
//! - `result` - the matcher's cached verdict for one file

mod contents;
mod file;
mod list;
mod result;

pub use contents::{TrackContents, TrackContentsBuilder};
pub use file::{TrackFile, TrackFileStatus};
pub use list::{TrackFileList, TrackFileListener};
pub use result::SearchResult;
