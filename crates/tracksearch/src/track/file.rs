//! Discovered file and its scan state.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use super::contents::TrackContents;

/// Scan state of a discovered file. Only ever advances.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TrackFileStatus {
    Found = 0,
    Scanning = 1,
    Complete = 2,
}

impl TrackFileStatus {
    /// Loads the status from an atomic.
    fn load(atomic: &AtomicU8) -> Self {
        match atomic.load(Ordering::Acquire) {
            1 => Self::Scanning,
            2 => Self::Complete,
            _ => Self::Found,
        }
    }

    /// Returns the status as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Scanning => "scanning",
            Self::Complete => "complete",
        }
    }
}

/// A file discovered under the search root.
///
/// `index` is the file's position in discovery order. Contents are attached
/// at most once, before the status becomes `Complete`, so a reader that
/// observes `Complete` always finds contents.
#[derive(Debug)]
pub struct TrackFile {
    path: PathBuf,
    index: usize,
    status: AtomicU8,
    contents: OnceLock<Arc<TrackContents>>,
}

impl TrackFile {
    pub(crate) fn new(path: PathBuf, index: usize) -> Self {
        Self {
            path,
            index,
            status: AtomicU8::new(TrackFileStatus::Found as u8),
            contents: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Position of the file in discovery order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn status(&self) -> TrackFileStatus {
        TrackFileStatus::load(&self.status)
    }

    /// Extracted contents, present once the file is `Complete`.
    pub fn contents(&self) -> Option<&Arc<TrackContents>> {
        self.contents.get()
    }

    /// Final path component, or the whole path if it has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Atomically moves `Found` to `Scanning`. Returns false if the file was
    /// already claimed.
    pub(crate) fn try_claim(&self) -> bool {
        self.status
            .compare_exchange(
                TrackFileStatus::Found as u8,
                TrackFileStatus::Scanning as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Attaches contents and marks the file `Complete`.
    ///
    /// Returns false if contents were already attached.
    pub(crate) fn complete(&self, contents: TrackContents) -> bool {
        if self.contents.set(Arc::new(contents)).is_err() {
            return false;
        }
        self.status
            .store(TrackFileStatus::Complete as u8, Ordering::Release);
        true
    }
}
