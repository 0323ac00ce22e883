//! Session versioning for search restarts.
//!
//! Every `start_search` bumps the active version. Work belonging
//! to an older session checks its `SessionToken` before publishing and
//! quietly drops its output once superseded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks the active session version.
#[derive(Debug, Default, Clone)]
pub struct SessionVersionTracker {
    active_version: Arc<AtomicU64>,
}

impl SessionVersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the active version and returns it.
    ///
    /// Tokens handed out for older versions stop being current.
    pub fn next_version(&self) -> u64 {
        self.active_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the current active version without incrementing.
    pub fn current_version(&self) -> u64 {
        self.active_version.load(Ordering::SeqCst)
    }

    /// Creates a token tied to `version`.
    pub fn token_for_version(&self, version: u64) -> SessionToken {
        SessionToken {
            active_version: self.active_version.clone(),
            version,
        }
    }
}

/// Handle reporting whether its session is still the active one.
#[derive(Clone, Debug)]
pub struct SessionToken {
    active_version: Arc<AtomicU64>,
    version: u64,
}

impl SessionToken {
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn is_current(&self) -> bool {
        self.version == self.active_version.load(Ordering::Relaxed)
    }

    /// Returns `Some(())` while current, `None` once superseded, so callers
    /// can bail out with `?`.
    #[inline]
    pub fn is_cancelled(&self) -> Option<()> {
        self.is_current().then_some(())
    }
}
