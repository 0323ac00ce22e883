//! Search settings.
//!
//! Hosts embed `SearchConfig` in their own settings file; this crate only
//! reads it. Every field has a default so partial documents deserialize.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::ExtensionBlacklist;
use crate::indexer::MAX_PARALLEL_SCANS;

/// Default pause after each extraction, in milliseconds.
pub const DEFAULT_SCAN_THROTTLE_MS: u64 = 100;

/// User-configurable search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on concurrently running scans.
    pub max_parallel_scans: usize,
    /// Pause after each extraction so scanning does not saturate the disk.
    pub scan_throttle_ms: u64,
    /// Whether discovery descends into subdirectories.
    pub recursive: bool,
    /// Offset from UTC used to turn track timestamps into calendar dates.
    pub timezone_offset_minutes: i32,
    /// Extensions never scanned. `None` uses the built-in list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklisted_extensions: Option<Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_parallel_scans: MAX_PARALLEL_SCANS,
            scan_throttle_ms: DEFAULT_SCAN_THROTTLE_MS,
            recursive: true,
            timezone_offset_minutes: 0,
            blacklisted_extensions: None,
        }
    }
}

impl SearchConfig {
    /// Timezone for date conversion. Out-of-range offsets fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        let seconds = self.timezone_offset_minutes.saturating_mul(60);
        FixedOffset::east_opt(seconds).unwrap_or_else(|| {
            log::warn!(
                "invalid timezone offset minutes={}, using UTC",
                self.timezone_offset_minutes
            );
            Utc.fix()
        })
    }

    pub fn scan_throttle(&self) -> Duration {
        Duration::from_millis(self.scan_throttle_ms)
    }

    /// Scan pool size, never below one.
    pub fn parallel_scans(&self) -> usize {
        self.max_parallel_scans.max(1)
    }

    /// Blacklist built from the configured extensions.
    pub fn blacklist(&self) -> ExtensionBlacklist {
        match &self.blacklisted_extensions {
            Some(extensions) => ExtensionBlacklist::from_extensions(extensions),
            None => ExtensionBlacklist::default(),
        }
    }
}
