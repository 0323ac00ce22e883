//! In-memory extractors for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::FixedOffset;
use parking_lot::Mutex;

use super::traits::{ContentExtractor, ExtractorFactory};
use crate::error::{Result, TrackSearchError};
use crate::geo::LocationFilter;
use crate::track::TrackContents;

/// Canned contents for one file name.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTrack {
    name: String,
    strings: Vec<String>,
    timestamps: Vec<String>,
    points: Vec<(f64, f64)>,
    fail: bool,
    panic: bool,
    fine_match: Option<bool>,
}

impl FakeTrack {
    pub(crate) fn with_strings(strings: &[&str]) -> Self {
        Self {
            strings: strings.iter().map(|s| s.to_string()).collect(),
            fine_match: Some(true),
            ..Self::default()
        }
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(crate) fn timestamps(mut self, timestamps: &[&str]) -> Self {
        self.timestamps = timestamps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn points(mut self, points: &[(f64, f64)]) -> Self {
        self.points = points.to_vec();
        self
    }

    /// Extraction returns an error.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Extraction panics.
    pub(crate) fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }

    /// Result of the fine location test; `None` makes it fail with an error.
    pub(crate) fn fine_match(mut self, fine_match: Option<bool>) -> Self {
        self.fine_match = fine_match;
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    tracks: Mutex<HashMap<String, FakeTrack>>,
    delay: Mutex<Duration>,
    created: AtomicUsize,
    extracted: AtomicUsize,
    fine_checks: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    order: Mutex<Vec<String>>,
}

/// Factory recognizing files by name. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeExtractorFactory {
    state: Arc<FakeState>,
}

impl FakeExtractorFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, file_name: &str, track: FakeTrack) {
        self.state.tracks.lock().insert(file_name.to_string(), track);
    }

    /// Makes every extraction take `delay`.
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock() = delay;
    }

    pub(crate) fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub(crate) fn extracted(&self) -> usize {
        self.state.extracted.load(Ordering::SeqCst)
    }

    pub(crate) fn fine_checks(&self) -> usize {
        self.state.fine_checks.load(Ordering::SeqCst)
    }

    /// File names in the order their extraction started.
    pub(crate) fn extraction_order(&self) -> Vec<String> {
        self.state.order.lock().clone()
    }

    /// Highest number of extractions observed running at once.
    pub(crate) fn max_active(&self) -> usize {
        self.state.max_active.load(Ordering::SeqCst)
    }
}

impl ExtractorFactory for FakeExtractorFactory {
    fn create_extractor(&self, path: &Path) -> Option<Box<dyn ContentExtractor>> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let track = self.state.tracks.lock().get(&name).cloned()?;
        self.state.created.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(FakeExtractor {
            name,
            track,
            state: self.state.clone(),
        }))
    }
}

struct FakeExtractor {
    name: String,
    track: FakeTrack,
    state: Arc<FakeState>,
}

impl ContentExtractor for FakeExtractor {
    fn contents(&self, timezone: FixedOffset) -> Result<TrackContents> {
        self.state.order.lock().push(self.name.clone());
        let active = self.state.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_active.fetch_max(active, Ordering::SeqCst);
        let delay = *self.state.delay.lock();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.state.active.fetch_sub(1, Ordering::SeqCst);
        self.state.extracted.fetch_add(1, Ordering::SeqCst);

        if self.track.panic {
            panic!("fake extractor panic");
        }
        if self.track.fail {
            return Err(TrackSearchError::Extraction("fake failure".to_string()));
        }

        let mut builder = TrackContents::builder(timezone);
        if !self.track.name.is_empty() {
            builder.name(&self.track.name);
        }
        for value in &self.track.strings {
            builder.add_string(value);
        }
        for timestamp in &self.track.timestamps {
            builder.add_timestamp(timestamp);
        }
        for (lat, lon) in &self.track.points {
            builder.add_point(*lat, *lon);
        }
        Ok(builder.build())
    }

    fn matches_location(&self, _filter: &LocationFilter) -> Result<bool> {
        self.state.fine_checks.fetch_add(1, Ordering::SeqCst);
        self.track
            .fine_match
            .ok_or_else(|| TrackSearchError::Extraction("fake fine check failure".to_string()))
    }
}
