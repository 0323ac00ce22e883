//! One-shot extraction of a single file.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::FixedOffset;

use crate::extract::ExtractorFactory;
use crate::track::{TrackContents, TrackFile};

/// Receives finished scans.
pub trait WorkerCoordinator: Send + Sync {
    fn scan_finished(&self, file: &Arc<TrackFile>, contents: TrackContents);
}

/// A unit of scanning work bound to one file.
pub trait TrackScanner: Send {
    fn file(&self) -> &Arc<TrackFile>;

    /// Produces the file's contents. Never fails; problems yield empty contents.
    fn scan(&self) -> TrackContents;

    /// Scans and hands the result to `coordinator`.
    fn run(self: Box<Self>, coordinator: &dyn WorkerCoordinator) {
        let contents = self.scan();
        coordinator.scan_finished(self.file(), contents);
    }
}

/// Scanner backed by an `ExtractorFactory`.
pub struct FileScanner {
    file: Arc<TrackFile>,
    extractors: Arc<dyn ExtractorFactory>,
    timezone: FixedOffset,
    throttle: Duration,
}

impl FileScanner {
    pub fn new(
        file: Arc<TrackFile>,
        extractors: Arc<dyn ExtractorFactory>,
        timezone: FixedOffset,
        throttle: Duration,
    ) -> Self {
        Self {
            file,
            extractors,
            timezone,
            throttle,
        }
    }

    fn extract(&self) -> Option<TrackContents> {
        let path = self.file.path();
        let Some(extractor) = self.extractors.create_extractor(path) else {
            log::trace!("no extractor path={}", path.display());
            return None;
        };
        match extractor.contents(self.timezone) {
            Ok(contents) => Some(contents),
            Err(err) => {
                log::warn!("extraction failed path={} err={}", path.display(), err);
                None
            }
        }
    }
}

impl TrackScanner for FileScanner {
    fn file(&self) -> &Arc<TrackFile> {
        &self.file
    }

    fn scan(&self) -> TrackContents {
        let started = Instant::now();
        let extracted = match panic::catch_unwind(AssertUnwindSafe(|| self.extract())) {
            Ok(contents) => contents,
            Err(_) => {
                log::warn!("extractor panicked path={}", self.file.path().display());
                None
            }
        };

        let contents = extracted.unwrap_or_else(|| TrackContents::empty(self.timezone));
        if !self.throttle.is_zero() {
            thread::sleep(self.throttle);
        }
        log::debug!(
            "scanned path={} index={} strings={} elapsed_ms={}",
            self.file.path().display(),
            self.file.index(),
            contents.strings().len(),
            started.elapsed().as_millis()
        );
        contents
    }
}
