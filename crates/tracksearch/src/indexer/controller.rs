//! Bounded pool of scan threads fed by list notifications.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use chrono::FixedOffset;
use parking_lot::Mutex;

use super::scanner::{FileScanner, TrackScanner, WorkerCoordinator};
use crate::config::SearchConfig;
use crate::extract::ExtractorFactory;
use crate::track::{TrackContents, TrackFile, TrackFileList, TrackFileListener};

/// Default upper bound on concurrently running scans.
pub const MAX_PARALLEL_SCANS: usize = 10;

struct ScanQueue {
    pending: VecDeque<Box<dyn TrackScanner>>,
    active: usize,
}

/// Claims newly discovered files and scans them in discovery order, with at
/// most `max_parallel` scans in flight. Each scan runs on its own thread.
pub struct ScanController {
    list: Arc<TrackFileList>,
    extractors: Arc<dyn ExtractorFactory>,
    timezone: FixedOffset,
    throttle: Duration,
    max_parallel: usize,
    queue: Mutex<ScanQueue>,
    this: Weak<ScanController>,
}

impl ScanController {
    /// Creates a controller and subscribes it to `list`.
    pub fn new(
        list: Arc<TrackFileList>,
        extractors: Arc<dyn ExtractorFactory>,
        config: &SearchConfig,
    ) -> Arc<Self> {
        let controller = Arc::new_cyclic(|this| Self {
            list: list.clone(),
            extractors,
            timezone: config.timezone(),
            throttle: config.scan_throttle(),
            max_parallel: config.parallel_scans(),
            queue: Mutex::new(ScanQueue {
                pending: VecDeque::new(),
                active: 0,
            }),
            this: this.clone(),
        });
        list.add_listener(&controller);
        controller
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn active_scans(&self) -> usize {
        self.queue.lock().active
    }

    pub fn queued_scans(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Drops pending scans. Running scans finish and are still applied.
    ///
    /// Files dropped here stay claimed and are never scanned. Later
    /// notifications are handled as usual.
    pub fn cancel(&self) {
        let mut queue = self.queue.lock();
        let dropped = queue.pending.len();
        queue.pending.clear();
        log::debug!("scan queue cancelled dropped={} active={}", dropped, queue.active);
    }

    fn scanner_for(&self, file: Arc<TrackFile>) -> Box<dyn TrackScanner> {
        Box::new(FileScanner::new(
            file,
            self.extractors.clone(),
            self.timezone,
            self.throttle,
        ))
    }

    /// Pops as many pending scans as capacity allows. Called with the queue
    /// locked; the returned scanners are started after the lock is released.
    fn take_startable(&self, queue: &mut ScanQueue) -> Vec<Box<dyn TrackScanner>> {
        let mut ready = Vec::new();
        while queue.active < self.max_parallel {
            let Some(scanner) = queue.pending.pop_front() else {
                break;
            };
            queue.active += 1;
            ready.push(scanner);
        }
        ready
    }

    fn start_all(&self, ready: Vec<Box<dyn TrackScanner>>) {
        for scanner in ready {
            self.start(scanner);
        }
    }

    fn start(&self, scanner: Box<dyn TrackScanner>) {
        let file = scanner.file().clone();
        let Some(controller) = self.this.upgrade() else {
            return;
        };
        let spawned = thread::Builder::new()
            .name(format!("track-scan-{}", file.index()))
            .spawn(move || scanner.run(controller.as_ref()));
        if let Err(err) = spawned {
            log::warn!(
                "failed to spawn scan thread path={} err={}",
                file.path().display(),
                err
            );
            self.scan_finished(&file, TrackContents::empty(self.timezone));
        }
    }
}

impl TrackFileListener for ScanController {
    fn on_change(&self, index: usize) {
        let ready = {
            let mut queue = self.queue.lock();
            for file in self.list.contents_from(index) {
                if self.list.claim_for_scanning(&file) {
                    let scanner = self.scanner_for(file);
                    queue.pending.push_back(scanner);
                }
            }
            self.take_startable(&mut queue)
        };
        self.start_all(ready);
    }
}

impl WorkerCoordinator for ScanController {
    fn scan_finished(&self, file: &Arc<TrackFile>, contents: TrackContents) {
        self.list.scan_complete(file, contents);
        let ready = {
            let mut queue = self.queue.lock();
            queue.active = queue.active.saturating_sub(1);
            self.take_startable(&mut queue)
        };
        self.start_all(ready);
    }
}
