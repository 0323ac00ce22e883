//! TrackSearch - control surface for one directory search at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::matcher::TrackMatcher;
use super::sink::{ResultSink, SessionSink};
use crate::config::SearchConfig;
use crate::error::{Result, TrackSearchError};
use crate::extract::{ExtensionFilter, ExtractorFactory};
use crate::filter::Filter;
use crate::geo::LocationFilter;
use crate::indexer::{ScanController, TrackFileFinder};
use crate::session::SessionVersionTracker;
use crate::track::TrackFileList;
use crate::types::{SearchProgress, SearchState};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Everything belonging to one `start_search` call.
struct Session {
    root: PathBuf,
    version: u64,
    list: Arc<TrackFileList>,
    controller: Arc<ScanController>,
    matcher: Arc<TrackMatcher>,
    sink: Arc<SessionSink>,
    finder_cancel: Arc<AtomicBool>,
    cancelled: bool,
}

impl Session {
    fn stop(&mut self) {
        self.finder_cancel.store(true, Ordering::Relaxed);
        self.controller.cancel();
        self.cancelled = true;
    }

    /// True once discovery finished and every discovered file was scanned
    /// and reported.
    fn pipeline_drained(&self) -> bool {
        self.list.is_list_complete()
            && self.list.scanned_count() >= self.list.len()
            && self.controller.active_scans() == 0
    }
}

/// Runs incremental searches over local track files.
///
/// Each `start_search` replaces the previous session. The current filter
/// survives restarts. Results are pushed to the sink given at construction;
/// output from superseded sessions is dropped.
pub struct TrackSearch {
    config: SearchConfig,
    extractors: Arc<dyn ExtractorFactory>,
    extension_filter: Arc<dyn ExtensionFilter>,
    sink: Arc<dyn ResultSink>,
    versions: SessionVersionTracker,
    publish_gate: Arc<Mutex<()>>,
    session: Mutex<Option<Session>>,
    filter: Mutex<Filter>,
}

impl std::fmt::Debug for TrackSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackSearch")
            .field("config", &self.config)
            .field("version", &self.versions.current_version())
            .field("filter", &*self.filter.lock())
            .finish()
    }
}

impl TrackSearch {
    pub fn new(
        config: SearchConfig,
        extractors: Arc<dyn ExtractorFactory>,
        extension_filter: Arc<dyn ExtensionFilter>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            config,
            extractors,
            extension_filter,
            sink,
            versions: SessionVersionTracker::new(),
            publish_gate: Arc::new(Mutex::new(())),
            session: Mutex::new(None),
            filter: Mutex::new(Filter::EMPTY),
        }
    }

    /// Uses the blacklist described by `config` as the extension filter.
    pub fn with_config_blacklist(
        config: SearchConfig,
        extractors: Arc<dyn ExtractorFactory>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        let blacklist = Arc::new(config.blacklist());
        Self::new(config, extractors, blacklist, sink)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Starts a new search under `root`, replacing any running session.
    ///
    /// `root` must be an existing directory.
    pub fn start_search(&self, root: impl AsRef<Path>, recursive: bool) -> Result<()> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|error| {
            TrackSearchError::InvalidInput(format!(
                "unable to access root path {}: {error}",
                root.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(TrackSearchError::InvalidInput(format!(
                "root path is not a directory: {}",
                root.display()
            )));
        }
        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

        let mut slot = self.session.lock();
        if let Some(previous) = slot.as_mut() {
            previous.stop();
        }
        let version = {
            let _gate = self.publish_gate.lock();
            self.versions.next_version()
        };

        let list = Arc::new(TrackFileList::new());
        let sink = Arc::new(SessionSink::new(
            self.sink.clone(),
            self.versions.token_for_version(version),
            self.publish_gate.clone(),
        ));
        let controller = ScanController::new(list.clone(), self.extractors.clone(), &self.config);
        let matcher = TrackMatcher::new(list.clone(), self.extractors.clone(), sink.clone());
        matcher.set_filter(self.filter.lock().clone());
        // Publish the empty set right away so stale rows from a previous
        // session disappear even if nothing is found.
        matcher.set_index_or_start(0);

        let finder = TrackFileFinder::new(
            root.clone(),
            recursive,
            list.clone(),
            self.extension_filter.clone(),
        );
        let finder_cancel = finder.cancel_flag();
        finder.spawn()?;

        log::info!(
            "track search started root={} recursive={} version={} max_parallel_scans={}",
            root.display(),
            recursive,
            version,
            controller.max_parallel()
        );

        *slot = Some(Session {
            root,
            version,
            list,
            controller,
            matcher,
            sink,
            finder_cancel,
            cancelled: false,
        });
        Ok(())
    }

    /// Replaces the filter of the running session (and of future sessions).
    ///
    /// The returned filter lets callers inspect how the input was parsed,
    /// e.g. `date_range().is_valid()`.
    pub fn set_filter(
        &self,
        text: &str,
        date_text: &str,
        location: Option<LocationFilter>,
    ) -> Arc<Filter> {
        let filter = Filter::new(text, date_text, location);
        *self.filter.lock() = filter.clone();
        if let Some(session) = self.session.lock().as_ref() {
            session.matcher.set_filter(filter.clone());
        }
        Arc::new(filter)
    }

    /// Current filter.
    pub fn filter(&self) -> Filter {
        self.filter.lock().clone()
    }

    /// Stops discovery and drops pending scans.
    ///
    /// Scans already running finish and their results are still matched.
    /// The session keeps publishing, so filter changes after a cancel
    /// apply to the files scanned so far.
    pub fn cancel(&self) {
        let mut slot = self.session.lock();
        let Some(session) = slot.as_mut() else {
            return;
        };
        if session.cancelled {
            return;
        }
        session.stop();
        log::info!(
            "track search cancelled root={} version={} found={} scanned={}",
            session.root.display(),
            session.version,
            session.list.len(),
            session.list.scanned_count()
        );
    }

    pub fn progress(&self) -> SearchProgress {
        let slot = self.session.lock();
        let Some(session) = slot.as_ref() else {
            return SearchProgress::idle();
        };
        let found_files = session.list.len();
        let scanned_files = session.list.scanned_count();
        let list_complete = session.list.is_list_complete();
        let state = if session.cancelled {
            SearchState::Cancelled
        } else if !list_complete {
            SearchState::Discovering
        } else if scanned_files < found_files {
            SearchState::Scanning
        } else {
            SearchState::Ready
        };
        SearchProgress {
            state,
            root: Some(session.root.clone()),
            found_files,
            scanned_files,
            active_scans: session.controller.active_scans(),
            queued_scans: session.controller.queued_scans(),
            list_complete,
            matching: session.matcher.is_searching(),
            matched_files: session.sink.published(),
        }
    }

    /// Blocks until the current session has discovered and scanned every file
    /// and the matcher is idle. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let (drained, matcher) = {
                let slot = self.session.lock();
                let Some(session) = slot.as_ref() else {
                    return true;
                };
                (
                    (session.cancelled && session.controller.active_scans() == 0)
                        || session.pipeline_drained(),
                    session.matcher.clone(),
                )
            };
            let now = Instant::now();
            if drained {
                return matcher.wait_idle(deadline.saturating_duration_since(now));
            }
            if now >= deadline {
                return false;
            }
            thread::sleep(IDLE_POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Drop for TrackSearch {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().as_mut() {
            session.stop();
        }
        self.versions.next_version();
    }
}
