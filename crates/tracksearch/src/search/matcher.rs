//! Single-flight incremental matcher.
//!
//! At most one sweep thread runs at a time. Requests arriving while a sweep
//! is in flight only lower the pending cursor; the running sweep picks it up
//! before it exits. Each sweep:
//! - re-applies the filter to files whose status changed or that were flagged
//! - runs the extractor's exact location test on coarse location matches
//! - publishes the full matching set in discovery order

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::sink::ResultSink;
use crate::extract::ExtractorFactory;
use crate::filter::{Filter, FilterChange};
use crate::geo::LocationFilter;
use crate::track::{SearchResult, TrackFile, TrackFileList, TrackFileListener, TrackFileStatus};
use crate::types::SearchHit;

#[derive(Debug, Default)]
struct SweepState {
    searching: bool,
    search_from: Option<usize>,
}

struct MatchState {
    filter: Arc<Filter>,
    /// Bumped on every filter replacement.
    generation: u64,
    results: Vec<SearchResult>,
}

/// Keeps the published result set in sync with the file list and filter.
pub struct TrackMatcher {
    list: Arc<TrackFileList>,
    extractors: Arc<dyn ExtractorFactory>,
    sink: Arc<dyn ResultSink>,
    sweep: Mutex<SweepState>,
    idle: Condvar,
    state: Mutex<MatchState>,
    sweeps: AtomicUsize,
    this: Weak<TrackMatcher>,
}

enum Check {
    Skip,
    Run {
        filter: Arc<Filter>,
        generation: u64,
        result: SearchResult,
    },
}

impl TrackMatcher {
    /// Creates a matcher with an empty filter and subscribes it to `list`.
    pub fn new(
        list: Arc<TrackFileList>,
        extractors: Arc<dyn ExtractorFactory>,
        sink: Arc<dyn ResultSink>,
    ) -> Arc<Self> {
        let matcher = Arc::new_cyclic(|this| Self {
            list: list.clone(),
            extractors,
            sink,
            sweep: Mutex::new(SweepState::default()),
            idle: Condvar::new(),
            state: Mutex::new(MatchState {
                filter: Arc::new(Filter::EMPTY),
                generation: 0,
                results: Vec::new(),
            }),
            sweeps: AtomicUsize::new(0),
            this: this.clone(),
        });
        list.add_listener(&matcher);
        matcher
    }

    /// Current filter.
    pub fn filter(&self) -> Arc<Filter> {
        self.state.lock().filter.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.sweep.lock().searching
    }

    /// Number of sweeps completed so far.
    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Snapshot of the cached per-file verdicts.
    pub fn results(&self) -> Vec<SearchResult> {
        self.state.lock().results.clone()
    }

    /// Blocks until no sweep is running or pending. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut sweep = self.sweep.lock();
        while sweep.searching {
            if self.idle.wait_until(&mut sweep, deadline).timed_out() {
                return !sweep.searching;
            }
        }
        true
    }

    /// Replaces the filter and schedules a full sweep.
    ///
    /// Results the new filter might flip are flagged: current matches when
    /// narrowing, current non-matches otherwise. An identical filter is a
    /// no-op.
    pub fn set_filter(&self, filter: Filter) -> FilterChange {
        let change = {
            let mut state = self.state.lock();
            let change = Filter::compare(&state.filter, &filter);
            if change == FilterChange::Same {
                return change;
            }
            state.filter = Arc::new(filter);
            state.generation += 1;
            reset_check_flags(&mut state.results, change);
            change
        };
        log::debug!("filter replaced change={}", change.as_str());
        self.set_index_or_start(0);
        change
    }

    /// Requests a sweep from `index`, starting one unless already running.
    pub fn set_index_or_start(&self, index: usize) {
        {
            let mut sweep = self.sweep.lock();
            sweep.search_from = Some(sweep.search_from.map_or(index, |from| from.min(index)));
            if sweep.searching {
                return;
            }
            sweep.searching = true;
        }

        let Some(matcher) = self.this.upgrade() else {
            self.finish_searching();
            return;
        };
        let spawned = thread::Builder::new()
            .name("track-matcher".to_string())
            .spawn(move || matcher.run_sweeps());
        if let Err(err) = spawned {
            log::warn!("failed to spawn matcher thread err={}", err);
            // The cursor stays pending; the next notification retries.
            self.finish_searching();
        }
    }

    fn finish_searching(&self) {
        self.sweep.lock().searching = false;
        self.idle.notify_all();
    }

    fn run_sweeps(&self) {
        loop {
            let from = {
                let mut sweep = self.sweep.lock();
                match sweep.search_from.take() {
                    Some(from) => from,
                    None => {
                        sweep.searching = false;
                        self.idle.notify_all();
                        return;
                    }
                }
            };
            self.sweep_from(from);
        }
    }

    fn sweep_from(&self, from: usize) {
        let started = Instant::now();
        let files = self.list.current_contents();
        let start = from.min(self.state.lock().results.len());

        let mut checked = 0usize;
        for file in files.iter().skip(start) {
            if self.check(file) {
                checked += 1;
            }
        }

        let hits = self.matching_hits();
        let matches = hits.len();
        self.sink.set_results(hits);
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "sweep finished start={} files={} checked={} matches={} elapsed_ms={}",
            start,
            files.len(),
            checked,
            matches,
            started.elapsed().as_millis()
        );
    }

    /// Re-evaluates one file if needed. Returns whether the filter was applied.
    fn check(&self, file: &Arc<TrackFile>) -> bool {
        let (filter, generation, mut result) = match self.prepare(file) {
            Check::Skip => return false,
            Check::Run {
                filter,
                generation,
                result,
            } => (filter, generation, result),
        };

        let coarse = filter.apply(&mut result);
        if coarse && result.status_when_checked() == TrackFileStatus::Complete {
            if let Some(location) = filter.location() {
                if !self.fine_location_match(file, location) {
                    result.demote();
                }
            }
        }

        let mut state = self.state.lock();
        if state.generation == generation {
            result.clear_recheck();
            if let Some(slot) = state.results.get_mut(file.index()) {
                *slot = result;
            }
        }
        true
    }

    /// Looks up (or creates) the cached result and decides whether it is stale.
    fn prepare(&self, file: &Arc<TrackFile>) -> Check {
        let mut state = self.state.lock();
        let index = file.index();
        if index == state.results.len() {
            state.results.push(SearchResult::new(file.clone()));
        }
        let Some(result) = state.results.get(index) else {
            return Check::Skip;
        };
        if !result.is_stale() {
            return Check::Skip;
        }
        Check::Run {
            filter: state.filter.clone(),
            generation: state.generation,
            result: result.clone(),
        }
    }

    fn fine_location_match(&self, file: &TrackFile, location: &LocationFilter) -> bool {
        let Some(extractor) = self.extractors.create_extractor(file.path()) else {
            return true;
        };
        match extractor.matches_location(location) {
            Ok(matched) => matched,
            Err(err) => {
                log::warn!(
                    "location check failed path={} err={}",
                    file.path().display(),
                    err
                );
                false
            }
        }
    }

    fn matching_hits(&self) -> Vec<SearchHit> {
        let state = self.state.lock();
        state
            .results
            .iter()
            .filter(|result| result.is_match())
            .map(SearchResult::to_hit)
            .collect()
    }
}

fn reset_check_flags(results: &mut [SearchResult], change: FilterChange) {
    match change {
        FilterChange::Same => {}
        FilterChange::Narrower => results
            .iter_mut()
            .filter(|result| result.is_match())
            .for_each(SearchResult::flag_for_recheck),
        // Different is handled like Wider: only non-matches can turn into matches.
        FilterChange::Wider | FilterChange::Different => results
            .iter_mut()
            .filter(|result| !result.is_match())
            .for_each(SearchResult::flag_for_recheck),
    }
}

impl TrackFileListener for TrackMatcher {
    fn on_change(&self, index: usize) {
        self.set_index_or_start(index);
    }
}
