use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;

use super::{ResultSink, TrackSearch};
use crate::config::SearchConfig;
use crate::error::TrackSearchError;
use crate::extract::testing::{FakeExtractorFactory, FakeTrack};
use crate::types::{SearchHit, SearchState};

const WAIT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct Recorded(Mutex<Vec<Vec<SearchHit>>>);

impl Recorded {
    fn last_names(&self) -> Vec<String> {
        self.0
            .lock()
            .last()
            .map(|hits| hits.iter().map(|hit| hit.file_name.clone()).collect())
            .unwrap_or_default()
    }

    fn count(&self) -> usize {
        self.0.lock().len()
    }
}

impl ResultSink for Recorded {
    fn set_results(&self, results: Vec<SearchHit>) {
        self.0.lock().push(results);
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"<gpx/>").expect("write fixture");
}

fn quick_config() -> SearchConfig {
    SearchConfig {
        scan_throttle_ms: 0,
        ..SearchConfig::default()
    }
}

fn search_with(factory: &FakeExtractorFactory) -> (TrackSearch, Arc<Recorded>) {
    let recorded = Arc::new(Recorded::default());
    let search = TrackSearch::with_config_blacklist(
        quick_config(),
        Arc::new(factory.clone()),
        recorded.clone(),
    );
    (search, recorded)
}

fn three_file_dir(factory: &FakeExtractorFactory) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "a.gpx");
    touch(dir.path(), "b.txt");
    touch(dir.path(), "c.bin");
    factory.insert("a.gpx", FakeTrack::with_strings(&["summit"]));
    dir
}

#[test]
fn text_filter_tracks_narrowing_end_to_end() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    let (search, recorded) = search_with(&factory);

    search.start_search(dir.path(), true).expect("start");
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx", "b.txt"]);

    search.set_filter("summit", "", None);
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx"]);
    let hits = recorded.0.lock().last().cloned().unwrap_or_default();
    assert_eq!(hits[0].snippet, "summit");

    search.set_filter("summit lodge", "", None);
    assert!(search.wait_idle(WAIT));
    assert!(recorded.last_names().is_empty());

    let progress = search.progress();
    assert_eq!(progress.state, SearchState::Ready);
    assert_eq!(progress.found_files, 2);
    assert_eq!(progress.scanned_files, 2);
    assert_eq!(progress.matched_files, 0);
    assert!(progress.list_complete);
    // Only the recognized file was handed to an extractor
    assert_eq!(factory.extracted(), 1);
}

#[test]
fn filter_set_before_start_applies_to_the_session() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    let (search, recorded) = search_with(&factory);

    search.set_filter("SUMMIT", "", None);
    search.start_search(dir.path(), true).expect("start");
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx"]);
}

#[test]
fn unreadable_date_is_reported_and_ignored() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    let (search, recorded) = search_with(&factory);

    search.start_search(dir.path(), true).expect("start");
    let filter = search.set_filter("", "banana", None);
    assert!(!filter.date_range().is_valid());
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx", "b.txt"]);
}

#[test]
fn date_filter_requires_dated_tracks() {
    let factory = FakeExtractorFactory::new();
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "spring.gpx");
    touch(dir.path(), "winter.gpx");
    touch(dir.path(), "undated.gpx");
    factory.insert(
        "spring.gpx",
        FakeTrack::with_strings(&["x"]).timestamps(&["2024-04-02T10:00:00Z"]),
    );
    factory.insert(
        "winter.gpx",
        FakeTrack::with_strings(&["x"]).timestamps(&["2023-12-30T10:00:00Z"]),
    );
    factory.insert("undated.gpx", FakeTrack::with_strings(&["x"]));
    let (search, recorded) = search_with(&factory);

    search.set_filter("", "2024", None);
    search.start_search(dir.path(), true).expect("start");
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["spring.gpx"]);
}

#[test]
fn invalid_roots_are_rejected() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    let (search, _recorded) = search_with(&factory);

    let missing = search.start_search(dir.path().join("missing"), true);
    assert!(matches!(missing, Err(TrackSearchError::InvalidInput(_))));

    let file = search.start_search(dir.path().join("a.gpx"), true);
    match file {
        Err(TrackSearchError::InvalidInput(message)) => {
            assert!(message.contains("not a directory"), "unexpected message: {message}");
        }
        other => panic!("expected invalid input, got: {other:?}"),
    }
    assert_eq!(search.progress().state, SearchState::Idle);
}

#[test]
fn restart_mutes_the_previous_session() {
    let factory = FakeExtractorFactory::new();
    factory.set_delay(Duration::from_millis(30));
    let busy = TempDir::new().expect("tempdir");
    for i in 0..20 {
        let name = format!("{i:02}.gpx");
        touch(busy.path(), &name);
        factory.insert(&name, FakeTrack::with_strings(&["x"]));
    }
    let empty = TempDir::new().expect("tempdir");
    let (search, recorded) = search_with(&factory);

    search.start_search(busy.path(), true).expect("start busy");
    thread::sleep(Duration::from_millis(40));
    search.start_search(empty.path(), true).expect("start empty");
    assert!(search.wait_idle(WAIT));
    assert!(recorded.last_names().is_empty());

    // Scans left over from the first session finish without publishing
    let published = recorded.count();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(recorded.count(), published);
    assert!(recorded.last_names().is_empty());
}

#[test]
fn cancel_keeps_matching_scanned_files() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    let (search, recorded) = search_with(&factory);

    search.start_search(dir.path(), true).expect("start");
    assert!(search.wait_idle(WAIT));
    search.cancel();
    assert_eq!(search.progress().state, SearchState::Cancelled);

    search.set_filter("summit", "", None);
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx"]);
    assert_eq!(search.progress().state, SearchState::Cancelled);
}

#[test]
fn cancel_lets_running_scans_finish() {
    let factory = FakeExtractorFactory::new();
    factory.set_delay(Duration::from_millis(60));
    let dir = TempDir::new().expect("tempdir");
    for i in 0..6 {
        let name = format!("{i}.gpx");
        touch(dir.path(), &name);
        factory.insert(&name, FakeTrack::with_strings(&["summit"]));
    }
    let config = SearchConfig {
        scan_throttle_ms: 0,
        max_parallel_scans: 1,
        ..SearchConfig::default()
    };
    let recorded = Arc::new(Recorded::default());
    let search = TrackSearch::with_config_blacklist(
        config,
        Arc::new(factory.clone()),
        recorded.clone(),
    );

    search.set_filter("summit", "", None);
    search.start_search(dir.path(), true).expect("start");
    let deadline = std::time::Instant::now() + WAIT;
    while search.progress().active_scans == 0 {
        assert!(std::time::Instant::now() < deadline, "no scan started");
        thread::sleep(Duration::from_millis(2));
    }
    search.cancel();
    assert!(search.wait_idle(WAIT));

    // The in-flight scan completed and was published; queued ones were dropped
    let progress = search.progress();
    assert_eq!(progress.active_scans, 0);
    assert_eq!(progress.queued_scans, 0);
    assert!(progress.scanned_files >= 1);
    assert!(progress.scanned_files < 6);
    assert_eq!(recorded.last_names().len(), progress.scanned_files);
}

#[test]
fn progress_is_idle_before_any_search() {
    let factory = FakeExtractorFactory::new();
    let (search, recorded) = search_with(&factory);
    let progress = search.progress();
    assert_eq!(progress.state, SearchState::Idle);
    assert!(progress.root.is_none());
    assert!(search.wait_idle(Duration::from_millis(10)));
    assert_eq!(recorded.count(), 0);
}

#[test]
fn non_recursive_search_ignores_subdirectories() {
    let factory = FakeExtractorFactory::new();
    let dir = three_file_dir(&factory);
    fs::create_dir(dir.path().join("nested")).expect("mkdir");
    touch(&dir.path().join("nested"), "deep.gpx");
    factory.insert("deep.gpx", FakeTrack::with_strings(&["summit"]));
    let (search, recorded) = search_with(&factory);

    search.set_filter("summit", "", None);
    search.start_search(dir.path(), false).expect("start");
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx"]);

    search.start_search(dir.path(), true).expect("restart");
    assert!(search.wait_idle(WAIT));
    assert_eq!(recorded.last_names(), vec!["a.gpx", "deep.gpx"]);
}
