//! Append-only registry of discovered files.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::contents::TrackContents;
use super::file::TrackFile;

/// Receives change notifications from a `TrackFileList`.
///
/// Called synchronously on the thread that made the change, with the lowest
/// affected index. Implementations must not block.
pub trait TrackFileListener: Send + Sync {
    fn on_change(&self, index: usize);
}

/// Thread-safe, append-only, indexed list of discovered files.
///
/// Listeners are held weakly: components that both observe the list and
/// hold a reference to it do not keep each other alive.
#[derive(Default)]
pub struct TrackFileList {
    files: Mutex<Vec<Arc<TrackFile>>>,
    listeners: Mutex<Vec<Weak<dyn TrackFileListener>>>,
    list_complete: AtomicBool,
    scanned: AtomicUsize,
}

impl std::fmt::Debug for TrackFileList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackFileList")
            .field("len", &self.len())
            .field("listeners", &self.listeners.lock().len())
            .field("list_complete", &self.is_list_complete())
            .field("scanned", &self.scanned_count())
            .finish()
    }
}

impl TrackFileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for change notifications.
    pub fn add_listener<L: TrackFileListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        let weak: Weak<dyn TrackFileListener> = weak;
        self.listeners.lock().push(weak);
    }

    /// Appends a newly discovered file and notifies listeners with its index.
    pub fn found_file(&self, path: impl Into<PathBuf>) -> Arc<TrackFile> {
        let file = {
            let mut files = self.files.lock();
            let file = Arc::new(TrackFile::new(path.into(), files.len()));
            files.push(file.clone());
            file
        };
        log::trace!(
            "track file found index={} path={}",
            file.index(),
            file.path().display()
        );
        self.notify(file.index());
        file
    }

    /// Atomically claims a `Found` file for scanning.
    ///
    /// Exactly one caller wins for each file; everyone else gets false.
    pub fn claim_for_scanning(&self, file: &TrackFile) -> bool {
        file.try_claim()
    }

    /// Attaches contents, marks the file `Complete` and notifies listeners.
    ///
    /// A second completion of the same file is ignored.
    pub fn scan_complete(&self, file: &TrackFile, contents: TrackContents) {
        if !file.complete(contents) {
            log::debug!(
                "ignoring repeated scan completion index={} path={}",
                file.index(),
                file.path().display()
            );
            return;
        }
        self.scanned.fetch_add(1, Ordering::Relaxed);
        self.notify(file.index());
    }

    /// Returns a point-in-time copy of the list.
    pub fn current_contents(&self) -> Vec<Arc<TrackFile>> {
        self.files.lock().clone()
    }

    /// Returns a point-in-time copy of the files from `index` onward.
    pub fn contents_from(&self, index: usize) -> Vec<Arc<TrackFile>> {
        let files = self.files.lock();
        files.get(index..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<Arc<TrackFile>> {
        self.files.lock().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of files that reached `Complete`.
    pub fn scanned_count(&self) -> usize {
        self.scanned.load(Ordering::Relaxed)
    }

    /// Marks discovery as finished. Used for progress reporting only.
    pub fn set_list_complete(&self) {
        self.list_complete.store(true, Ordering::Release);
    }

    pub fn is_list_complete(&self) -> bool {
        self.list_complete.load(Ordering::Acquire)
    }

    fn notify(&self, index: usize) {
        let listeners: Vec<Arc<dyn TrackFileListener>> = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.on_change(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::thread;

    use crate::track::TrackFileStatus;

    #[derive(Default)]
    struct RecordingListener {
        seen: Mutex<Vec<usize>>,
    }

    impl TrackFileListener for RecordingListener {
        fn on_change(&self, index: usize) {
            self.seen.lock().push(index);
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn found_files_get_dense_indexes() {
        let list = TrackFileList::new();
        let a = list.found_file("/t/a.gpx");
        let b = list.found_file("/t/b.gpx");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().path(), b.path());
    }

    #[test]
    fn listeners_see_appends_and_completions() {
        let list = TrackFileList::new();
        let listener = Arc::new(RecordingListener::default());
        list.add_listener(&listener);

        let a = list.found_file("/t/a.gpx");
        list.found_file("/t/b.gpx");
        assert!(list.claim_for_scanning(&a));
        list.scan_complete(&a, TrackContents::empty(utc()));
        // Repeated completion does not notify again
        list.scan_complete(&a, TrackContents::empty(utc()));

        assert_eq!(*listener.seen.lock(), vec![0, 1, 0]);
        assert_eq!(list.scanned_count(), 1);
        assert_eq!(a.status(), TrackFileStatus::Complete);
    }

    #[test]
    fn dropped_listeners_are_pruned() {
        let list = TrackFileList::new();
        let listener = Arc::new(RecordingListener::default());
        list.add_listener(&listener);
        drop(listener);
        list.found_file("/t/a.gpx");
        assert!(list.listeners.lock().is_empty());
    }

    #[test]
    fn snapshot_does_not_grow() {
        let list = TrackFileList::new();
        list.found_file("/t/a.gpx");
        let snapshot = list.current_contents();
        list.found_file("/t/b.gpx");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(list.current_contents().len(), 2);
        assert_eq!(list.contents_from(1).len(), 1);
        assert!(list.contents_from(5).is_empty());
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        let list = Arc::new(TrackFileList::new());
        for i in 0..50 {
            list.found_file(format!("/t/{i}.gpx"));
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let list = list.clone();
                thread::spawn(move || {
                    list.current_contents()
                        .iter()
                        .filter(|file| list.claim_for_scanning(file))
                        .count()
                })
            })
            .collect();
        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total, 50);
        assert!(list
            .current_contents()
            .iter()
            .all(|file| file.status() == TrackFileStatus::Scanning));
    }

    #[test]
    fn list_complete_flag() {
        let list = TrackFileList::new();
        assert!(!list.is_list_complete());
        list.set_list_complete();
        assert!(list.is_list_complete());
    }
}
