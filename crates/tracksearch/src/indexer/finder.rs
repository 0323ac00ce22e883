//! Directory walk that registers candidate track files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use ignore::WalkBuilder;

use crate::error::Result;
use crate::extract::ExtensionFilter;
use crate::track::TrackFileList;

/// Walks one directory tree and reports every allowed regular file.
///
/// Hidden files and ignore files get no special treatment. Entries are
/// visited in file-name order so discovery indices are deterministic.
pub struct TrackFileFinder {
    root: PathBuf,
    recursive: bool,
    list: Arc<TrackFileList>,
    filter: Arc<dyn ExtensionFilter>,
    cancel: Arc<AtomicBool>,
}

impl TrackFileFinder {
    pub fn new(
        root: impl Into<PathBuf>,
        recursive: bool,
        list: Arc<TrackFileList>,
        filter: Arc<dyn ExtensionFilter>,
    ) -> Self {
        Self {
            root: root.into(),
            recursive,
            list,
            filter,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared flag that stops the walk before the next entry.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Walks the tree on the current thread and returns the number of files
    /// registered. The list is marked complete however the walk ends.
    pub fn run(&self) -> usize {
        let started = Instant::now();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(true)
            .max_depth(if self.recursive { None } else { Some(1) })
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut found = 0usize;
        for entry in builder.build() {
            if self.is_cancelled() {
                log::debug!("track discovery cancelled root={}", self.root.display());
                break;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("walk error root={} err={}", self.root.display(), err);
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
            if !is_file || !self.filter.is_allowed(entry.path()) {
                continue;
            }
            self.list.found_file(entry.into_path());
            found += 1;
        }

        self.list.set_list_complete();
        log::info!(
            "track discovery finished root={} recursive={} found={} elapsed_ms={}",
            self.root.display(),
            self.recursive,
            found,
            started.elapsed().as_millis()
        );
        found
    }

    /// Runs the walk on a dedicated thread.
    pub fn spawn(self) -> Result<JoinHandle<usize>> {
        let handle = thread::Builder::new()
            .name("track-finder".to_string())
            .spawn(move || self.run())?;
        Ok(handle)
    }
}
