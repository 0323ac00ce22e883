//! Discovery and scanning of track files.
//!
//! This module feeds the shared `TrackFileList`:
//! - `TrackFileFinder` walks a directory and registers candidate files
//! - `ScanController` claims discovered files and runs a bounded pool of scans
//! - `FileScanner` extracts the searchable contents of one file

mod controller;
mod finder;
mod scanner;

// Re-export main types
pub use controller::{ScanController, MAX_PARALLEL_SCANS};
pub use finder::TrackFileFinder;
pub use scanner::{FileScanner, TrackScanner, WorkerCoordinator};
