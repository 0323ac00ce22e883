//! Evaluation of a filter against one file.

use super::value::Filter;
use crate::track::{SearchResult, TrackContents, TrackFileStatus};

impl Filter {
    /// Applies the filter to the result's file and records the outcome.
    ///
    /// Files without contents yet cannot be excluded by date or location and
    /// are kept optimistically. Returns the recorded match state.
    pub fn apply(&self, result: &mut SearchResult) -> bool {
        let file = result.file().clone();
        let status = file.status();
        let contents = match status {
            TrackFileStatus::Complete => file.contents().cloned(),
            _ => None,
        };

        let path = file.path().to_string_lossy();
        let (mut is_match, snippet) = self.match_text(&path, contents.as_deref());

        if is_match && self.has_date() {
            if let Some(contents) = contents.as_deref() {
                let file_dates = contents.date_range();
                is_match = file_dates.is_constrained() && file_dates.overlaps(&self.date_range());
            }
        }

        if is_match {
            if let (Some(location), Some(contents)) = (self.location(), contents.as_deref()) {
                is_match = contents.bounds().overlaps(location);
            }
        }

        result.record(status, is_match, &snippet);
        is_match
    }

    /// Returns (matched, snippet) for the text axis.
    fn match_text(&self, path: &str, contents: Option<&TrackContents>) -> (bool, String) {
        if !self.has_text() {
            let snippet = contents
                .map(|contents| contents.name_or_description().to_string())
                .unwrap_or_default();
            return (true, snippet);
        }

        let token = contents.and_then(|contents| contents.first_string_containing(self.text()));
        if let Some(token) = token {
            return (true, token.to_string());
        }

        (path.to_lowercase().contains(self.text()), String::new())
    }
}
