//! Filter value.

use crate::date::DateRange;
use crate::geo::LocationFilter;

/// Immutable composite filter.
///
/// Each axis is optional: empty text, a non-span date range and a missing
/// location all mean "no constraint". `Filter::EMPTY` matches everything.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    text: String,
    date_range: DateRange,
    location: Option<LocationFilter>,
}

impl Filter {
    /// The filter that accepts every file.
    pub const EMPTY: Filter = Filter {
        text: String::new(),
        date_range: DateRange::Empty,
        location: None,
    };

    /// Builds a filter from raw user input.
    ///
    /// Text is trimmed and lower-cased; the date text is parsed leniently and
    /// becomes `DateRange::Invalid` when unreadable.
    pub fn new(text: &str, date_text: &str, location: Option<LocationFilter>) -> Self {
        Self::from_parts(text, DateRange::parse_string(date_text), location)
    }

    /// Builds a filter from an already parsed date range.
    pub fn from_parts(text: &str, date_range: DateRange, location: Option<LocationFilter>) -> Self {
        Self {
            text: text.trim().to_lowercase(),
            date_range,
            location,
        }
    }

    /// Normalized search text, empty when unconstrained.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn location(&self) -> Option<&LocationFilter> {
        self.location.as_ref()
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_date(&self) -> bool {
        self.date_range.is_constrained()
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Returns true if no axis constrains anything.
    pub fn is_empty(&self) -> bool {
        !self.has_text() && !self.has_date() && !self.has_location()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::EMPTY
    }
}
