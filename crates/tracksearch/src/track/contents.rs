//! Searchable contents extracted from a track file.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use fnv::FnvHashSet;

use crate::date::{Date, DateRange};
use crate::geo::TrackBounds;

/// Naive timestamp layouts accepted by `add_timestamp`, taken as already
/// being in the contents' timezone.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Contents extracted from one file. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackContents {
    name_or_description: String,
    strings: Vec<String>,
    date_range: DateRange,
    bounds: TrackBounds,
    timezone: FixedOffset,
}

impl TrackContents {
    /// Contents of a file that yielded no data.
    pub fn empty(timezone: FixedOffset) -> Self {
        Self {
            name_or_description: String::new(),
            strings: Vec::new(),
            date_range: DateRange::Empty,
            bounds: TrackBounds::new(),
            timezone,
        }
    }

    pub fn builder(timezone: FixedOffset) -> TrackContentsBuilder {
        TrackContentsBuilder::new(timezone)
    }

    /// First non-empty of the track's name and description.
    pub fn name_or_description(&self) -> &str {
        &self.name_or_description
    }

    /// Lower-cased searchable strings, in the order they were added.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Range of dates seen in the file, `Empty` if none.
    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn bounds(&self) -> &TrackBounds {
        &self.bounds
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Returns the first string containing `needle` (which must be lower-cased).
    pub fn first_string_containing(&self, needle: &str) -> Option<&str> {
        self.strings
            .iter()
            .find(|value| value.contains(needle))
            .map(String::as_str)
    }

    /// Returns true if extraction produced anything at all.
    pub fn has_data(&self) -> bool {
        !self.name_or_description.is_empty()
            || !self.strings.is_empty()
            || self.date_range.is_constrained()
            || !self.bounds.is_empty()
    }
}

/// Accumulates contents while an extractor walks a file.
#[derive(Debug)]
pub struct TrackContentsBuilder {
    name: String,
    description: String,
    strings: Vec<String>,
    seen: FnvHashSet<String>,
    date_range: DateRange,
    bounds: TrackBounds,
    timezone: FixedOffset,
}

impl TrackContentsBuilder {
    pub fn new(timezone: FixedOffset) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            strings: Vec::new(),
            seen: FnvHashSet::default(),
            date_range: DateRange::Empty,
            bounds: TrackBounds::new(),
            timezone,
        }
    }

    /// Sets the track name. It is also made searchable.
    pub fn name(&mut self, name: &str) -> &mut Self {
        if self.name.is_empty() {
            self.name = name.trim().to_string();
        }
        self.add_string(name)
    }

    /// Sets the track description. It is also made searchable.
    pub fn description(&mut self, description: &str) -> &mut Self {
        if self.description.is_empty() {
            self.description = description.trim().to_string();
        }
        self.add_string(description)
    }

    /// Adds a searchable string. Blank and duplicate strings are dropped.
    pub fn add_string(&mut self, value: &str) -> &mut Self {
        let normalized = value.trim().to_lowercase();
        if !normalized.is_empty() && self.seen.insert(normalized.clone()) {
            self.strings.push(normalized);
        }
        self
    }

    /// Feeds a timestamp into the date range.
    ///
    /// Accepts RFC 3339 timestamps (converted into the contents' timezone),
    /// naive `YYYY-MM-DD[T ]HH:MM:SS` timestamps and bare dates. Returns false
    /// if the value could not be read.
    pub fn add_timestamp(&mut self, raw: &str) -> bool {
        match parse_timestamp_date(raw.trim(), self.timezone) {
            Some(date) => {
                self.add_date(date);
                true
            }
            None => false,
        }
    }

    pub fn add_date(&mut self, date: Date) -> &mut Self {
        self.date_range = self.date_range.extend(date);
        self
    }

    pub fn add_point(&mut self, lat: f64, lon: f64) -> &mut Self {
        self.bounds.add_point(lat, lon);
        self
    }

    pub fn build(self) -> TrackContents {
        let name_or_description = if self.name.is_empty() {
            self.description
        } else {
            self.name
        };
        TrackContents {
            name_or_description,
            strings: self.strings,
            date_range: self.date_range,
            bounds: self.bounds,
            timezone: self.timezone,
        }
    }
}

fn parse_timestamp_date(raw: &str, timezone: FixedOffset) -> Option<Date> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&timezone).date_naive().into());
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date().into());
        }
    }

    match Date::parse_span(raw) {
        Some((first, last)) if first == last => Some(first),
        _ => None,
    }
}
