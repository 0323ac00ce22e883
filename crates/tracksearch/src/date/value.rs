//! Calendar day value.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

use super::parse::parse_span;

/// A calendar day without time or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    /// Earliest representable day, used for open-ended ranges.
    pub const MIN: Date = Date(NaiveDate::MIN);
    /// Latest representable day, used for open-ended ranges.
    pub const MAX: Date = Date(NaiveDate::MAX);

    /// Creates a date from its components, returning `None` when invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parses a date leniently, returning the first day of the span it names.
    ///
    /// `"2024"` parses to 2024-01-01, `"2024-06"` to 2024-06-01.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::parse_span(raw).map(|(first, _)| first)
    }

    /// Parses a date leniently, returning the first and last day of the span
    /// it names.
    pub fn parse_span(raw: &str) -> Option<(Self, Self)> {
        parse_span(raw, Local::now().date_naive()).map(|(first, last)| (Self(first), Self(last)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the underlying chrono date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Returns true if this is the first day of its month.
    pub(crate) fn is_month_start(&self) -> bool {
        self.0.day() == 1
    }

    /// Returns true if this is the last day of its month.
    pub(crate) fn is_month_end(&self) -> bool {
        last_day_of_month(self.year(), self.month()) == Some(self.day())
    }

    pub(crate) fn is_year_start(&self) -> bool {
        self.month() == 1 && self.day() == 1
    }

    pub(crate) fn is_year_end(&self) -> bool {
        self.month() == 12 && self.day() == 31
    }
}

impl From<NaiveDate> for Date {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Returns the last day of a month.
pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_of_next.pred_opt().map(|last| last.day())
}
