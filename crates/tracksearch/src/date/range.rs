//! Inclusive day ranges with a containment/overlap/inclusion algebra.

use std::fmt;

use chrono::{Local, NaiveDate};

use super::parse::{parse_span, split_range};
use super::value::Date;

/// An inclusive range of calendar days.
///
/// `Empty` and `Invalid` both impose no constraint: every date is contained
/// and every range overlaps. `Invalid` additionally reports
/// `is_valid() == false` so callers can flag unparseable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateRange {
    #[default]
    Empty,
    Invalid,
    Span {
        from: Date,
        to: Date,
    },
}

/// Granularity used when rendering a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Year,
    Month,
    Day,
}

impl DateRange {
    /// Creates a span, swapping the bounds if they are reversed.
    pub fn new(a: Date, b: Date) -> Self {
        if a <= b {
            Self::Span { from: a, to: b }
        } else {
            Self::Span { from: b, to: a }
        }
    }

    /// Creates a span covering a single day.
    pub fn single(date: Date) -> Self {
        Self::Span {
            from: date,
            to: date,
        }
    }

    /// Parses user input into a range.
    ///
    /// Blank input yields `Empty`; anything that cannot be read as a date or
    /// a range of dates yields `Invalid`.
    pub fn parse_string(raw: &str) -> Self {
        Self::parse_relative_to(raw, Local::now().date_naive())
    }

    /// Parses user input, resolving keywords such as `today` against `today`.
    pub fn parse_relative_to(raw: &str, today: NaiveDate) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        if let Some((start_raw, end_raw)) = split_range(trimmed) {
            let start = if start_raw.is_empty() {
                Some((Date::MIN, Date::MIN))
            } else {
                parse_span(start_raw, today).map(|(first, last)| (first.into(), last.into()))
            };
            let end = if end_raw.is_empty() {
                Some((Date::MAX, Date::MAX))
            } else {
                parse_span(end_raw, today).map(|(first, last)| (first.into(), last.into()))
            };
            return match (start, end) {
                (Some((start_first, _)), Some((_, end_last))) if start_first <= end_last => {
                    Self::new(start_first, end_last)
                }
                // Reversed: the later side supplies the end of the range
                (Some((_, start_last)), Some((end_first, _))) => Self::new(end_first, start_last),
                _ => Self::Invalid,
            };
        }

        match parse_span(trimmed, today) {
            Some((first, last)) => Self::new(first.into(), last.into()),
            None => Self::Invalid,
        }
    }

    /// Returns false only for the `Invalid` sentinel.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns true for the `Empty` sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if this range actually restricts dates.
    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::Span { .. })
    }

    pub fn from(&self) -> Option<Date> {
        match self {
            Self::Span { from, .. } => Some(*from),
            _ => None,
        }
    }

    pub fn to(&self) -> Option<Date> {
        match self {
            Self::Span { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// Returns true if `date` lies inside the range.
    pub fn contains(&self, date: Date) -> bool {
        match self {
            Self::Span { from, to } => *from <= date && date <= *to,
            _ => true,
        }
    }

    /// Returns true if the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        match (self, other) {
            (
                Self::Span { from, to },
                Self::Span {
                    from: other_from,
                    to: other_to,
                },
            ) => from <= other_to && other_from <= to,
            _ => true,
        }
    }

    /// Returns true if every date accepted by `other` is accepted by `self`.
    pub fn includes(&self, other: &DateRange) -> bool {
        match (self, other) {
            (Self::Span { from, to }, Self::Span { from: of, to: ot }) => from <= of && ot <= to,
            (Self::Span { .. }, _) => false,
            _ => true,
        }
    }

    /// Returns the smallest range containing both this range and `date`.
    ///
    /// The sentinels are treated as "no dates seen yet".
    pub fn extend(self, date: Date) -> Self {
        match self {
            Self::Span { from, to } => Self::Span {
                from: from.min(date),
                to: to.max(date),
            },
            _ => Self::single(date),
        }
    }

    /// Renders the range in its shortest form that parses back to itself.
    ///
    /// A range spanning exactly one year renders as `2024`, exactly one month
    /// as `2024-02`. Sentinels render as an empty string.
    pub fn to_short_string(&self) -> String {
        let Self::Span { from, to } = self else {
            return String::new();
        };

        let open_start = *from == Date::MIN;
        let open_end = *to == Date::MAX;
        match (open_start, open_end) {
            (true, true) => String::new(),
            (true, false) => format!("..{}", render(to, end_precision(to))),
            (false, true) => format!("{}..", render(from, start_precision(from))),
            (false, false) => {
                let precision = start_precision(from).coarsest_common(end_precision(to));
                let start = render(from, precision);
                let end = render(to, precision);
                if start == end {
                    start
                } else {
                    format!("{start}..{end}")
                }
            }
        }
    }
}

impl Precision {
    fn coarsest_common(self, other: Precision) -> Precision {
        match (self, other) {
            (Self::Year, Self::Year) => Self::Year,
            (Self::Day, _) | (_, Self::Day) => Self::Day,
            _ => Self::Month,
        }
    }
}

fn start_precision(date: &Date) -> Precision {
    if date.is_year_start() {
        Precision::Year
    } else if date.is_month_start() {
        Precision::Month
    } else {
        Precision::Day
    }
}

fn end_precision(date: &Date) -> Precision {
    if date.is_year_end() {
        Precision::Year
    } else if date.is_month_end() {
        Precision::Month
    } else {
        Precision::Day
    }
}

fn render(date: &Date, precision: Precision) -> String {
    match precision {
        Precision::Year => format!("{:04}", date.year()),
        Precision::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Precision::Day => date.to_string(),
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_string())
    }
}
