//! Lenient date parsing.
//!
//! ## Supported Syntax
//!
//! ### Keywords
//! - `today`, `yesterday`
//! - `thismonth`, `lastmonth`
//! - `thisyear`, `lastyear`
//!
//! ### Absolute Dates
//! - `YYYY`
//! - `YYYY-MM`, `MM-YYYY`
//! - `YYYY-MM-DD`, `DD-MM-YYYY`, falling back to `MM-DD-YYYY`
//!
//! Any of `-`, `/` or `.` may separate the components.
//!
//! ### Ranges
//! - `2024-01..2024-03`, `2024-01 - 2024-03`, `2024-01 to 2024-03`
//! - `..2024-12-31` (up to date)
//! - `2024-01-01..` (from date)

use chrono::{Datelike, NaiveDate};

use super::value::last_day_of_month;

/// Separators that split a range into its two sides, in priority order.
const RANGE_SEPARATORS: [&str; 3] = ["..", " to ", " - "];

/// Splits a range expression into its (trimmed) sides.
///
/// Returns `None` if the input is not a range, or if both sides are empty.
pub(super) fn split_range(raw: &str) -> Option<(&str, &str)> {
    for separator in RANGE_SEPARATORS {
        if let Some(split) = raw.find(separator) {
            let start = raw[..split].trim();
            let end = raw[split + separator.len()..].trim();
            if start.is_empty() && end.is_empty() {
                return None;
            }
            return Some((start, end));
        }
    }
    None
}

/// Parses a single date value into the first and last day of the span it names.
pub(super) fn parse_span(raw: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(span) = keyword_span(trimmed, today) {
        return Some(span);
    }

    parse_absolute_span(trimmed)
}

/// Converts a date keyword to a span.
fn keyword_span(keyword: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let lower = keyword.to_ascii_lowercase();
    let year = today.year();
    let month = today.month();

    match lower.as_str() {
        "today" => Some((today, today)),
        "yesterday" => {
            let date = today.pred_opt()?;
            Some((date, date))
        }
        "thismonth" => month_span(year, month),
        "lastmonth" => {
            let (year, month) = if month == 1 {
                (year.checked_sub(1)?, 12)
            } else {
                (year, month - 1)
            };
            month_span(year, month)
        }
        "thisyear" => year_span(year),
        "lastyear" => year_span(year.checked_sub(1)?),
        _ => None,
    }
}

/// Parses a numeric date with an implied precision of year, month or day.
fn parse_absolute_span(raw: &str) -> Option<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = raw.split(['-', '/', '.']).map(str::trim).collect();
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    match parts.as_slice() {
        [year] if year.len() == 4 => year_span(year.parse().ok()?),
        [first, second] => {
            if first.len() == 4 {
                month_span(first.parse().ok()?, second.parse().ok()?)
            } else if second.len() == 4 {
                month_span(second.parse().ok()?, first.parse().ok()?)
            } else {
                None
            }
        }
        [first, second, third] => {
            let date = if first.len() == 4 {
                NaiveDate::from_ymd_opt(
                    first.parse().ok()?,
                    second.parse().ok()?,
                    third.parse().ok()?,
                )
            } else if third.len() == 4 {
                let year = third.parse().ok()?;
                let a = first.parse().ok()?;
                let b = second.parse().ok()?;
                // Day-first, then month-first when the day-first reading is impossible
                NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
            } else {
                None
            };
            date.map(|date| (date, date))
        }
        _ => None,
    }
}

/// Returns the span for a calendar month.
fn month_span(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month)?)?;
    Some((start, end))
}

/// Returns the span for a calendar year.
fn year_span(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((start, end))
}
