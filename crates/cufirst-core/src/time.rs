//! Calendar date parsing for event records.
//!
//! Event dates arrive as loosely structured strings. This module turns them
//! into [`NaiveDate`] values and normalized [`DateSpan`] pairs:
//!
//! - A bare `YYYY-MM-DD` string is a calendar date and is never shifted
//!   through a timezone.
//! - Anything else goes through [`parse_general_date_in`], which converts
//!   timestamps into the viewer's timezone before taking the calendar date.
//! - Unparseable text yields `None`; nothing here returns an error.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Regex for a date-only string (`YYYY-MM-DD`, nothing else).
static DATE_ONLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid date-only regex")
});

/// Regex for two date-only tokens joined by `-`, `to`, an en dash or an em dash.
///
/// Both tokens must stand alone: `2025-07-0612` is not a date.
static DATE_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([0-9]{4}-[0-9]{2}-[0-9]{2})\s*(?:-|to|–|—)\s*([0-9]{4}-[0-9]{2}-[0-9]{2})\b",
    )
    .expect("Invalid date range regex")
});

/// Naive date-time layouts, tried after RFC 3339 and RFC 2822.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Human-written date layouts. `%B` also accepts abbreviated month names.
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// The resolved dates of an event.
///
/// Either side may be missing. A single-day event has `start == end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day of the event.
    pub start: Option<NaiveDate>,
    /// Last day of the event.
    pub end: Option<NaiveDate>,
}

impl DateSpan {
    /// A span with no dates at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// A span covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: Some(date),
            end: Some(date),
        }
    }

    /// A span with independently optional ends.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Returns `true` if neither end is known.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns the span with its ends swapped if they were entered backwards.
    pub fn ordered(self) -> Self {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Self::new(Some(end), Some(start)),
            _ => self,
        }
    }
}

/// Returns `true` if `text` is exactly a `YYYY-MM-DD` date-only string.
pub fn is_date_only(text: &str) -> bool {
    DATE_ONLY_REGEX.is_match(text)
}

/// Parses a `YYYY-MM-DD` string as a calendar date.
///
/// Returns `None` for any other shape, and for well-shaped but impossible
/// dates such as `2025-02-30`.
pub fn parse_date_only(text: &str) -> Option<NaiveDate> {
    if !is_date_only(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parses an event date as seen by a viewer in `tz`.
///
/// Date-only strings keep their calendar day regardless of `tz`.
pub fn parse_event_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if is_date_only(text) {
        return parse_date_only(text);
    }
    parse_general_date_in(text, tz)
}

/// Parses an event date in the local timezone.
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    parse_event_date_in(text, &Local)
}

/// General-purpose date parser for everything that is not date-only.
///
/// Timestamps with an offset are converted into `tz` first, so
/// `2025-07-04T02:00:00Z` is July 3rd for a viewer in New York.
pub fn parse_general_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(tz).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(tz).date_naive());
    }

    let naive_datetime = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok());
    if let Some(dt) = naive_datetime {
        return Some(dt.date());
    }

    let date = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok());
    if date.is_none() {
        debug!(text, "unrecognized event date");
    }
    date
}

/// Looks for a `start <sep> end` pair of date-only tokens inside `text`.
///
/// Returns the two raw tokens when found.
pub fn split_date_range(text: &str) -> Option<(&str, &str)> {
    let caps = DATE_RANGE_REGEX.captures(text)?;
    let start = caps.get(1)?.as_str();
    let end = caps.get(2)?.as_str();
    Some((start, end))
}

/// Resolves a free-form `date` string into a span.
///
/// A recognised range yields both ends; otherwise the whole string is a
/// single date.
pub fn span_from_text_in<Tz: TimeZone>(text: &str, tz: &Tz) -> DateSpan {
    if let Some((start, end)) = split_date_range(text) {
        return DateSpan::new(parse_date_only(start), parse_date_only(end));
    }
    match parse_event_date_in(text, tz) {
        Some(date) => DateSpan::single(date),
        None => DateSpan::none(),
    }
}
