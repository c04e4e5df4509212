//! Event records from the inline events payload.
//!
//! The payload is a JSON array. Each record carries its dates in one of two
//! shapes, `{"date": "..."}` or `{"start": "...", "end": "..."}`. The shape
//! is decided once during deserialization and stored as an [`EventWhen`].

use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{SiteError, SiteResult};
use crate::time::{DateSpan, parse_event_date_in, span_from_text_in};

/// Link value that means "no details page".
pub const PLACEHOLDER_LINK: &str = "#";

/// Where an event sits in the calendar, as written by the site editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventWhen {
    /// Explicit `start` / `end` fields; either may be missing.
    Range {
        start: Option<String>,
        end: Option<String>,
    },
    /// A single `date` string, which may itself contain a range.
    Text(String),
    /// No usable date information.
    #[default]
    Unscheduled,
}

impl EventWhen {
    /// Resolves the dates as seen by a viewer in `tz`.
    pub fn resolve_in<Tz: TimeZone>(&self, tz: &Tz) -> DateSpan {
        match self {
            Self::Range { start, end } => DateSpan::new(
                start.as_deref().and_then(|s| parse_event_date_in(s, tz)),
                end.as_deref().and_then(|s| parse_event_date_in(s, tz)),
            ),
            Self::Text(text) => span_from_text_in(text, tz),
            Self::Unscheduled => DateSpan::none(),
        }
    }

    /// Returns `true` if the record carried any date text at all.
    pub fn has_date_info(&self) -> bool {
        !matches!(self, Self::Unscheduled)
    }
}

/// A single calendar entry shown as a card on the events page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEvent")]
pub struct EventRecord {
    /// Event title.
    pub title: String,
    /// Free-text description; empty when missing.
    pub desc: String,
    /// Venue, if given.
    pub location: Option<String>,
    /// Details page URL, if given.
    pub link: Option<String>,
    /// Date information.
    pub when: EventWhen,
}

impl EventRecord {
    /// Creates an unscheduled event with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builder method to set a single `date` string.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.when = EventWhen::Text(date.into());
        self
    }

    /// Builder method to set explicit start and end strings.
    pub fn with_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.when = EventWhen::Range {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        };
        self
    }

    /// Builder method to set the description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the details link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Returns the link worth showing as a "Details" affordance.
    ///
    /// Missing, blank and placeholder (`#`) links yield `None`.
    pub fn details_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty() && *link != PLACEHOLDER_LINK)
    }

    /// Returns the location, or `fallback` when it is missing or blank.
    pub fn location_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// Resolves the event dates in the given timezone.
    pub fn dates_in<Tz: TimeZone>(&self, tz: &Tz) -> DateSpan {
        self.when.resolve_in(tz)
    }
}

/// Resolves the dates of an event for a viewer in the local timezone.
pub fn extract_event_dates(event: &EventRecord) -> DateSpan {
    event.dates_in(&Local)
}

/// Parses the inline events payload.
///
/// A blank payload is an empty list.
///
/// # Errors
///
/// Returns [`SiteError::Events`] if the payload is not a JSON array of
/// objects.
pub fn parse_events(payload: &str) -> SiteResult<Vec<EventRecord>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(payload).map_err(SiteError::Events)
}

/// Wire shape of an event record, before the date shape is decided.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEvent {
    title: Option<String>,
    desc: Option<String>,
    location: Option<String>,
    link: Option<String>,
    date: Option<Value>,
    start: Option<Value>,
    end: Option<Value>,
}

/// Keeps non-blank strings, drops everything else.
fn date_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            debug!(value = %other, "ignoring non-string event date");
            None
        }
    }
}

impl From<RawEvent> for EventRecord {
    fn from(raw: RawEvent) -> Self {
        let start = date_text(raw.start);
        let end = date_text(raw.end);

        let when = if start.is_some() || end.is_some() {
            EventWhen::Range { start, end }
        } else if let Some(text) = date_text(raw.date) {
            EventWhen::Text(text)
        } else {
            EventWhen::Unscheduled
        };

        Self {
            title: raw.title.unwrap_or_default(),
            desc: raw.desc.unwrap_or_default(),
            location: raw.location,
            link: raw.link,
            when,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod deserialize {
        use super::*;

        #[test]
        fn single_date_shape() {
            let events =
                parse_events(r#"[{"title":"Picnic","date":"2025-07-04","location":"Park"}]"#)
                    .unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].title, "Picnic");
            assert_eq!(events[0].when, EventWhen::Text("2025-07-04".to_string()));
            assert_eq!(events[0].location.as_deref(), Some("Park"));
            assert_eq!(events[0].desc, "");
        }

        #[test]
        fn start_end_shape_wins_over_date() {
            let events = parse_events(
                r#"[{"title":"Camp","date":"ignored","start":"2025-07-04","end":"2025-07-06"}]"#,
            )
            .unwrap();
            assert_eq!(
                events[0].when,
                EventWhen::Range {
                    start: Some("2025-07-04".to_string()),
                    end: Some("2025-07-06".to_string()),
                }
            );
        }

        #[test]
        fn start_without_end() {
            let events = parse_events(r#"[{"title":"Open house","start":"2025-07-04"}]"#).unwrap();
            assert_eq!(
                events[0].when,
                EventWhen::Range {
                    start: Some("2025-07-04".to_string()),
                    end: None,
                }
            );
        }

        #[test]
        fn non_string_date_is_unscheduled() {
            let events = parse_events(r#"[{"title":"x","date":20250704}]"#).unwrap();
            assert_eq!(events[0].when, EventWhen::Unscheduled);
            assert!(!events[0].when.has_date_info());
        }

        #[test]
        fn blank_date_is_unscheduled() {
            let events = parse_events(r#"[{"title":"x","date":"  ","start":null}]"#).unwrap();
            assert_eq!(events[0].when, EventWhen::Unscheduled);
        }

        #[test]
        fn missing_fields_default() {
            let events = parse_events("[{}]").unwrap();
            assert_eq!(events[0], EventRecord::default());
        }

        #[test]
        fn blank_payload_is_empty_list() {
            assert!(parse_events("").unwrap().is_empty());
            assert!(parse_events("  \n").unwrap().is_empty());
            assert!(parse_events("[]").unwrap().is_empty());
        }

        #[test]
        fn malformed_payload_errors() {
            let err = parse_events("[{\"title\": ").unwrap_err();
            assert!(matches!(err, SiteError::Events(_)));
            assert!(parse_events(r#"{"title":"not a list"}"#).is_err());
        }
    }

    mod dates {
        use super::*;

        #[test]
        fn range_inside_date_field() {
            let event = EventRecord::new("Camp").with_date("2025-07-04 to 2025-07-06");
            let span = event.dates_in(&Utc);
            assert_eq!(span.start, Some(date(2025, 7, 4)));
            assert_eq!(span.end, Some(date(2025, 7, 6)));
        }

        #[test]
        fn local_extraction_of_range() {
            let event = EventRecord::new("Camp").with_date("2025-07-04 to 2025-07-06");
            let span = extract_event_dates(&event);
            assert_eq!(span, DateSpan::new(Some(date(2025, 7, 4)), Some(date(2025, 7, 6))));
        }

        #[test]
        fn explicit_range_parses_each_side() {
            let west = FixedOffset::west_opt(7 * 3600).unwrap();
            let event = EventRecord::new("Fair").with_range(Some("2025-07-30"), Some("garbage"));
            assert_eq!(
                event.dates_in(&west),
                DateSpan::new(Some(date(2025, 7, 30)), None)
            );
        }

        #[test]
        fn single_date_field() {
            let event = EventRecord::new("Picnic").with_date("2025-07-04");
            assert_eq!(event.dates_in(&Utc), DateSpan::single(date(2025, 7, 4)));
        }

        #[test]
        fn no_date_information() {
            assert!(EventRecord::new("Someday").dates_in(&Utc).is_empty());
        }
    }

    mod fields {
        use super::*;

        #[test]
        fn details_link_filters_placeholders() {
            assert_eq!(EventRecord::new("a").details_link(), None);
            assert_eq!(EventRecord::new("a").with_link("#").details_link(), None);
            assert_eq!(EventRecord::new("a").with_link("  ").details_link(), None);
            assert_eq!(
                EventRecord::new("a")
                    .with_link("https://example.org/e/1")
                    .details_link(),
                Some("https://example.org/e/1")
            );
        }

        #[test]
        fn location_fallback() {
            assert_eq!(EventRecord::new("a").location_or("TBD"), "TBD");
            assert_eq!(EventRecord::new("a").with_location("").location_or("TBD"), "TBD");
            assert_eq!(
                EventRecord::new("a").with_location("Gym").location_or("TBD"),
                "Gym"
            );
        }
    }
}
