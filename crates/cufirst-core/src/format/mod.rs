//! Date labels and event card markup.
//!
//! - [`format_date_label`] turns a [`DateSpan`] into the text shown on a card
//!   (`Jul 4–6, 2025`, `Jul 30 — Aug 2, 2025`, `Date TBA`, ...).
//! - [`CardRenderer`] renders [`EventRecord`]s into the `<article class="card">`
//!   markup inserted into the events area.
//!
//! # Example
//!
//! ```rust
//! use cufirst_core::format::{format_date_label, html_escape};
//! use cufirst_core::DateSpan;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 7, 6).unwrap();
//! assert_eq!(format_date_label(&DateSpan::new(Some(start), Some(end))), "Jul 4–6, 2025");
//! assert_eq!(html_escape("<b>"), "&lt;b&gt;");
//! ```

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::SiteResult;
use crate::event::{EventRecord, parse_events};
use crate::time::DateSpan;


/// Label shown when an event has no usable date.
pub const DEFAULT_TBA_LABEL: &str = "Date TBA";

/// Location shown when an event has none.
pub const DEFAULT_LOCATION_FALLBACK: &str = "TBD";

/// Display options for event cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardOptions {
    /// Label for events without dates.
    pub tba_label: String,
    /// Location for events without one.
    pub location_fallback: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            tba_label: DEFAULT_TBA_LABEL.to_string(),
            location_fallback: DEFAULT_LOCATION_FALLBACK.to_string(),
        }
    }
}

/// Formats a single calendar date as `Jul 4, 2025`.
pub fn format_single_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Formats a date span with the default "Date TBA" placeholder.
pub fn format_date_label(span: &DateSpan) -> String {
    format_date_label_or(span, DEFAULT_TBA_LABEL)
}

/// Formats a date span, using `tba` when neither end is known.
///
/// Ranges are compressed as far as the shared month and year allow:
/// `Jul 4–6, 2025`, `Jul 30 — Aug 2, 2025`, `Dec 30, 2025 — Jan 2, 2026`.
/// A range entered backwards is shown in calendar order.
pub fn format_date_label_or(span: &DateSpan, tba: &str) -> String {
    let span = span.ordered();
    match (span.start, span.end) {
        (None, None) => tba.to_string(),
        (Some(date), None) | (None, Some(date)) => format_single_date(date),
        (Some(start), Some(end)) if start == end => format_single_date(start),
        (Some(start), Some(end)) if start.year() == end.year() && start.month() == end.month() => {
            format!(
                "{} {}–{}, {}",
                start.format("%b"),
                start.day(),
                end.day(),
                start.year()
            )
        }
        (Some(start), Some(end)) if start.year() == end.year() => format!(
            "{} — {}, {}",
            start.format("%b %-d"),
            end.format("%b %-d"),
            start.year()
        ),
        (Some(start), Some(end)) => format!(
            "{} — {}",
            format_single_date(start),
            format_single_date(end)
        ),
    }
}

/// Renders event records into card markup.
///
/// The timezone is the viewer's: it only matters for date strings that carry
/// a time and an offset. Date-only strings render the same everywhere.
#[derive(Debug, Clone)]
pub struct CardRenderer<Tz: TimeZone = Local> {
    options: CardOptions,
    tz: Tz,
}

impl CardRenderer<Local> {
    /// Creates a renderer for the local timezone.
    pub fn new(options: CardOptions) -> Self {
        Self::in_timezone(options, Local)
    }

    /// Creates a renderer with default options for the local timezone.
    pub fn with_defaults() -> Self {
        Self::new(CardOptions::default())
    }
}

impl<Tz: TimeZone> CardRenderer<Tz> {
    /// Creates a renderer for an explicit viewer timezone.
    pub fn in_timezone(options: CardOptions, tz: Tz) -> Self {
        Self { options, tz }
    }

    /// Returns the display options.
    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    /// Returns the date label for an event.
    pub fn label(&self, event: &EventRecord) -> String {
        format_date_label_or(&event.dates_in(&self.tz), &self.options.tba_label)
    }

    /// Renders one event card.
    ///
    /// Every text field is escaped, including title and link.
    pub fn render_card(&self, event: &EventRecord) -> String {
        let title = html_escape(&event.title);
        let when = html_escape(&self.label(event));
        let location = html_escape(event.location_or(&self.options.location_fallback));
        let desc = html_escape(&event.desc);
        let details = event
            .details_link()
            .map(|link| {
                format!(
                    "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Details</a></p>\n",
                    html_escape(link)
                )
            })
            .unwrap_or_default();

        format!(
            "<article class=\"card\">\n\
             <h3>{title}</h3>\n\
             <div class=\"meta\">{when} — {location}</div>\n\
             <p>{desc}</p>\n\
             {details}\
             </article>\n"
        )
    }

    /// Renders a list of events, in order.
    pub fn render_cards(&self, events: &[EventRecord]) -> String {
        events.iter().map(|e| self.render_card(e)).collect()
    }

    /// Parses and renders an inline events payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a JSON array of events.
    pub fn render_payload(&self, payload: &str) -> SiteResult<String> {
        let events = parse_events(payload)?;
        Ok(self.render_cards(&events))
    }

    /// Like [`render_payload`](Self::render_payload), but logs a malformed
    /// payload and renders nothing.
    pub fn render_payload_or_empty(&self, payload: &str) -> String {
        self.render_payload(payload).unwrap_or_else(|err| {
            error!(error = %err, "failed to parse events");
            String::new()
        })
    }
}

/// Renders an inline events payload with default options in the local
/// timezone.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON array of events.
pub fn render_event_cards(payload: &str) -> SiteResult<String> {
    CardRenderer::with_defaults().render_payload(payload)
}

/// Escapes text for HTML display.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
