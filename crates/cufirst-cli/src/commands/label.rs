//! `cufirst label`

use chrono::{Local, TimeZone};
use cufirst_core::CardOptions;
use cufirst_core::format::format_date_label_or;
use cufirst_core::time::span_from_text_in;

/// Formats free date text the way a card would.
///
/// The text is treated as an event's `date` field, so ranges are recognized.
pub fn label_in<Tz: TimeZone>(text: &str, options: &CardOptions, tz: &Tz) -> String {
    let span = span_from_text_in(text, tz);
    format_date_label_or(&span, &options.tba_label)
}

/// Same as [`label_in`] for the local timezone.
pub fn label(text: &str, options: &CardOptions) -> String {
    label_in(text, options, &Local)
}
