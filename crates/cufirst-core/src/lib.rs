//! Core site logic: event dates, card rendering, contact form, slideshow

pub mod config;
pub mod contact;
pub mod error;
pub mod event;
pub mod format;
pub mod nav;
pub mod slideshow;
pub mod time;
#[cfg(feature = "subscriber")]
pub mod tracing;

pub use config::{ContactSettings, SiteConfig, SlideshowSettings};
pub use contact::{
    FormFields, FormReply, FormStatus, OriginAllowList, ReplyStatus, Submission, SubmissionMode,
};
pub use error::{SiteError, SiteResult};
pub use event::{EventRecord, EventWhen, extract_event_dates, parse_events};
pub use format::{
    CardOptions, CardRenderer, format_date_label, format_date_label_or, html_escape,
    render_event_cards,
};
pub use nav::{NavState, footer_year};
pub use slideshow::{PauseReason, SlideKey, SlideView, Slideshow};
pub use time::{DateSpan, parse_event_date, parse_event_date_in};
#[cfg(feature = "subscriber")]
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
