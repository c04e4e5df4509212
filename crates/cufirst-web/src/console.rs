//! Forwards `tracing` events from the core crate to the browser console.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Where formatted log lines go.
pub type Sink = fn(&Level, &str);

/// A layer writing one console line per event: `target: message key=value`.
pub struct ConsoleLayer {
    sink: Sink,
}

impl ConsoleLayer {
    /// Layer printing through `gloo_console`.
    pub fn new() -> Self {
        Self::with_sink(to_console)
    }

    pub fn with_sink(sink: Sink) -> Self {
        Self { sink }
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let meta = event.metadata();
        (self.sink)(meta.level(), &format!("{}: {}{}", meta.target(), line.message, line.fields));
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn to_console(level: &Level, line: &str) {
    match *level {
        Level::ERROR => gloo_console::error!(line),
        Level::WARN => gloo_console::warn!(line),
        Level::INFO => gloo_console::info!(line),
        _ => gloo_console::debug!(line),
    }
}

/// Installs the console layer as the global subscriber.
pub fn init() {
    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::new().with_filter(LevelFilter::DEBUG));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        gloo_console::warn!("cufirst: a tracing subscriber is already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use cufirst_core::{OriginAllowList, Submission};

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: &Level, line: &str) {
        LINES.with(|lines| lines.borrow_mut().push((*level, line.to_string())));
    }

    fn captured<F: FnOnce()>(f: F) -> Vec<(Level, String)> {
        LINES.with(|lines| lines.borrow_mut().clear());
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::with_sink(capture));
        tracing::subscriber::with_default(subscriber, f);
        LINES.with(|lines| lines.borrow().clone())
    }

    #[test]
    fn formats_message_and_fields() {
        let lines = captured(|| tracing::info!(origin = "https://x.org", count = 2, "hello"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::INFO);
        assert!(lines[0].1.ends_with(": hello origin=https://x.org count=2"));
    }

    #[test]
    fn foreign_message_reaches_console() {
        let allow = OriginAllowList::for_endpoint(
            "https://forms.example.com/send",
            Some("https://www.cufirst.org"),
            &[] as &[&str],
        )
        .unwrap();
        let mut submission = Submission::new(allow);
        submission.begin();

        let lines = captured(|| {
            let status = submission
                .on_message("https://evil.example.net", &serde_json::json!({"status": "success"}));
            assert_eq!(status, None);
        });

        let warning = lines
            .iter()
            .find(|(level, _)| *level == Level::WARN)
            .expect("a warning line");
        assert!(warning.1.contains("untrusted origin"));
        assert!(warning.1.contains("https://evil.example.net"));
    }

    #[test]
    fn unreadable_event_date_reaches_console() {
        let lines = captured(|| {
            assert_eq!(cufirst_core::parse_event_date("sometime soon"), None);
        });
        assert!(
            lines
                .iter()
                .any(|(level, line)| *level == Level::DEBUG && line.contains("sometime soon"))
        );
    }

    #[test]
    fn malformed_events_are_logged_and_render_nothing() {
        let renderer = cufirst_core::CardRenderer::with_defaults();
        let mut html = None;
        let lines = captured(|| html = Some(renderer.render_payload_or_empty("[{\"title\": ")));
        assert_eq!(html.as_deref(), Some(""));
        assert!(
            lines
                .iter()
                .any(|(level, line)| *level == Level::ERROR && line.contains("failed to parse events"))
        );
    }
}
