//! `cufirst events`

use std::io::Read;
use std::path::Path;

use chrono::TimeZone;
use cufirst_core::{CardRenderer, EventRecord, SiteConfig, parse_events};
use tracing::warn;

use crate::error::{CliError, CliResult};

/// Reads an events file, or stdin for `-`.
pub fn read_payload(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::io(path, e))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))
}

/// Renders an events payload as one `label  title` line per event, or as card
/// markup when `html` is set.
///
/// Events that carry date text the parser cannot read are reported as
/// warnings; they still render with the TBA label.
pub fn render<Tz: TimeZone>(
    payload: &str,
    html: bool,
    config: &SiteConfig,
    tz: Tz,
) -> CliResult<String> {
    let events = parse_events(payload)?;
    let renderer = CardRenderer::in_timezone(config.events.clone(), tz);

    for event in events.iter().filter(|e| unresolved(e, &renderer)) {
        warn!(title = %event.title, when = ?event.when, "event date could not be read");
    }

    if html {
        return Ok(renderer.render_cards(&events));
    }
    Ok(events
        .iter()
        .map(|e| format!("{}\t{}\n", renderer.label(e), e.title))
        .collect())
}

fn unresolved<Tz: TimeZone>(event: &EventRecord, renderer: &CardRenderer<Tz>) -> bool {
    event.when.has_date_info() && renderer.label(event) == renderer.options().tba_label
}
