//! Mobile navigation toggle and footer year.

use chrono::{DateTime, Datelike, TimeZone};

/// Open/closed state of the mobile navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    open: bool,
}

impl NavState {
    /// Creates a closed menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state from the current markup.
    pub fn from_open(open: bool) -> Self {
        Self { open }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flips the state and returns the new one.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Value for the toggle button's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}

/// Year printed in the footer.
pub fn footer_year<Tz: TimeZone>(now: DateTime<Tz>) -> i32 {
    now.year()
}
