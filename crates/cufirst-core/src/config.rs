//! Site configuration shared by the browser script and the preview CLI.
//!
//! The CLI reads this from a TOML file; the browser build fills the contact
//! part from data attributes on the form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contact::{
    DEFAULT_FRAME_NAME, DEFAULT_SUBMIT_TIMEOUT, OriginAllowList, SubmissionMode, endpoint_origin,
};
use crate::error::{SiteError, SiteResult};
use crate::format::CardOptions;
use crate::slideshow::DEFAULT_SLIDE_INTERVAL;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub contact: ContactSettings,
    pub slideshow: SlideshowSettings,
    pub events: CardOptions,
}

/// Contact form settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// Form handler URL; the form is inert without one.
    pub endpoint: Option<String>,
    pub mode: SubmissionMode,
    /// The site's own origin, trusted for cross-document replies.
    pub site_origin: Option<String>,
    /// Extra trusted origins, e.g. a script host's content domain.
    pub allowed_origins: Vec<String>,
    /// Milliseconds before the "still sending" notice.
    pub timeout_ms: u64,
    /// Name of the hidden frame in `hidden_frame` mode.
    pub frame_name: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            mode: SubmissionMode::default(),
            site_origin: None,
            allowed_origins: Vec::new(),
            timeout_ms: DEFAULT_SUBMIT_TIMEOUT.as_millis() as u64,
            frame_name: DEFAULT_FRAME_NAME.to_string(),
        }
    }
}

impl ContactSettings {
    /// Client-side timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the origin allow-list for cross-document replies.
    ///
    /// # Errors
    ///
    /// Fails when no endpoint is configured or any origin is not a URL.
    pub fn allow_list(&self) -> SiteResult<OriginAllowList> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| SiteError::config("contact.endpoint is not set"))?;
        OriginAllowList::for_endpoint(endpoint, self.site_origin.as_deref(), &self.allowed_origins)
    }
}

/// Slideshow settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowSettings {
    pub interval_ms: u64,
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_SLIDE_INTERVAL.as_millis() as u64,
        }
    }
}

impl SlideshowSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl SiteConfig {
    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> SiteResult<()> {
        if let Some(endpoint) = &self.contact.endpoint {
            endpoint_origin(endpoint)?;
            self.contact.allow_list()?;
        }
        if self.contact.timeout_ms == 0 {
            return Err(SiteError::config("contact.timeout_ms must be greater than zero"));
        }
        if self.contact.frame_name.trim().is_empty() {
            return Err(SiteError::config("contact.frame_name must not be empty"));
        }
        if self.slideshow.interval_ms == 0 {
            return Err(SiteError::config("slideshow.interval_ms must be greater than zero"));
        }
        Ok(())
    }
}
