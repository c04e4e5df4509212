//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Errors that can occur while handling site data.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The inline events payload is not a JSON array of event records.
    #[error("malformed events payload: {0}")]
    Events(#[source] serde_json::Error),

    /// A contact form reply could not be decoded.
    #[error("malformed form reply: {0}")]
    Reply(#[source] serde_json::Error),

    /// Failed to serialize a value to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured form endpoint is unusable.
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// An origin on the allow-list is unusable.
    #[error("invalid origin {origin}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl SiteError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid origin error.
    pub fn invalid_origin(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidOrigin {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
