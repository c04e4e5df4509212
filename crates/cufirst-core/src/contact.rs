//! Contact form submission protocol.
//!
//! The form is sent either as a JSON `POST` to the configured endpoint
//! ([`SubmissionMode::Fetch`]) or as a native form post into a hidden frame
//! ([`SubmissionMode::HiddenFrame`]). In both cases the endpoint answers with a
//! [`FormReply`]; in the hidden-frame case the reply arrives as a
//! cross-document message, which is only trusted when its origin is on the
//! [`OriginAllowList`].
//!
//! [`Submission`] tracks one submission at a time and decides which
//! [`FormStatus`] to show for each outcome. It does no I/O.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::{Origin, Url};

use crate::error::{SiteError, SiteResult};

/// How long to wait for a reply before telling the visitor it is still sending.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(12);

/// Name of the hidden frame used for [`SubmissionMode::HiddenFrame`].
pub const DEFAULT_FRAME_NAME: &str = "contact-frame";

/// How the form reaches the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// JSON `POST` with the field map as body.
    #[default]
    Fetch,
    /// Native form submission targeting a hidden frame.
    HiddenFrame,
}

impl SubmissionMode {
    /// Returns the configuration name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::HiddenFrame => "hidden_frame",
        }
    }
}

impl FromStr for SubmissionMode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fetch" | "json" => Ok(Self::Fetch),
            "hidden_frame" | "hidden-frame" | "iframe" => Ok(Self::HiddenFrame),
            other => Err(SiteError::config(format!(
                "unknown submission mode '{other}' (expected fetch or hidden_frame)"
            ))),
        }
    }
}

/// The form's field values as a flat key/value map.
///
/// Later values for a repeated key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the fields as a JSON object.
    pub fn to_json(&self) -> SiteResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// Outcome reported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
    /// Any other status string.
    #[serde(other)]
    Unknown,
}

/// Reply body: `{"status": "success" | "error", "message"?: "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormReply {
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormReply {
    /// Creates a success reply.
    pub fn success() -> Self {
        Self {
            status: ReplyStatus::Success,
            message: None,
        }
    }

    /// Creates an error reply with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            message: Some(message.into()),
        }
    }

    /// Parses a reply from a JSON document.
    pub fn from_json_str(s: &str) -> SiteResult<Self> {
        serde_json::from_str(s).map_err(SiteError::Reply)
    }

    /// Parses a reply from message data.
    ///
    /// The data may be the reply object itself or a JSON string holding it.
    pub fn from_value(value: &Value) -> SiteResult<Self> {
        match value {
            Value::String(s) => Self::from_json_str(s),
            other => Self::deserialize(other).map_err(SiteError::Reply),
        }
    }

    /// Returns `true` for a success reply.
    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }
}

/// What the status line under the form says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Submission started.
    Sending,
    /// The endpoint accepted the message.
    Sent,
    /// The endpoint refused the message, optionally saying why.
    Rejected(Option<String>),
    /// The request never got a usable answer.
    NetworkError,
    /// No answer yet after the client-side timeout.
    StillSending,
}

impl FormStatus {
    /// Returns the visitor-facing text.
    pub fn text(&self) -> Cow<'static, str> {
        match self {
            Self::Sending => Cow::Borrowed("Sending…"),
            Self::Sent => Cow::Borrowed("Message sent successfully. Thank you!"),
            Self::Rejected(None) => Cow::Borrowed("Error: Unable to send message."),
            Self::Rejected(Some(message)) => Cow::Owned(format!("Error: {message}")),
            Self::NetworkError => Cow::Borrowed("Network error — please try again later."),
            Self::StillSending => {
                Cow::Borrowed("Still sending… this is taking longer than usual.")
            }
        }
    }

    /// Returns `true` once the submission has a definite outcome.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Sent | Self::Rejected(_) | Self::NetworkError)
    }

    /// Returns `true` if the form fields should be cleared.
    pub fn resets_form(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Origins whose cross-document messages are trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAllowList {
    origins: Vec<String>,
}

impl OriginAllowList {
    /// Creates an empty allow-list, which rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the usual allow-list: the endpoint's origin, the site's own
    /// origin, and any extra origins.
    pub fn for_endpoint<S: AsRef<str>>(
        endpoint: &str,
        site_origin: Option<&str>,
        extra: &[S],
    ) -> SiteResult<Self> {
        let endpoint_origin = endpoint_origin(endpoint)?;
        let mut list = Self::new();
        list.push(endpoint_origin);
        if let Some(site) = site_origin {
            list = list.with_origin(site)?;
        }
        for origin in extra {
            list = list.with_origin(origin.as_ref())?;
        }
        Ok(list)
    }

    /// Builder method to add an origin (any URL on that origin is accepted).
    pub fn with_origin(mut self, origin: &str) -> SiteResult<Self> {
        let normalized = normalize_origin(origin)
            .map_err(|reason| SiteError::invalid_origin(origin, reason))?;
        self.push(normalized);
        Ok(self)
    }

    fn push(&mut self, origin: String) {
        if !self.origins.contains(&origin) {
            self.origins.push(origin);
        }
    }

    /// Returns the normalized origins.
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Checks a message origin against the list.
    pub fn allows(&self, origin: &str) -> bool {
        normalize_origin(origin).is_ok_and(|o| self.origins.contains(&o))
    }
}

/// Returns the serialized origin of an absolute http(s) endpoint URL.
pub fn endpoint_origin(endpoint: &str) -> SiteResult<String> {
    let url = Url::parse(endpoint.trim()).map_err(|e| SiteError::invalid_endpoint(endpoint, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SiteError::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    normalize_origin(url.as_str()).map_err(|reason| SiteError::invalid_endpoint(endpoint, reason))
}

fn normalize_origin(origin: &str) -> Result<String, String> {
    let url = Url::parse(origin.trim()).map_err(|e| e.to_string())?;
    match url.origin() {
        origin @ Origin::Tuple(..) => Ok(origin.ascii_serialization()),
        Origin::Opaque(_) => Err("opaque origin".to_string()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Pending,
    /// Pending, and the visitor has already been told it is slow.
    Overdue,
    Done,
}

/// State of the current contact form submission.
#[derive(Debug, Clone)]
pub struct Submission {
    allow: OriginAllowList,
    phase: Phase,
}

impl Submission {
    /// Creates an idle submission tracker.
    pub fn new(allow: OriginAllowList) -> Self {
        Self {
            allow,
            phase: Phase::Idle,
        }
    }

    /// Returns the allow-list used for cross-document replies.
    pub fn allow_list(&self) -> &OriginAllowList {
        &self.allow
    }

    /// Starts a new submission.
    pub fn begin(&mut self) -> FormStatus {
        self.phase = Phase::Pending;
        FormStatus::Sending
    }

    /// Returns `true` while waiting for an outcome.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending | Phase::Overdue)
    }

    /// Handles a reply from the endpoint.
    pub fn on_reply(&mut self, reply: &FormReply) -> Option<FormStatus> {
        if !self.is_pending() {
            debug!(?reply, "ignoring reply with no submission pending");
            return None;
        }
        self.phase = Phase::Done;
        let status = if reply.is_success() {
            FormStatus::Sent
        } else {
            FormStatus::Rejected(reply.message.clone())
        };
        info!(?reply.status, "contact form reply");
        Some(status)
    }

    /// Handles a cross-document message.
    ///
    /// Messages from origins off the allow-list, messages that are not a
    /// reply, and replies with an unknown status are logged and dropped.
    pub fn on_message(&mut self, origin: &str, data: &Value) -> Option<FormStatus> {
        if !self.allow.allows(origin) {
            warn!(origin, "ignoring message from untrusted origin");
            return None;
        }
        let reply = match FormReply::from_value(data) {
            Ok(reply) => reply,
            Err(err) => {
                debug!(origin, error = %err, "ignoring unrelated message");
                return None;
            }
        };
        if reply.status == ReplyStatus::Unknown {
            warn!(origin, "ignoring reply with unknown status");
            return None;
        }
        self.on_reply(&reply)
    }

    /// Handles a transport failure.
    pub fn on_network_error(&mut self, err: &dyn fmt::Display) -> Option<FormStatus> {
        if !self.is_pending() {
            return None;
        }
        warn!(error = %err, "contact form send failed");
        self.phase = Phase::Done;
        Some(FormStatus::NetworkError)
    }

    /// Handles the client-side timeout.
    ///
    /// Only the first timeout of a pending submission changes the status;
    /// the submission itself stays pending.
    pub fn on_timeout(&mut self) -> Option<FormStatus> {
        if self.phase != Phase::Pending {
            return None;
        }
        self.phase = Phase::Overdue;
        Some(FormStatus::StillSending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENDPOINT: &str = "https://script.example.com/macros/s/abc/exec";

    fn allow_list() -> OriginAllowList {
        OriginAllowList::for_endpoint(
            ENDPOINT,
            Some("https://www.cufirst.org"),
            &["https://script.googleusercontent.com"],
        )
        .unwrap()
    }

    mod mode {
        use super::*;

        #[test]
        fn parse_names() {
            assert_eq!("fetch".parse::<SubmissionMode>().unwrap(), SubmissionMode::Fetch);
            assert_eq!(
                "Hidden-Frame".parse::<SubmissionMode>().unwrap(),
                SubmissionMode::HiddenFrame
            );
            assert!("carrier pigeon".parse::<SubmissionMode>().is_err());
        }

        #[test]
        fn serde_names() {
            let json = serde_json::to_string(&SubmissionMode::HiddenFrame).unwrap();
            assert_eq!(json, "\"hidden_frame\"");
            assert_eq!(SubmissionMode::HiddenFrame.as_str(), "hidden_frame");
        }
    }

    mod fields {
        use super::*;

        #[test]
        fn last_value_wins() {
            let fields: FormFields = [("name", "Ada"), ("email", "a@x.org"), ("name", "Grace")]
                .into_iter()
                .collect();
            assert_eq!(fields.len(), 2);
            assert_eq!(fields.get("name"), Some("Grace"));
        }

        #[test]
        fn json_is_flat_object() {
            let fields: FormFields = [("message", "hi \"there\""), ("email", "a@x.org")]
                .into_iter()
                .collect();
            let value: Value = serde_json::from_str(&fields.to_json().unwrap()).unwrap();
            assert_eq!(value, json!({"email": "a@x.org", "message": "hi \"there\""}));
        }
    }

    mod reply {
        use super::*;

        #[test]
        fn from_object_and_string() {
            let obj = json!({"status": "success"});
            assert_eq!(FormReply::from_value(&obj).unwrap(), FormReply::success());

            let text = json!(r#"{"status":"error","message":"quota"}"#);
            assert_eq!(FormReply::from_value(&text).unwrap(), FormReply::error("quota"));
        }

        #[test]
        fn unknown_status() {
            let reply = FormReply::from_json_str(r#"{"status":"queued"}"#).unwrap();
            assert_eq!(reply.status, ReplyStatus::Unknown);
            assert!(!reply.is_success());
        }

        #[test]
        fn not_a_reply() {
            assert!(FormReply::from_value(&json!("hello")).is_err());
            assert!(FormReply::from_value(&json!({"type": "resize"})).is_err());
        }
    }

    mod status {
        use super::*;

        #[test]
        fn texts() {
            assert_eq!(FormStatus::Sending.text(), "Sending…");
            assert_eq!(FormStatus::Sent.text(), "Message sent successfully. Thank you!");
            assert_eq!(FormStatus::Rejected(None).text(), "Error: Unable to send message.");
            assert_eq!(
                FormStatus::Rejected(Some("quota exceeded".into())).to_string(),
                "Error: quota exceeded"
            );
            assert_eq!(
                FormStatus::NetworkError.text(),
                "Network error — please try again later."
            );
        }

        #[test]
        fn finality() {
            assert!(!FormStatus::Sending.is_final());
            assert!(!FormStatus::StillSending.is_final());
            assert!(FormStatus::NetworkError.is_final());
            assert!(FormStatus::Sent.resets_form());
            assert!(!FormStatus::Rejected(None).resets_form());
        }
    }

    mod allow_list {
        use super::*;

        #[test]
        fn contains_endpoint_site_and_extra() {
            let list = allow_list();
            assert_eq!(
                list.origins(),
                [
                    "https://script.example.com",
                    "https://www.cufirst.org",
                    "https://script.googleusercontent.com",
                ]
            );
        }

        #[test]
        fn allows_normalized_origins() {
            let list = allow_list();
            assert!(list.allows("https://www.cufirst.org"));
            assert!(list.allows("https://www.cufirst.org:443"));
            assert!(list.allows("https://script.example.com/"));
            assert!(!list.allows("http://www.cufirst.org"));
            assert!(!list.allows("https://evil.example.net"));
            assert!(!list.allows("null"));
        }

        #[test]
        fn duplicates_collapse() {
            let list = OriginAllowList::for_endpoint(
                "https://www.cufirst.org/api/contact",
                Some("https://www.cufirst.org"),
                &[] as &[&str],
            )
            .unwrap();
            assert_eq!(list.origins().len(), 1);
        }

        #[test]
        fn bad_endpoint() {
            assert!(matches!(
                endpoint_origin("not a url"),
                Err(SiteError::InvalidEndpoint { .. })
            ));
            assert!(endpoint_origin("mailto:hi@cufirst.org").is_err());
        }

        #[test]
        fn bad_extra_origin() {
            let err = OriginAllowList::new().with_origin("::nope").unwrap_err();
            assert!(matches!(err, SiteError::InvalidOrigin { .. }));
        }
    }

    mod submission {
        use super::*;

        #[test]
        fn success_flow() {
            let mut sub = Submission::new(allow_list());
            assert_eq!(sub.begin(), FormStatus::Sending);
            assert!(sub.is_pending());
            assert_eq!(sub.on_reply(&FormReply::success()), Some(FormStatus::Sent));
            assert!(!sub.is_pending());
        }

        #[test]
        fn error_reply() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            assert_eq!(
                sub.on_reply(&FormReply {
                    status: ReplyStatus::Unknown,
                    message: None
                }),
                Some(FormStatus::Rejected(None))
            );
        }

        #[test]
        fn message_from_allowed_origin() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            let status = sub.on_message(
                "https://script.googleusercontent.com",
                &json!({"status": "error", "message": "Invalid email"}),
            );
            assert_eq!(status, Some(FormStatus::Rejected(Some("Invalid email".into()))));
        }

        #[test]
        fn message_from_foreign_origin_is_ignored() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            assert_eq!(
                sub.on_message("https://evil.example.net", &json!({"status": "success"})),
                None
            );
            assert!(sub.is_pending());
        }

        #[test]
        fn unrelated_messages_are_ignored() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            assert_eq!(sub.on_message("https://www.cufirst.org", &json!({"height": 40})), None);
            assert_eq!(
                sub.on_message("https://www.cufirst.org", &json!({"status": "pending"})),
                None
            );
            assert!(sub.is_pending());
        }

        #[test]
        fn replies_after_outcome_are_ignored() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            sub.on_reply(&FormReply::success());
            assert_eq!(sub.on_reply(&FormReply::error("late")), None);
            assert_eq!(sub.on_timeout(), None);
        }

        #[test]
        fn idle_ignores_everything() {
            let mut sub = Submission::new(allow_list());
            assert_eq!(sub.on_message("https://www.cufirst.org", &json!({"status": "success"})), None);
            assert_eq!(sub.on_network_error(&"offline"), None);
            assert_eq!(sub.on_timeout(), None);
        }

        #[test]
        fn timeout_then_reply() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            assert_eq!(sub.on_timeout(), Some(FormStatus::StillSending));
            assert_eq!(sub.on_timeout(), None);
            assert!(sub.is_pending());
            assert_eq!(sub.on_reply(&FormReply::success()), Some(FormStatus::Sent));
        }

        #[test]
        fn network_error() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            assert_eq!(
                sub.on_network_error(&"connection reset"),
                Some(FormStatus::NetworkError)
            );
            assert!(!sub.is_pending());
        }

        #[test]
        fn resubmit_after_outcome() {
            let mut sub = Submission::new(allow_list());
            sub.begin();
            sub.on_network_error(&"offline");
            sub.begin();
            assert_eq!(sub.on_reply(&FormReply::success()), Some(FormStatus::Sent));
        }
    }
}
