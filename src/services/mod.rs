//! Resource services: thin typed wrappers over a
//! [`Requester`](crate::transport::Requester).

pub mod agent_bots;
pub mod automation_rules;
pub mod canned_responses;
pub mod conversations;
pub mod inbox_members;
pub mod public;
pub mod reports;
pub mod webhooks;

pub use agent_bots::{AgentBot, AgentBotInput, AgentBots};
pub use automation_rules::{AutomationEvent, AutomationRule, AutomationRuleInput, AutomationRules};
pub use canned_responses::{CannedResponse, CannedResponseInput, CannedResponses};
pub use conversations::{ConversationStatus, Conversations, Priority, StatusToggle};
pub use inbox_members::{InboxMember, InboxMembers};
pub use public::{PublicApi, PublicContact, PublicContactInput, PublicConversation, PublicMessage};
pub use reports::{ReportMetric, ReportPoint, ReportQuery, ReportSummary, ReportType, Reports};
pub use webhooks::{Webhook, WebhookEvent, WebhookInput, Webhooks};

use std::fmt::Display;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::error::{ClientError, ErrorCode, RequestError, Result, StructuredError};
use crate::transport::{encode_component, Method, Requester};

/// Closed set of string tags accepted by an API field.
pub trait Choice: FromStr + Display + IntoEnumIterator {}

impl<T: FromStr + Display + IntoEnumIterator> Choice for T {}

/// Parse a user-supplied tag, or fail with a `validation_failed` error that
/// lists every accepted tag.
pub fn parse_choice<T: Choice>(field: &str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        let allowed: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        ClientError::validation(field, raw, &allowed)
    })
}

/// Every accepted tag of `T`, in declaration order.
pub fn choices<T: Choice>() -> Vec<String> {
    T::iter().map(|v| v.to_string()).collect()
}

/// `{"payload": ...}` wrapper used by several endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Payload<T> {
    pub payload: T,
}

/// Send one request and decode the response body into `T`.
///
/// A body that is valid JSON but does not fit `T` comes back inside a
/// [`RequestError`] naming the endpoint. Requesters only return bodies of
/// successful responses, so the recorded status is 200.
pub(crate) async fn fetch<T: DeserializeOwned>(
    requester: &dyn Requester,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Result<T> {
    let value = requester.request(method.clone(), path, body).await?;
    serde_json::from_value(value).map_err(|e| RequestError::new(&method, path, 200, e).into())
}

pub(crate) fn account_path(account_id: u64, suffix: &str) -> String {
    format!("/api/v1/accounts/{account_id}{suffix}")
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_field(field, format!("{field} must not be empty")));
    }
    Ok(())
}

/// Percent-encode a caller-supplied identifier for use as one path segment.
///
/// `.` and `..` are rejected: URL normalisation would resolve them even
/// when encoded.
pub(crate) fn path_segment(field: &str, raw: &str) -> Result<String> {
    require_non_empty(field, raw)?;
    if raw == "." || raw == ".." {
        return Err(invalid_field(
            field,
            format!("invalid {field} \"{raw}\": not a valid identifier"),
        ));
    }
    Ok(encode_component(raw))
}

/// `validation_failed` for a field that has no fixed set of allowed values.
pub(crate) fn invalid_field(field: &str, message: String) -> ClientError {
    StructuredError::with_context(
        ErrorCode::ValidationFailed,
        message,
        [("field".to_string(), Value::from(field))],
    )
    .into()
}

/// Accept numbers that the API sometimes sends as strings.
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("expected number, got {other}"))),
    }
}
