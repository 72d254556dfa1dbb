//! The canonical, serializable error record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::code::ErrorCode;

/// Error record shared by the CLI and programmatic callers.
///
/// `retryable` and `suggestion` are derived from `code` when the value is
/// built, so the two can never drift apart for locally constructed errors.
/// Optional fields are left out of the JSON form entirely when empty.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct StructuredError {
    code: ErrorCode,
    message: String,
    retryable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    suggestion: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    context: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allowed_values: Vec<String>,
}

impl StructuredError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
            suggestion: code.suggestion().to_string(),
            context: BTreeMap::new(),
            allowed_values: Vec::new(),
        }
    }

    pub fn with_context(
        code: ErrorCode,
        message: impl Into<String>,
        context: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut err = Self::new(code, message);
        err.context.extend(context);
        err
    }

    /// A `validation_failed` error that lists every accepted value, so a
    /// caller can pick a valid one without parsing the message.
    ///
    /// `allowed` is kept in the given order, duplicates included.
    pub fn validation<S: AsRef<str>>(field: &str, got: &str, allowed: &[S]) -> Self {
        let allowed_values: Vec<String> =
            allowed.iter().map(|v| v.as_ref().to_string()).collect();
        let joined = allowed_values.join(", ");

        let mut context = BTreeMap::new();
        context.insert("field".to_string(), Value::from(field));
        context.insert("got".to_string(), Value::from(got));

        Self {
            code: ErrorCode::ValidationFailed,
            message: format!("invalid {field} \"{got}\": must be one of {joined}"),
            retryable: false,
            suggestion: format!("Use one of: {joined}"),
            context,
            allowed_values,
        }
    }

    pub(crate) fn insert_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn suggestion(&self) -> Option<&str> {
        (!self.suggestion.is_empty()).then_some(self.suggestion.as_str())
    }

    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }
}
