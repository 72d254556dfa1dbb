//! Error types for supportdesk.

pub mod classify;
pub mod code;
pub mod kinds;
pub mod structured;

pub use classify::{
    classify, classify_dyn, is_not_found_dyn, is_not_found_error, structured_error_from_error,
};
pub use code::ErrorCode;
pub use kinds::{ApiError, AuthError, CircuitOpenError, RateLimitError, RequestError};
pub use structured::StructuredError;

use thiserror::Error;

/// Primary error type for all supportdesk operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpenError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Structured(#[from] StructuredError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create an HTTP-result error.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api(ApiError::new(status, body))
    }

    /// Shorthand for a `validation_failed` error with its allowed values.
    pub fn validation<S: AsRef<str>>(field: &str, got: &str, allowed: &[S]) -> Self {
        Self::Structured(StructuredError::validation(field, got, allowed))
    }

    /// Classify this error into its structured form.
    pub fn to_structured(&self) -> std::borrow::Cow<'_, StructuredError> {
        classify(self)
    }

    pub fn code(&self) -> ErrorCode {
        classify(self).code()
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        classify(self).is_retryable()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
