//! Machine-readable error codes and their fixed properties.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Closed set of error categories surfaced to humans and calling programs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ValidationFailed,
    RateLimited,
    ServerError,
    Timeout,
    CircuitOpen,
    Unknown,
}

impl ErrorCode {
    /// Map an HTTP status code onto an error code.
    ///
    /// Total over `u16`: anything without a dedicated mapping (including
    /// success codes handed in by mistake) is [`ErrorCode::Unknown`].
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::ValidationFailed,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether a blind retry of the same request may succeed.
    pub fn is_retryable(self) -> bool {
        match self {
            Self::RateLimited | Self::ServerError | Self::Timeout | Self::CircuitOpen => true,
            Self::BadRequest
            | Self::Unauthorized
            | Self::Forbidden
            | Self::NotFound
            | Self::Conflict
            | Self::ValidationFailed
            | Self::Unknown => false,
        }
    }

    /// Fixed remediation hint. Empty for [`ErrorCode::Unknown`].
    pub fn suggestion(self) -> &'static str {
        match self {
            Self::BadRequest => "Check the request parameters and try again.",
            Self::Unauthorized => "Set a valid API access token and try again.",
            Self::Forbidden => "Use a token whose user has permission for this action.",
            Self::NotFound => "Verify the resource ID exists in this account.",
            Self::Conflict => "Fetch the latest version of the resource and reapply the change.",
            Self::ValidationFailed => "Correct the invalid fields and resend the request.",
            Self::RateLimited => "Wait for the rate limit window to pass, then retry.",
            Self::ServerError => "Retry after a short delay; contact support if it persists.",
            Self::Timeout => "Retry the request or raise the client timeout.",
            Self::CircuitOpen => "Wait for the service to recover before sending more requests.",
            Self::Unknown => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
