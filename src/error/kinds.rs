//! Raw failure kinds produced by the transport and service layers.
//!
//! Each kind is its own error type so it can be found by `downcast_ref`
//! anywhere in a `source()` chain, not only inside [`ClientError`].

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::ClientError;

/// A non-success HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status_code}: {body}")]
pub struct ApiError {
    pub status_code: u16,
    pub body: String,
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// The API throttled the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct RateLimitError {
    pub retry_after: Duration,
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate limited: retry after {}", format_duration(self.retry_after))
    }
}

/// Credentials were missing or rejected before a request could succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("authentication failed: {reason}")]
pub struct AuthError {
    pub reason: String,
}

impl AuthError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The upstream circuit breaker is refusing calls.
#[derive(Error, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[error("circuit breaker is open")]
pub struct CircuitOpenError;

/// Request metadata wrapped around the failure that ended the request.
///
/// `source()` yields the inner [`ClientError`] itself (not the box) so that
/// chain walkers can downcast to it.
#[derive(Debug)]
pub struct RequestError {
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub cause: Box<ClientError>,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (status {}): {}",
            self.method, self.url, self.status_code, self.cause
        )
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

impl RequestError {
    pub fn new(
        method: impl fmt::Display,
        url: impl Into<String>,
        status_code: u16,
        cause: impl Into<ClientError>,
    ) -> Self {
        Self {
            method: method.to_string(),
            url: url.into(),
            status_code,
            cause: Box::new(cause.into()),
        }
    }
}

/// Render a duration the compact way: `30s`, `1m30s`, `1h0m0s`, `1.5s`, `250ms`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", trim_fraction(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", trim_fraction(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = trim_fraction(
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos()),
        1_000_000_000,
    );

    if hours > 0 {
        format!("{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

/// `value / unit` with the fractional part printed only as far as it is non-zero.
fn trim_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
