//! Conversion of arbitrary failures into [`StructuredError`].
//!
//! Classification is structural: it looks at which error kind sits in the
//! wrapper chain, never at message text. The one exception is the
//! best-effort [`is_not_found_error`] helper.

use std::borrow::Cow;
use std::error::Error;

use super::code::ErrorCode;
use super::kinds::{ApiError, AuthError, CircuitOpenError, RateLimitError, format_duration};
use super::structured::StructuredError;
use super::ClientError;

/// Wrapper levels followed before giving up and reporting `unknown`.
pub const MAX_UNWRAP_DEPTH: usize = 16;

/// Convert an optional error into its structured form.
///
/// Returns `None` only when there is no error.
pub fn structured_error_from_error(err: Option<&ClientError>) -> Option<Cow<'_, StructuredError>> {
    err.map(classify)
}

/// Classify a [`ClientError`], looking through request wrappers.
///
/// An error that already is (or wraps) a [`StructuredError`] comes back
/// borrowed, untouched. Anything unrecognised becomes `unknown` with the
/// outermost error's text as the message.
pub fn classify(err: &ClientError) -> Cow<'_, StructuredError> {
    let mut current = err;
    for _ in 0..MAX_UNWRAP_DEPTH {
        if let ClientError::Request(wrapper) = current {
            current = wrapper.cause.as_ref();
            continue;
        }
        if let Some(found) = classify_kind(current) {
            return found;
        }
        break;
    }
    Cow::Owned(unknown(err))
}

/// Classify any error by walking its `source()` chain.
///
/// Raw kinds are leaves (none of them has a source), so the first
/// recognised link is the only one.
pub fn classify_dyn<'a>(err: &'a (dyn Error + 'static)) -> Cow<'a, StructuredError> {
    let mut current = Some(err);
    for _ in 0..MAX_UNWRAP_DEPTH {
        let Some(node) = current else { break };
        if let Some(found) = recognise(node) {
            return found;
        }
        current = node.source();
    }
    Cow::Owned(unknown(err))
}

/// Best-effort check for "the thing asked for does not exist".
///
/// True when the error carries an HTTP 404, or an HTTP error whose body
/// mentions "not found". Errors without an HTTP result fall back to a
/// case-insensitive search of their rendered text, which can match
/// unrelated messages. Do not base exit codes or retries on this alone.
pub fn is_not_found_error(err: Option<&ClientError>) -> bool {
    err.is_some_and(|e| is_not_found_dyn(e))
}

/// [`is_not_found_error`] for arbitrary error chains.
pub fn is_not_found_dyn(err: &(dyn Error + 'static)) -> bool {
    match find_api_error(err) {
        Some(api) => api.status_code == 404 || mentions_not_found(&api.body),
        None => mentions_not_found(&err.to_string()),
    }
}

fn classify_kind(err: &ClientError) -> Option<Cow<'_, StructuredError>> {
    match err {
        ClientError::Structured(structured) => Some(Cow::Borrowed(structured)),
        ClientError::Api(api) => Some(Cow::Owned(from_api(api))),
        ClientError::RateLimited(limit) => Some(Cow::Owned(from_rate_limit(limit))),
        ClientError::Auth(auth) => Some(Cow::Owned(from_auth(auth))),
        ClientError::CircuitOpen(open) => Some(Cow::Owned(from_circuit_open(open))),
        ClientError::Request(_)
        | ClientError::Network(_)
        | ClientError::Serialization(_)
        | ClientError::Io(_)
        | ClientError::Configuration(_) => None,
    }
}

fn recognise<'a>(node: &'a (dyn Error + 'static)) -> Option<Cow<'a, StructuredError>> {
    if let Some(client) = node.downcast_ref::<ClientError>() {
        return classify_kind(client);
    }
    if let Some(structured) = node.downcast_ref::<StructuredError>() {
        return Some(Cow::Borrowed(structured));
    }
    if let Some(api) = node.downcast_ref::<ApiError>() {
        return Some(Cow::Owned(from_api(api)));
    }
    if let Some(limit) = node.downcast_ref::<RateLimitError>() {
        return Some(Cow::Owned(from_rate_limit(limit)));
    }
    if let Some(auth) = node.downcast_ref::<AuthError>() {
        return Some(Cow::Owned(from_auth(auth)));
    }
    if let Some(open) = node.downcast_ref::<CircuitOpenError>() {
        return Some(Cow::Owned(from_circuit_open(open)));
    }
    None
}

fn find_api_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ApiError> {
    let mut current = Some(err);
    for _ in 0..MAX_UNWRAP_DEPTH {
        let node = current?;
        if let Some(api) = node.downcast_ref::<ApiError>() {
            return Some(api);
        }
        if let Some(ClientError::Api(api)) = node.downcast_ref::<ClientError>() {
            return Some(api);
        }
        current = node.source();
    }
    None
}

fn from_api(err: &ApiError) -> StructuredError {
    let mut structured = StructuredError::new(ErrorCode::from_status(err.status_code), &err.body)
        .insert_context("status_code", err.status_code);
    if let Some(request_id) = err.request_id.as_deref().filter(|id| !id.is_empty()) {
        structured = structured.insert_context("request_id", request_id);
    }
    structured
}

fn from_rate_limit(err: &RateLimitError) -> StructuredError {
    StructuredError::new(ErrorCode::RateLimited, err.to_string())
        .insert_context("retry_after", format_duration(err.retry_after))
}

fn from_auth(err: &AuthError) -> StructuredError {
    StructuredError::new(ErrorCode::Unauthorized, err.to_string())
}

fn from_circuit_open(err: &CircuitOpenError) -> StructuredError {
    StructuredError::new(ErrorCode::CircuitOpen, err.to_string())
}

fn unknown(err: &dyn Error) -> StructuredError {
    StructuredError::new(ErrorCode::Unknown, err.to_string())
}

fn mentions_not_found(text: &str) -> bool {
    text.to_lowercase().contains("not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use std::fmt;
    use std::time::Duration;

    /// Foreign wrapper, to check classification through non-crate chains.
    #[derive(Debug)]
    struct Outer(Box<dyn Error + Send + Sync>);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer: {}", self.0)
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self.0.as_ref())
        }
    }

    #[test]
    fn dyn_chain_reaches_rate_limit_through_foreign_wrapper() {
        let err = Outer(Box::new(RateLimitError {
            retry_after: Duration::from_secs(30),
        }));
        let structured = classify_dyn(&err);
        assert_eq!(structured.code(), ErrorCode::RateLimited);
        assert!(structured.is_retryable());
        assert_eq!(
            structured.context().get("retry_after"),
            Some(&serde_json::json!("30s"))
        );
    }

    #[test]
    fn dyn_chain_reaches_client_error_inside_foreign_wrapper() {
        let inner = ClientError::from(RequestError::new(
            "POST",
            "https://desk.test/api",
            503,
            ApiError::new(503, "maintenance"),
        ));
        let err = Outer(Box::new(inner));
        let structured = classify_dyn(&err);
        assert_eq!(structured.code(), ErrorCode::ServerError);
        assert_eq!(structured.message(), "maintenance");
    }

    #[test]
    fn dyn_chain_returns_nested_structured_error_by_reference() {
        let err = Outer(Box::new(StructuredError::new(ErrorCode::Timeout, "slow")));
        let structured = classify_dyn(&err);
        assert!(matches!(structured, Cow::Borrowed(_)));
        assert_eq!(structured.code(), ErrorCode::Timeout);
    }

    #[test]
    fn deep_wrapper_chain_gives_up_as_unknown() {
        let mut err = ClientError::api(404, "missing");
        for _ in 0..MAX_UNWRAP_DEPTH {
            err = RequestError::new("GET", "https://desk.test", 404, err).into();
        }
        let structured = classify(&err);
        assert_eq!(structured.code(), ErrorCode::Unknown);
        assert_eq!(structured.message(), err.to_string());
    }

    #[test]
    fn wrapper_chain_below_the_cap_is_followed() {
        let mut err = ClientError::api(404, "missing");
        for _ in 0..MAX_UNWRAP_DEPTH - 1 {
            err = RequestError::new("GET", "https://desk.test", 404, err).into();
        }
        assert_eq!(classify(&err).code(), ErrorCode::NotFound);
    }

    #[test]
    fn empty_request_id_is_not_recorded() {
        let err = ClientError::Api(ApiError::new(400, "bad").with_request_id(""));
        let structured = classify(&err);
        assert!(!structured.context().contains_key("request_id"));
        assert_eq!(
            structured.context().get("status_code"),
            Some(&serde_json::json!(400))
        );
    }
}
