//! HTTP transport: the `Requester` seam and its reqwest implementation.
//!
//! Every failure leaves this module as a raw error kind (see
//! [`crate::error::kinds`]) wrapped in a [`RequestError`] that records the
//! method and URL, ready for classification.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
pub use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{
    ApiError, ClientError, ErrorCode, RateLimitError, RequestError, Result, StructuredError,
};

/// Header carrying the user or bot access token.
pub const API_TOKEN_HEADER: &str = "api_access_token";

/// Header the API uses to echo a request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Performs one API call and returns the decoded JSON body.
///
/// Implementations return `Value::Null` for empty bodies.
#[async_trait]
pub trait Requester: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

/// [`Requester`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRequester {
    /// Build a requester from config. The token is optional here: the
    /// public API works without one.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.api_token() {
            let value = HeaderValue::from_str(token).map_err(|_| {
                ClientError::Configuration("API token contains invalid header characters".into())
            })?;
            headers.insert(API_TOKEN_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Requester for HttpRequester {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "supportdesk request");

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| transport_error(&method, &url, e))?;

        let status = resp.status().as_u16();
        let request_id = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = parse_retry_after(resp.headers(), Utc::now());

        let text = resp
            .text()
            .await
            .map_err(|e| transport_error(&method, &url, e))?;
        debug!(%method, %url, status, bytes = text.len(), "supportdesk response");

        if !(200..300).contains(&status) {
            warn!(%method, %url, status, request_id = ?request_id, "supportdesk request failed");
            return Err(status_error(&method, &url, status, text, request_id, retry_after));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RequestError::new(&method, &url, status, e).into())
    }
}

fn transport_error(method: &Method, url: &str, error: reqwest::Error) -> ClientError {
    warn!(%method, %url, error = %error, "supportdesk transport failure");
    if error.is_timeout() {
        return StructuredError::with_context(
            ErrorCode::Timeout,
            format!("{method} {url} timed out"),
            [("url".to_string(), Value::from(url))],
        )
        .into();
    }
    ClientError::Network(error)
}

/// Map a non-2xx response onto a raw error kind inside a request wrapper.
pub fn status_error(
    method: &Method,
    url: &str,
    status: u16,
    body: String,
    request_id: Option<String>,
    retry_after: Option<Duration>,
) -> ClientError {
    let cause: ClientError = match (status, retry_after) {
        (429, Some(retry_after)) => RateLimitError { retry_after }.into(),
        _ => {
            let mut api = ApiError::new(status, body);
            if let Some(id) = request_id {
                api = api.with_request_id(id);
            }
            api.into()
        }
    };
    RequestError::new(method, url, status, cause).into()
}

/// Read `Retry-After` as delay seconds or an HTTP date relative to `now`.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment or query component.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Append `key=value` pairs to a path, percent-encoding both sides.
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}
