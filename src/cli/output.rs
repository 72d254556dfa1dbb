//! Rendering of results and errors, and the exit-code contract.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use super::OutputFormat;
use crate::error::{ErrorCode, Result, StructuredError};

/// Process exit status for a classified failure.
///
/// | code | meaning |
/// |------|---------|
/// | 1 | unknown |
/// | 2 | bad_request, validation_failed |
/// | 3 | unauthorized, forbidden |
/// | 4 | not_found |
/// | 5 | conflict |
/// | 6 | rate_limited |
/// | 7 | server_error, timeout, circuit_open |
pub fn exit_code(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::Unknown => 1,
        ErrorCode::BadRequest | ErrorCode::ValidationFailed => 2,
        ErrorCode::Unauthorized | ErrorCode::Forbidden => 3,
        ErrorCode::NotFound => 4,
        ErrorCode::Conflict => 5,
        ErrorCode::RateLimited => 6,
        ErrorCode::ServerError | ErrorCode::Timeout | ErrorCode::CircuitOpen => 7,
    }
}

/// Write a successful result to stdout.
pub fn print<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)?;
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?,
        OutputFormat::Text => write!(stdout, "{}", render_text(&value))?,
    }
    Ok(())
}

/// Text form of an error: the message, then the hint and allowed values
/// when there are any.
pub fn render_error_text(err: &StructuredError) -> String {
    let mut out = format!("Error: {}\n", err.message());
    if let Some(suggestion) = err.suggestion() {
        out.push_str(&format!("Hint: {suggestion}\n"));
    }
    if !err.allowed_values().is_empty() {
        out.push_str(&format!("Allowed: {}\n", err.allowed_values().join(", ")));
    }
    out
}

/// Write a classified error to stderr in the requested format.
pub fn report_error(format: OutputFormat, err: &StructuredError) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(err)
            .map(|json| format!("{json}\n"))
            .unwrap_or_else(|_| render_error_text(err)),
        OutputFormat::Text => render_error_text(err),
    };
    let _ = std::io::stderr().lock().write_all(rendered.as_bytes());
}

/// One line per record, sorted `key=value` pairs for objects.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "ok\n".to_string(),
        Value::Array(items) if items.is_empty() => "(none)\n".to_string(),
        Value::Array(items) => items.iter().map(render_line).collect(),
        other => render_line(other),
    }
}

fn render_line(value: &Value) -> String {
    let line = match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().filter(|(_, v)| !v.is_null()).collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            pairs
                .into_iter()
                .map(|(k, v)| format!("{k}={}", scalar(v)))
                .collect::<Vec<_>>()
                .join(" ")
        }
        other => scalar(other),
    };
    format!("{line}\n")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
