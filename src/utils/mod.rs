//! Utility functions shared across the application.
//!
//! These helpers are used by the outbound request builder, the response
//! transform and the envelope so that every place that turns a JSON value
//! into text does it the same way.

use serde_json::Value;
use std::collections::BTreeMap;

/// Headers whose values never leave the bridge in an echo or a log line.
const SENSITIVE_HEADERS: [&str; 2] = ["authorization", "proxy-authorization"];

/// Placeholder written in place of a sensitive header value.
pub const REDACTED: &str = "[REDACTED]";

/// Coerces a JSON value to the text a query parameter or grouping key carries.
///
/// - Strings pass through unchanged
/// - Numbers and booleans use their JSON text
/// - Arrays join their coerced elements with `,`
/// - Objects use their JSON text
///
/// # Returns
///
/// `None` for `null`, which has no textual form.
#[must_use]
pub fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| coerce_to_string(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Coerces a scalar to text. Objects, arrays and `null` yield `None`.
#[must_use]
pub fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Bool(_) | Value::Number(_) => coerce_to_string(value),
        _ => None,
    }
}

/// Returns a copy of the header map with credential values replaced.
#[must_use]
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
