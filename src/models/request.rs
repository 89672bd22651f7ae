use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::error::BridgeError;
use crate::utils::coerce_scalar;

/// Wrapper keys the workflow platform may nest the request description under,
/// checked in order before falling back to the payload itself.
const WRAPPER_KEYS: [&str; 2] = ["data", "inputData"];

/// Description of the outbound call, as sent by the workflow platform.
///
/// Every field is kept as raw JSON: `headers`, `query` and `body` may arrive as
/// objects or as JSON-encoded strings and are decoded with [`safe_json`] when
/// the outbound request is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct BridgeRequest {
    #[schemars(description = "HTTP method of the outbound call (case-insensitive). Alias: httpMethod")]
    pub method: Option<Value>,
    #[schemars(description = "Absolute URL, or a path relative to the configured API host. Alias: apiUrl")]
    pub url: Option<Value>,
    #[schemars(description = "Outbound headers as an object or a JSON-encoded object")]
    pub headers: Option<Value>,
    #[schemars(description = "Query parameters as an object or a JSON-encoded object")]
    pub query: Option<Value>,
    #[schemars(description = "Request body for POST, PUT and PATCH; JSON value, JSON text or raw text")]
    pub body: Option<Value>,
}

impl BridgeRequest {
    /// Extracts the request description from an inbound payload.
    ///
    /// A string payload is parsed as JSON first. The description is then read
    /// from `data`, `inputData` or the payload itself, whichever is the first
    /// JSON object. Never fails: anything unreadable yields an empty request.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let parsed;
        let payload = if payload.is_string() {
            parsed = safe_json(payload).unwrap_or(Value::Null);
            &parsed
        } else {
            payload
        };

        let input = unwrap_payload(payload);
        let field = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| input.get(*name))
                .find(|value| !value.is_null())
                .cloned()
        };

        Self {
            method: field(&["method", "httpMethod"]),
            url: field(&["url", "apiUrl"]),
            headers: field(&["headers"]),
            query: field(&["query"]),
            body: field(&["body"]),
        }
    }

    /// Returns the trimmed `method` and `url`.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingRequiredFields` if either is absent, not a
    /// scalar, or blank after trimming.
    pub fn required_fields(&self) -> Result<(String, String), BridgeError> {
        let text = |value: Option<&Value>| {
            value
                .and_then(coerce_scalar)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
        };

        match (text(self.method.as_ref()), text(self.url.as_ref())) {
            (Some(method), Some(url)) => Ok((method, url)),
            _ => Err(BridgeError::MissingRequiredFields),
        }
    }
}

/// Picks the object that actually holds the request description.
fn unwrap_payload(payload: &Value) -> &Value {
    WRAPPER_KEYS
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| value.is_object())
        .unwrap_or(payload)
}

/// Decodes a field that may be a native JSON value or a JSON-encoded string.
///
/// Objects and arrays are returned as-is. Strings are trimmed and parsed.
/// Everything else, a parse failure, or a decoded `null` yields `None`.
#[must_use]
pub fn safe_json(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(text)
                .ok()
                .filter(|decoded| !decoded.is_null())
        }
        _ => None,
    }
}

/// Like [`safe_json`], but only accepts a JSON object.
#[must_use]
pub fn decode_object(value: &Value) -> Option<Map<String, Value>> {
    match safe_json(value)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
