//! Decoding of the Lambda invocation event and encoding of the proxy response.
//!
//! The function can sit behind an API Gateway REST API (payload v1), an HTTP
//! API or Function URL (payload v2), or be invoked directly with the bridge
//! payload as the event. All three collapse into an [`InboundCall`].

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use lambda_runtime::tracing::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Transport method assumed for direct invocations.
const DIRECT_INVOKE_METHOD: &str = "POST";

/// Content type of every response the function produces.
pub const RESPONSE_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The inbound HTTP call, independent of how Lambda delivered it.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundCall {
    /// Upper-cased transport method
    pub method: String,
    /// Lower-cased header names
    pub headers: BTreeMap<String, String>,
    /// Decoded body; `{}` when absent or not JSON
    pub body: Value,
}

impl InboundCall {
    /// Decodes a Lambda event.
    #[must_use]
    pub fn from_event(event: Value) -> Self {
        let Some(method) = transport_method(&event) else {
            debug!("No HTTP envelope in event, treating it as a direct invocation");
            return Self {
                method: DIRECT_INVOKE_METHOD.to_string(),
                headers: BTreeMap::new(),
                body: event,
            };
        };

        let headers = event
            .get("headers")
            .and_then(Value::as_object)
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .as_str()
                            .map(|value| (name.to_ascii_lowercase(), value.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let base64_encoded = event
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let body = decode_body(event.get("body"), base64_encoded);

        Self {
            method,
            headers,
            body,
        }
    }

    /// The inbound `Authorization` header, verbatim.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get("authorization").map(String::as_str)
    }
}

/// The transport method of a gateway event, `None` for a direct invocation.
///
/// A top-level `httpMethod` alone is not enough: it is also an alias of the
/// outbound `method` in a flat bridge payload. Payload v1 is only recognized
/// together with its `requestContext`, `resource` or `path` markers.
fn transport_method(event: &Value) -> Option<String> {
    let v2 = event.pointer("/requestContext/http/method").and_then(Value::as_str);
    let v1 = || {
        let is_gateway = ["requestContext", "resource", "path"]
            .iter()
            .any(|marker| event.get(marker).is_some_and(|value| !value.is_null()));
        event
            .get("httpMethod")
            .and_then(Value::as_str)
            .filter(|_| is_gateway)
    };
    v2.or_else(v1).map(str::to_ascii_uppercase)
}

fn decode_body(body: Option<&Value>, base64_encoded: bool) -> Value {
    match body {
        Some(Value::String(text)) if base64_encoded => match B64.decode(text.trim()) {
            Ok(bytes) => parse_body_text(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                warn!(error = %e, "Failed to decode base64 request body, treating it as empty");
                Value::Object(Map::new())
            }
        },
        Some(Value::String(text)) => parse_body_text(text),
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(other) => other.clone(),
    }
}

fn parse_body_text(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| {
        debug!(error = %e, "Request body is not JSON, treating it as empty");
        Value::Object(Map::new())
    })
}

/// Proxy-integration response understood by API Gateway and Function URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// A 200 response carrying a JSON body.
    #[must_use]
    pub fn json(body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), RESPONSE_CONTENT_TYPE.to_string());
        Self {
            status_code: 200,
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_api_event() {
        let call = InboundCall::from_event(json!({
            "resource": "/execute",
            "httpMethod": "POST",
            "headers": {"Authorization": "Bearer abc", "Content-Type": "application/json"},
            "body": r#"{"method": "GET", "url": "/youtube/v3/videos"}"#,
            "isBase64Encoded": false
        }));

        assert_eq!(call.method, "POST");
        assert_eq!(call.authorization(), Some("Bearer abc"));
        assert_eq!(call.headers["content-type"], "application/json");
        assert_eq!(call.body, json!({"method": "GET", "url": "/youtube/v3/videos"}));
    }

    #[test]
    fn test_function_url_event() {
        let call = InboundCall::from_event(json!({
            "version": "2.0",
            "rawPath": "/",
            "requestContext": {"http": {"method": "get", "path": "/"}},
            "headers": {"authorization": "Bearer xyz"}
        }));

        assert_eq!(call.method, "GET");
        assert_eq!(call.authorization(), Some("Bearer xyz"));
        assert_eq!(call.body, json!({}));
    }

    #[test]
    fn test_base64_body() {
        let encoded = B64.encode(r#"{"method":"DELETE","url":"/x"}"#);
        let call = InboundCall::from_event(json!({
            "requestContext": {"http": {"method": "POST"}},
            "body": encoded,
            "isBase64Encoded": true
        }));

        assert_eq!(call.body, json!({"method": "DELETE", "url": "/x"}));
    }

    #[test]
    fn test_invalid_bodies_become_empty() {
        let not_json = InboundCall::from_event(json!({
            "resource": "/execute",
            "httpMethod": "POST",
            "body": "method=GET"
        }));
        assert_eq!(not_json.body, json!({}));

        let bad_base64 = InboundCall::from_event(json!({
            "requestContext": {"stage": "prod"},
            "httpMethod": "POST",
            "body": "%%%",
            "isBase64Encoded": true
        }));
        assert_eq!(bad_base64.body, json!({}));
    }

    #[test]
    fn test_direct_invocation() {
        let payload = json!({"method": "GET", "url": "/x", "body": "ignored for GET"});
        let call = InboundCall::from_event(payload.clone());

        assert_eq!(call.method, "POST");
        assert!(call.headers.is_empty());
        assert_eq!(call.authorization(), None);
        assert_eq!(call.body, payload);
    }

    #[test]
    fn test_flat_payload_with_method_alias_is_direct() {
        let payload = json!({
            "httpMethod": "POST",
            "apiUrl": "/youtube/v3/liveBroadcasts",
            "body": {"snippet": {"title": "t"}}
        });
        let call = InboundCall::from_event(payload.clone());

        assert_eq!(call.method, "POST");
        assert_eq!(call.body, payload);

        let get = InboundCall::from_event(json!({"httpMethod": "GET", "apiUrl": "/youtube/v3/videos"}));
        assert_eq!(get.method, "POST");
        assert_eq!(get.body["httpMethod"], "GET");
    }

    #[test]
    fn test_rest_api_event_with_request_context_only() {
        let call = InboundCall::from_event(json!({
            "httpMethod": "get",
            "requestContext": {"resourcePath": "/execute", "httpMethod": "GET"},
            "body": null
        }));

        assert_eq!(call.method, "GET");
        assert_eq!(call.body, json!({}));
    }

    #[test]
    fn test_proxy_response_serialization() {
        let response = ProxyResponse::json(r#"{"ok":true}"#.to_string());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], json!(200));
        assert_eq!(value["headers"]["content-type"], RESPONSE_CONTENT_TYPE);
        assert_eq!(value["body"], json!(r#"{"ok":true}"#));
        assert_eq!(value["isBase64Encoded"], json!(false));
    }
}
