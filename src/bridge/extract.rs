use serde_json::{Map, Value};

use crate::http::UpstreamResponse;
use crate::models::response::ConvenienceFields;

/// Fields lifted to the top of the envelope: `(output field, path in data)`.
///
/// Each path is looked up in the transformed body first and then in its first
/// `items` entry, so singular resources and paged lists expose the same names.
pub const CONVENIENCE_FIELDS: &[(&str, &[&str])] = &[
    ("id", &["id"]),
    ("title", &["snippet", "title"]),
    ("scheduledStartTime", &["snippet", "scheduledStartTime"]),
    ("privacyStatus", &["status", "privacyStatus"]),
    ("lifeCycleStatus", &["status", "lifeCycleStatus"]),
    ("boundStreamId", &["contentDetails", "boundStreamId"]),
    ("embedHtml", &["contentDetails", "monitorStream", "embedHtml"]),
    ("kind", &["kind"]),
    ("etag", &["etag"]),
    ("nextPageToken", &["nextPageToken"]),
    ("pageInfo", &["pageInfo"]),
];

/// Path of the first element of a transformed `items` array.
const FIRST_ITEM: [&str; 2] = ["items", "0"];

/// Follows `path` through nested objects. A `null` counts as absent.
#[must_use]
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .filter(|found| !found.is_null())
}

/// Evaluates the convenience table against a transformed body.
#[must_use]
pub fn convenience_fields(data: &Value) -> ConvenienceFields {
    let first_item = lookup(data, &FIRST_ITEM);

    ConvenienceFields(
        CONVENIENCE_FIELDS
            .iter()
            .map(|(name, path)| {
                let value = lookup(data, path)
                    .or_else(|| first_item.and_then(|item| lookup(item, path)))
                    .cloned()
                    .unwrap_or(Value::Null);
                ((*name).to_string(), value)
            })
            .collect(),
    )
}

/// Every convenience field set to `null`.
#[must_use]
pub fn empty_convenience_fields() -> ConvenienceFields {
    ConvenienceFields(
        CONVENIENCE_FIELDS
            .iter()
            .map(|(name, _)| ((*name).to_string(), Value::Null))
            .collect::<Map<String, Value>>(),
    )
}

/// Reads `(errorMessage, errorReason)` from a failed upstream response.
///
/// Follows the Google error envelope (`error.errors[0]`, then `error`), falling
/// back to the raw body text and finally the status line.
#[must_use]
pub fn upstream_error(data: &Value, response: &UpstreamResponse) -> (String, Option<String>) {
    let text_at = |path: &[&str]| lookup(data, path).and_then(Value::as_str).map(str::to_string);

    let message = text_at(&["error", "errors", "0", "message"])
        .or_else(|| text_at(&["error", "message"]))
        .or_else(|| (!response.text.trim().is_empty()).then(|| response.text.clone()))
        .or_else(|| (!response.status_text.is_empty()).then(|| response.status_text.clone()))
        .unwrap_or_else(|| format!("HTTP {}", response.status));

    let reason = text_at(&["error", "errors", "0", "reason"]).or_else(|| text_at(&["error", "status"]));

    (message, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::transform::transform_deep;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn response(status: u16, status_text: &str, text: &str) -> UpstreamResponse {
        UpstreamResponse {
            status,
            status_text: status_text.to_string(),
            headers: BTreeMap::new(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_lookup() {
        let data = json!({"a": {"b": {"c": 1}}, "n": null});
        assert_eq!(lookup(&data, &["a", "b", "c"]), Some(&json!(1)));
        assert_eq!(lookup(&data, &["a", "x"]), None);
        assert_eq!(lookup(&data, &["n"]), None);
        assert_eq!(lookup(&data, &[]), Some(&data));
    }

    #[test]
    fn test_fields_from_first_item() {
        let data = transform_deep(&json!({"items": [{"id": "1", "snippet": {"title": "T"}}]}));
        let fields = convenience_fields(&data);

        assert_eq!(fields.get("id"), Some(&json!("1")));
        assert_eq!(fields.get("title"), Some(&json!("T")));
        assert_eq!(fields.get("privacyStatus"), None);
        assert_eq!(fields.0.len(), CONVENIENCE_FIELDS.len());
    }

    #[test]
    fn test_top_level_wins_over_first_item() {
        let data = transform_deep(&json!({
            "kind": "youtube#liveBroadcastListResponse",
            "etag": "list-etag",
            "nextPageToken": "CAUQAA",
            "pageInfo": {"totalResults": 2, "resultsPerPage": 1},
            "items": [{
                "kind": "youtube#liveBroadcast",
                "id": "b1",
                "status": {"privacyStatus": "unlisted", "lifeCycleStatus": "ready"},
                "contentDetails": {
                    "boundStreamId": "s1",
                    "monitorStream": {"embedHtml": "<iframe></iframe>"}
                },
                "snippet": {"title": "Launch", "scheduledStartTime": "2026-01-01T10:00:00Z"}
            }]
        }));
        let fields = convenience_fields(&data);

        assert_eq!(fields.get("kind"), Some(&json!("youtube#liveBroadcastListResponse")));
        assert_eq!(fields.get("etag"), Some(&json!("list-etag")));
        assert_eq!(fields.get("nextPageToken"), Some(&json!("CAUQAA")));
        assert_eq!(fields.get("pageInfo"), Some(&json!({"totalResults": 2, "resultsPerPage": 1})));
        assert_eq!(fields.get("id"), Some(&json!("b1")));
        assert_eq!(fields.get("privacyStatus"), Some(&json!("unlisted")));
        assert_eq!(fields.get("lifeCycleStatus"), Some(&json!("ready")));
        assert_eq!(fields.get("boundStreamId"), Some(&json!("s1")));
        assert_eq!(fields.get("embedHtml"), Some(&json!("<iframe></iframe>")));
        assert_eq!(fields.get("scheduledStartTime"), Some(&json!("2026-01-01T10:00:00Z")));
    }

    #[test]
    fn test_null_at_top_level_falls_back() {
        let data = transform_deep(&json!({"id": null, "items": [{"id": "from-item"}]}));
        assert_eq!(convenience_fields(&data).get("id"), Some(&json!("from-item")));
    }

    #[test]
    fn test_empty_fields_are_all_null() {
        let fields = empty_convenience_fields();
        assert_eq!(fields.0.len(), CONVENIENCE_FIELDS.len());
        assert!(fields.0.values().all(Value::is_null));
    }

    #[test]
    fn test_google_error_envelope() {
        let text = r#"{"error":{"code":403,"message":"Top message","status":"PERMISSION_DENIED","errors":[{"message":"Item message","reason":"insufficientPermissions"}]}}"#;
        let data = transform_deep(&serde_json::from_str(text).unwrap());
        let (message, reason) = upstream_error(&data, &response(403, "Forbidden", text));

        assert_eq!(message, "Item message");
        assert_eq!(reason.as_deref(), Some("insufficientPermissions"));
    }

    #[test]
    fn test_error_without_items_uses_top_message_and_status() {
        let text = r#"{"error":{"code":401,"message":"Invalid Credentials","status":"UNAUTHENTICATED"}}"#;
        let data = transform_deep(&serde_json::from_str(text).unwrap());
        let (message, reason) = upstream_error(&data, &response(401, "Unauthorized", text));

        assert_eq!(message, "Invalid Credentials");
        assert_eq!(reason.as_deref(), Some("UNAUTHENTICATED"));
    }

    #[test]
    fn test_non_json_error_falls_back_to_text() {
        let data = json!({"raw": "Bad Gateway from proxy"});
        let (message, reason) =
            upstream_error(&data, &response(502, "Bad Gateway", "Bad Gateway from proxy"));

        assert_eq!(message, "Bad Gateway from proxy");
        assert_eq!(reason, None);
    }

    #[test]
    fn test_empty_error_body_falls_back_to_status_text() {
        let (message, _) = upstream_error(&json!({}), &response(404, "Not Found", ""));
        assert_eq!(message, "Not Found");

        let (message, _) = upstream_error(&json!({}), &response(599, "", ""));
        assert_eq!(message, "HTTP 599");
    }
}
