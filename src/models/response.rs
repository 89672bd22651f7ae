use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::error::BridgeError;

/// Content type reported in the envelope for errors raised by the bridge itself.
pub const BRIDGE_ERROR_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Top-level fields lifted from the upstream body, keyed by output name.
///
/// Always holds every field of the convenience table; absent values are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ConvenienceFields(pub Map<String, Value>);

impl ConvenienceFields {
    /// Returns the lifted value for `name`, if it is present and non-null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }
}

/// The outbound request as echoed back to the caller, credentials redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RequestEcho {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// Envelope returned to the workflow platform for every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    #[schemars(description = "True when the upstream answered with a 2xx status")]
    pub ok: bool,
    #[schemars(description = "Upstream status, or the HTTP-equivalent status of a bridge error")]
    pub status: u16,
    #[schemars(description = "Upstream response headers, lower-cased names")]
    pub headers: BTreeMap<String, String>,
    #[schemars(description = "Raw upstream body text")]
    pub content: String,
    #[schemars(description = "Upstream body with every array turned into an index-keyed object")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub fields: ConvenienceFields,
    pub error_message: Option<String>,
    pub error_reason: Option<String>,
    #[schemars(description = "Outbound request as sent, authorization redacted")]
    pub request: Option<RequestEcho>,
}

impl BridgeResponse {
    /// Builds the envelope for an error raised by the bridge itself.
    #[must_use]
    pub fn from_error(
        error: &BridgeError,
        fields: ConvenienceFields,
        request: Option<RequestEcho>,
    ) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "content-type".to_string(),
            BRIDGE_ERROR_CONTENT_TYPE.to_string(),
        );

        Self {
            ok: false,
            status: error.status(),
            headers,
            content: String::new(),
            data: error.error_body(),
            fields,
            error_message: Some(error.to_string()),
            error_reason: Some(error.reason().to_string()),
            request,
        }
    }
}
