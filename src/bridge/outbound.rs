//! Translation of a [`BridgeRequest`] into the concrete outbound HTTP request.

use reqwest::Url;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::BridgeConfig;
use crate::models::error::BridgeError;
use crate::models::request::{BridgeRequest, decode_object, safe_json};
use crate::models::response::RequestEcho;
use crate::utils::{coerce_to_string, redact_headers};

/// Methods that carry a request body.
const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

const ACCEPT: &str = "accept";
const AUTHORIZATION: &str = "authorization";
const CONTENT_TYPE: &str = "content-type";
const CONTENT_LENGTH: &str = "content-length";
const APPLICATION_JSON: &str = "application/json";

/// Fully resolved outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Upper-cased HTTP method
    pub method: String,
    pub url: Url,
    /// Lower-cased header names
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Builds the outbound request.
    ///
    /// `authorization` is the inbound `Authorization` header, forwarded verbatim.
    ///
    /// # Errors
    ///
    /// - `BridgeError::MissingRequiredFields` if `method` or `url` is missing
    /// - `BridgeError::InvalidUrl` if the URL does not parse
    pub fn build(
        request: &BridgeRequest,
        authorization: Option<&str>,
        config: &BridgeConfig,
    ) -> Result<Self, BridgeError> {
        let (method, raw_url) = request.required_fields()?;
        let method = method.to_ascii_uppercase();

        let mut url = resolve_url(&raw_url, &config.api_base_url)?;
        if let Some(query) = request.query.as_ref().and_then(decode_object) {
            apply_query(&mut url, &query);
        }

        let mut headers = assemble_headers(request.headers.as_ref(), authorization);
        let body = if BODY_METHODS.contains(&method.as_str()) {
            let body = assemble_body(request.body.as_ref(), &mut headers);
            if body.is_none() {
                // A bodiless POST/PUT/PATCH still declares its length
                headers.insert(CONTENT_LENGTH.to_string(), "0".to_string());
            }
            body
        } else {
            None
        };

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    /// Copy of the request safe to return to the caller.
    #[must_use]
    pub fn echo(&self) -> RequestEcho {
        RequestEcho {
            method: self.method.clone(),
            url: self.url.to_string(),
            headers: redact_headers(&self.headers),
        }
    }
}

/// Resolves `raw` against `base_url`.
///
/// `/path` is appended to the base, a value starting with a URI scheme is used
/// verbatim, and anything else is treated as a path on the base.
///
/// # Errors
///
/// Returns `BridgeError::InvalidUrl` if the resulting string does not parse.
pub fn resolve_url(raw: &str, base_url: &str) -> Result<Url, BridgeError> {
    let raw = raw.trim();
    let absolute = if raw.starts_with('/') {
        format!("{base_url}{raw}")
    } else if has_scheme(raw) {
        raw.to_string()
    } else {
        format!("{base_url}/{raw}")
    };

    Url::parse(&absolute).map_err(|e| BridgeError::InvalidUrl(e.to_string()))
}

fn has_scheme(raw: &str) -> bool {
    raw.split_once("://").is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Sets every non-null, non-empty query value on `url`, replacing existing
/// parameters with the same name.
pub fn apply_query(url: &mut Url, query: &Map<String, Value>) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut changed = false;

    for (key, value) in query {
        if value.as_str() == Some("") {
            continue;
        }
        let Some(text) = coerce_to_string(value) else {
            continue;
        };
        pairs.retain(|(existing, _)| existing != key);
        pairs.push((key.clone(), text));
        changed = true;
    }

    if changed {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}

fn assemble_headers(
    user_headers: Option<&Value>,
    authorization: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(user_headers) = user_headers.and_then(decode_object) {
        for (name, value) in user_headers {
            if let Some(text) = coerce_to_string(&value) {
                headers.insert(name.trim().to_ascii_lowercase(), text);
            }
        }
    }

    headers.insert(ACCEPT.to_string(), APPLICATION_JSON.to_string());
    if let Some(authorization) = authorization {
        headers.insert(AUTHORIZATION.to_string(), authorization.to_string());
    }

    headers
}

/// Serializes the body and defaults its content type.
///
/// An empty or missing body yields `None`, which is a valid request.
fn assemble_body(body: Option<&Value>, headers: &mut BTreeMap<String, String>) -> Option<String> {
    let body = body?;
    let payload = if let Some(decoded) = safe_json(body) {
        decoded.to_string()
    } else if let Value::String(raw) = body
        && !raw.trim().is_empty()
    {
        raw.clone()
    } else {
        return None;
    };

    headers
        .entry(CONTENT_TYPE.to_string())
        .or_insert_with(|| APPLICATION_JSON.to_string());
    Some(payload)
}
