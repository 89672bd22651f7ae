use async_trait::async_trait;
use lambda_runtime::tracing::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{Transport, UpstreamResponse};
use crate::bridge::outbound::OutboundRequest;
use crate::models::error::BridgeError;

/// Production transport implementation using reqwest.
///
/// Performs exactly one attempt per request with the client's default
/// timeouts; failures surface as `BridgeError::Fetch`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, BridgeError> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            BridgeError::Fetch(format!("Invalid HTTP method '{}': {e}", request.method))
        })?;
        let headers = to_header_map(&request.headers)?;

        let mut builder = self.client.request(method, request.url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = flatten_headers(response.headers());
        debug!(status = status.as_u16(), "Reading upstream response body");
        let text = response.text().await?;

        Ok(UpstreamResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            text,
        })
    }
}

fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, BridgeError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| BridgeError::Fetch(format!("Invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| BridgeError::Fetch(format!("Invalid value for header '{name}': {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), joined)
        })
        .collect()
}

/// Global HTTP transport for production use
pub static HTTP_CLIENT: LazyLock<ReqwestTransport> =
    LazyLock::new(|| ReqwestTransport::new(Client::new()));
