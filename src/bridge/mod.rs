//! The request bridge: one inbound call in, at most one outbound call out.

pub mod extract;
pub mod outbound;
pub mod transform;

use lambda_runtime::tracing::{debug, error, info, warn};
use serde_json::{Map, Value, json};

use crate::config::BridgeConfig;
use crate::event::InboundCall;
use crate::http::{Transport, UpstreamResponse};
use crate::models::error::BridgeError;
use crate::models::request::BridgeRequest;
use crate::models::response::{BridgeResponse, RequestEcho};

use extract::{convenience_fields, empty_convenience_fields, upstream_error};
use outbound::OutboundRequest;
use transform::transform_deep;

/// Executes one bridge invocation.
///
/// Never fails: every error is reported inside the returned envelope.
pub async fn execute<T>(transport: &T, config: &BridgeConfig, call: &InboundCall) -> BridgeResponse
where
    T: Transport + ?Sized,
{
    if !call.method.eq_ignore_ascii_case("POST") {
        warn!(method = %call.method, "Rejecting non-POST invocation");
        return error_envelope(&BridgeError::MethodNotAllowed(call.method.clone()), None);
    }

    let request = BridgeRequest::from_payload(&call.body);
    let outbound = match OutboundRequest::build(&request, call.authorization(), config) {
        Ok(outbound) => outbound,
        Err(e) => {
            warn!(reason = e.reason(), error = %e, "Rejecting bridge request");
            return error_envelope(&e, None);
        }
    };

    info!(
        method = %outbound.method,
        host = outbound.url.host_str().unwrap_or_default(),
        path = outbound.url.path(),
        has_body = outbound.body.is_some(),
        "Forwarding request upstream"
    );
    debug!(url = %outbound.url, "Full outbound URL");

    let echo = outbound.echo();
    match transport.send(outbound).await {
        Ok(upstream) => {
            info!(status = upstream.status, bytes = upstream.text.len(), "Upstream responded");
            shape_response(upstream, echo)
        }
        Err(e) => {
            error!(error = %e, "Upstream request failed");
            error_envelope(&e, Some(echo))
        }
    }
}

fn error_envelope(error: &BridgeError, request: Option<RequestEcho>) -> BridgeResponse {
    BridgeResponse::from_error(error, empty_convenience_fields(), request)
}

/// Builds the envelope for a response the upstream actually sent.
fn shape_response(upstream: UpstreamResponse, request: RequestEcho) -> BridgeResponse {
    let data = transform_deep(&parse_body(&upstream.text));
    let fields = convenience_fields(&data);

    let ok = upstream.is_success();
    let (error_message, error_reason) = if ok {
        (None, None)
    } else {
        let (message, reason) = upstream_error(&data, &upstream);
        debug!(error_message = %message, error_reason = ?reason, "Upstream returned an error");
        (Some(message), reason)
    };

    BridgeResponse {
        ok,
        status: upstream.status,
        headers: upstream.headers,
        content: upstream.text,
        data: Some(data),
        fields,
        error_message,
        error_reason,
        request: Some(request),
    }
}

/// Parses the body text as JSON. Empty text is `{}`, anything else that is not
/// JSON is kept as `{"raw": text}`.
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}
