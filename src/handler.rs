use lambda_runtime::tracing::{debug, error, info};
use lambda_runtime::{Diagnostic, LambdaEvent};
use serde_json::Value;

use crate::bridge;
use crate::config::BridgeConfig;
use crate::event::{InboundCall, ProxyResponse};
use crate::http::Transport;

/// Lambda event handler. Decodes the event, runs the bridge and wraps the
/// envelope in a 200 proxy response.
/// Logs only the event size; payloads carry credentials.
///
/// # Errors
///
/// Returns a `Diagnostic` with `error_type` `SerializationError` if the
/// envelope cannot be serialized. Every bridge failure, including upstream
/// and network errors, is reported inside a successful response instead.
pub async fn function_handler<T>(
    transport: &T,
    config: &BridgeConfig,
    event: LambdaEvent<Value>,
) -> Result<ProxyResponse, Diagnostic>
where
    T: Transport + ?Sized,
{
    let (event_payload, context) = event.into_parts();
    debug!(
        request_id = %context.request_id,
        event_size = event_payload.to_string().len(),
        "Received event"
    );

    let call = InboundCall::from_event(event_payload);
    let envelope = bridge::execute(transport, config, &call).await;

    info!(
        ok = envelope.ok,
        status = envelope.status,
        error_reason = envelope.error_reason.as_deref().unwrap_or_default(),
        "Bridge invocation finished"
    );

    let body = serde_json::to_string(&envelope).map_err(|e| {
        error!(error = %e, "Failed to serialize response envelope");
        Diagnostic {
            error_type: "SerializationError".to_string(),
            error_message: format!("Failed to serialize response: {e}"),
        }
    })?;

    Ok(ProxyResponse::json(body))
}
