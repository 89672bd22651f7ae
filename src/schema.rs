//! JSON Schemas describing the bridge's input payload and response envelope.
//!
//! The workflow platform's custom action editor takes plain JSON Schema, so
//! the meta keys schemars adds are stripped.

use schemars::{JsonSchema, schema_for};
use serde_json::{Value, json};

use crate::models::{BridgeRequest, BridgeResponse};

/// Name the bridge action is published under.
pub const ACTION_NAME: &str = "execute_api_request";

const ACTION_DESCRIPTION: &str = "Perform an HTTP request against the YouTube Data API (or any REST API) and return a flattened JSON envelope. Arrays in the response become objects keyed by index with byId/byReason/byName groupings, and common resource fields are lifted to the top level.";

/// Builds the action descriptor with input and output schemas.
///
/// # Errors
///
/// Returns an error if a generated schema cannot be converted to JSON.
pub fn bridge_schema() -> serde_json::Result<Value> {
    Ok(json!({
        "name": ACTION_NAME,
        "description": ACTION_DESCRIPTION,
        "inputSchema": plain_schema::<BridgeRequest>()?,
        "outputSchema": plain_schema::<BridgeResponse>()?,
    }))
}

fn plain_schema<T: JsonSchema>() -> serde_json::Result<Value> {
    let mut schema = serde_json::to_value(schema_for!(T))?;
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    Ok(schema)
}
