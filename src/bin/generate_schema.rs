//! Schema generator for the workflow platform's custom action.
//!
//! Writes `bridge_schema.json` with the input payload and response envelope
//! schemas so the action's fields can be configured without reading the code.

use std::fs;

const OUTPUT_FILE: &str = "bridge_schema.json";

fn main() {
    let schema = api_bridge::schema::bridge_schema().unwrap_or_else(|e| {
        eprintln!("Failed to build schema: {e}");
        std::process::exit(1);
    });

    let json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    fs::write(OUTPUT_FILE, json).unwrap_or_else(|e| {
        eprintln!("Failed to write {OUTPUT_FILE}: {e}");
        std::process::exit(1);
    });

    println!("✅ Generated {OUTPUT_FILE} for action {}", api_bridge::schema::ACTION_NAME);
}
