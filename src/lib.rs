//! Lambda bridge between a JSON-only workflow platform and REST APIs.
//!
//! The caller describes an HTTP request in a JSON payload; the bridge performs
//! it and answers with a flattened envelope, always at HTTP 200.

pub mod bridge;
pub mod config;
pub mod event;
pub mod handler;
pub mod http;
pub mod models;
pub mod schema;
pub mod utils;
