//! Error kinds produced by the bridge.
//!
//! None of these are fatal to the Lambda process. Each one is converted into
//! a response envelope carrying its reason code and an HTTP-equivalent status,
//! so the caller always receives parseable JSON.

use serde_json::{Value, json};
use std::fmt;

/// Custom error type for the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The inbound transport method was not POST
    MethodNotAllowed(String),
    /// The inbound payload lacked `method` or `url`
    MissingRequiredFields,
    /// The outbound URL could not be constructed
    InvalidUrl(String),
    /// The outbound call failed before a response was received
    Fetch(String),
}

impl BridgeError {
    /// Machine-readable reason reported as `errorReason`.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::MissingRequiredFields => "missing_required_fields",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Fetch(_) => "bridge_error",
        }
    }

    /// HTTP-equivalent status reported inside the envelope.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::MissingRequiredFields | Self::InvalidUrl(_) => 400,
            Self::Fetch(_) => 500,
        }
    }

    /// Longer description of the failure, e.g. the URL parser's complaint.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidUrl(detail) => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Google-style error body reported as `data` for request errors, so
    /// callers reading `data.error.errors.0.reason` see the same layout as an
    /// upstream API error. Transport failures have no body.
    #[must_use]
    pub fn error_body(&self) -> Option<Value> {
        if matches!(self, Self::Fetch(_)) {
            return None;
        }
        Some(json!({
            "error": {
                "code": self.status(),
                "message": self.to_string(),
                "errors": {
                    "0": {"reason": self.reason(), "message": self.detail()}
                }
            }
        }))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed(_) => write!(f, "Method Not Allowed"),
            Self::MissingRequiredFields => write!(f, "Missing required fields: method or url"),
            Self::InvalidUrl(_) => write!(f, "Invalid URL"),
            Self::Fetch(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<reqwest::Error> for BridgeError {
    fn from(error: reqwest::Error) -> Self {
        // reqwest keeps the useful part (DNS, refused, reset) in the source chain
        let mut message = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Fetch(message)
    }
}
