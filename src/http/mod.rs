pub mod client;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::bridge::outbound::OutboundRequest;
use crate::models::error::BridgeError;

pub use client::{HTTP_CLIENT, ReqwestTransport};

/// Upstream response, fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`, empty when unknown
    pub status_text: String,
    /// Header names lower-cased, repeated values joined with `", "`
    pub headers: BTreeMap<String, String>,
    pub text: String,
}

impl UpstreamResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Trait for the outbound HTTP call to enable testing with mocks.
///
/// This trait abstracts the single network operation the bridge performs so
/// that tests can assert what is sent, or that nothing is sent at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request once and reads the whole response body as text.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Fetch` if the request cannot be built or sent, or
    /// if the response body cannot be read.
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, BridgeError>;
}
