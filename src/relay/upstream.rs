//! Upstream layer - the remote JSON-RPC endpoint behind the relay
//!
//! [`Upstream`] is the seam between dispatch and the network: the relay only
//! needs "send this value, get a decoded value back". [`HttpUpstream`] is the
//! real implementation; tests substitute a scripted mock.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use super::error::RelayError;

/// Remote endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://spectrum2-mcp-server.philipp-koch.workers.dev";

/// Connection settings for [`HttpUpstream`]
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// URL every message is POSTed to
    pub endpoint: String,
    /// Whole-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

/// Remote side of the relay
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Forward one message and return the decoded reply body
    ///
    /// Every call is an independent round trip: no caching, no retries.
    async fn forward(&self, payload: &Value) -> Result<Value, RelayError>;
}

/// JSON-over-HTTP upstream
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    endpoint: String,
}

impl HttpUpstream {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        // Redirects are answered as status errors, and proxy env vars are ignored
        let mut builder = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(Policy::none())
            .no_proxy();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn forward(&self, payload: &Value) -> Result<Value, RelayError> {
        let body = serde_json::to_vec(payload).map_err(|e| RelayError::transport(&e))?;
        trace!("HttpUpstream: POST {} ({} bytes)", self.endpoint, body.len());

        // A Vec body has a known length, so Content-Length is always set
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::transport(&e))?;
        debug!(
            "HttpUpstream: received HTTP {} ({} bytes)",
            status.as_u16(),
            text.len()
        );

        if status != StatusCode::OK {
            return Err(RelayError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RelayError::ResponseParse {
            error: e.to_string(),
            body: text,
        })
    }
}

// ============================================================================
// Mock Upstream Implementation
// ============================================================================

#[cfg(test)]
pub use mock::MockUpstream;
