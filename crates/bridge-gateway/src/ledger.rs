//! Outbound port to the ledger node's RPC endpoint.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from the gateway's outbound calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The ledger node could not be reached or answered garbage.
    #[error("Ledger node call failed: {0}")]
    Upstream(String),
}

/// RPC capability against the ledger node.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Forward one action body and return the node's JSON response.
    async fn call(&self, body: &Value) -> Result<Value, GatewayError>;
}

/// HTTP client for the ledger node's RPC endpoint.
///
/// The forwarding call is the one place in the system with an explicit
/// timeout; a node that hangs must not pin gateway workers forever.
pub struct HttpLedgerClient {
    client: reqwest::Client,
    url: String,
}

impl HttpLedgerClient {
    /// Create a client against the node's RPC URL with a bounded wait.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerClient {
    async fn call(&self, body: &Value) -> Result<Value, GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))
    }
}
