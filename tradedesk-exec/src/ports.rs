//! Execution port definition.
//!
//! Adapters implement this for a concrete endpoint (in-process echo, remote
//! desk server over HTTP).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExecError;
use crate::order::OrderRequest;

/// Port for the order execution endpoint.
///
/// Implementations:
/// - `EchoExecution` - in-process, answers with the request itself
/// - `DeskRestClient` - `POST /api/order` on a remote desk server
#[async_trait]
pub trait ExecutionPort: Send + Sync {
    /// Send one order. No retry and no idempotency key: calling this twice
    /// submits twice.
    async fn submit(&self, request: &OrderRequest) -> Result<OrderAck, ExecError>;
}

/// Endpoint acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Response body returned by the endpoint
    pub body: Value,
    /// When the acknowledgement was received
    pub received_at: DateTime<Utc>,
}

impl OrderAck {
    /// Wrap an endpoint response body.
    pub fn new(body: Value) -> Self {
        Self {
            body,
            received_at: Utc::now(),
        }
    }
}
