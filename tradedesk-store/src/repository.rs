//! Repository trait definitions (Ports)
//!
//! These traits define the storage interface for the shared trade slot.
//! Implementations can be in-memory, remote (HTTP) or mock for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tradedesk_domain::TradeParameterSet;

use crate::error::StoreError;

/// Acknowledgement of an accepted ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    /// Number of accepted ingests so far, this one included
    pub revision: u64,
    /// When the slot was replaced
    pub updated_at: DateTime<Utc>,
}

/// Slot metadata, not part of the pull payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    /// Whether any ingest has been accepted yet
    pub populated: bool,
    /// Number of accepted ingests
    pub revision: u64,
    /// Time of the last accepted ingest
    pub updated_at: Option<DateTime<Utc>>,
}

/// Single-slot, last-write-wins store for the latest trade.
///
/// The slot starts empty and never returns to empty. Every accepted ingest
/// replaces it wholesale; there is no merge across pushes.
#[async_trait]
pub trait TradeSlotStore: Send + Sync {
    /// Validate `payload` and, if it satisfies the trade contract, replace the slot.
    ///
    /// On rejection the slot is left exactly as it was.
    async fn ingest(&self, payload: &Value) -> Result<IngestReceipt, StoreError>;

    /// Current slot contents, `None` if never populated. Never fails.
    async fn pull(&self) -> Option<Arc<TradeParameterSet>>;

    /// Slot metadata.
    async fn status(&self) -> SlotStatus;

    /// Current slot as JSON, or an empty object if never populated.
    async fn pull_json(&self) -> Value {
        match self.pull().await {
            Some(trade) => serde_json::to_value(trade.as_ref())
                .unwrap_or_else(|_| Value::Object(Default::default())),
            None => Value::Object(Default::default()),
        }
    }
}

/// Anything a desk can pull the latest trade from.
///
/// `Ok(None)` means the source has nothing yet; it is not a failure.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetch the latest trade.
    async fn fetch_latest(&self) -> Result<Option<TradeParameterSet>, StoreError>;
}
