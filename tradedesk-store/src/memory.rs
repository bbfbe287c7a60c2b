//! In-memory trade slot
//!
//! Thread-safe single slot. Validation happens before the lock is taken;
//! the write itself is a pointer swap, so readers never observe a
//! half-written trade.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use tradedesk_domain::TradeParameterSet;

use crate::error::StoreError;
use crate::repository::{IngestReceipt, SlotStatus, TradeSlotStore, TradeSource};

/// Populated slot contents.
#[derive(Debug)]
struct SlotEntry {
    trade: Arc<TradeParameterSet>,
    receipt: IngestReceipt,
}

/// In-memory, last-write-wins trade slot
pub struct MemoryTradeSlot {
    slot: RwLock<Option<SlotEntry>>,
}

impl MemoryTradeSlot {
    /// Create a new empty slot
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Replace the slot with an already validated trade.
    pub fn replace(&self, trade: TradeParameterSet) -> IngestReceipt {
        let mut slot = self.write();
        let revision = slot.as_ref().map_or(0, |entry| entry.receipt.revision) + 1;
        let receipt = IngestReceipt {
            revision,
            updated_at: Utc::now(),
        };
        *slot = Some(SlotEntry {
            trade: Arc::new(trade),
            receipt: receipt.clone(),
        });
        receipt
    }

    /// Current contents without going through the async trait.
    pub fn snapshot(&self) -> Option<Arc<TradeParameterSet>> {
        self.read().as_ref().map(|entry| Arc::clone(&entry.trade))
    }

    // A panic while holding the lock cannot leave a half-written entry
    // (the write is a single assignment), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Option<SlotEntry>> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SlotEntry>> {
        self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryTradeSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeSlotStore for MemoryTradeSlot {
    async fn ingest(&self, payload: &Value) -> Result<IngestReceipt, StoreError> {
        let trade = TradeParameterSet::from_json(payload).map_err(|err| {
            let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
            warn!(?fields, "Ingest rejected");
            StoreError::Rejected(err)
        })?;

        let symbol = trade.symbol.clone();
        let receipt = self.replace(trade);
        info!(revision = receipt.revision, %symbol, "Trade slot replaced");
        Ok(receipt)
    }

    async fn pull(&self) -> Option<Arc<TradeParameterSet>> {
        self.snapshot()
    }

    async fn status(&self) -> SlotStatus {
        let slot = self.read();
        match slot.as_ref() {
            Some(entry) => SlotStatus {
                populated: true,
                revision: entry.receipt.revision,
                updated_at: Some(entry.receipt.updated_at),
            },
            None => SlotStatus {
                populated: false,
                revision: 0,
                updated_at: None,
            },
        }
    }
}

#[async_trait]
impl TradeSource for MemoryTradeSlot {
    async fn fetch_latest(&self) -> Result<Option<TradeParameterSet>, StoreError> {
        let trade = self.snapshot().map(|trade| trade.as_ref().clone());
        debug!(populated = trade.is_some(), "In-process slot pulled");
        Ok(trade)
    }
}

// =============================================================================
// Tests
// =============================================================================
