//! Trade Desk Storage Layer
//!
//! Holds the single shared "latest trade" slot that ingestion writes and
//! desks poll.
//!
//! # Architecture
//!
//! - **Repository traits**: `TradeSlotStore` (push/pull backend) and
//!   `TradeSource` (anything a desk can pull the latest trade from)
//! - **In-memory slot**: atomic, last-write-wins implementation
//!
//! # Usage
//!
//! ```rust
//! use tradedesk_store::{MemoryTradeSlot, TradeSlotStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let slot = MemoryTradeSlot::new();
//!     assert_eq!(slot.pull_json().await, json!({}));
//!
//!     let payload = json!({
//!         "symbol": "BTCUSDT",
//!         "long_entry": "100", "long_tp": "110", "long_sl": "95", "long_volume": "1",
//!         "short_entry": "", "short_tp": "", "short_sl": "", "short_volume": ""
//!     });
//!     let receipt = slot.ingest(&payload).await.unwrap();
//!     assert_eq!(receipt.revision, 1);
//!     assert_eq!(slot.pull_json().await["long_tp"], "110");
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
mod repository;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use memory::MemoryTradeSlot;
pub use repository::{IngestReceipt, SlotStatus, TradeSlotStore, TradeSource};
