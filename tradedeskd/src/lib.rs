//! Trade Desk Daemon Library
//!
//! Serves the shared latest-trade slot over HTTP and runs a local desk that
//! stays in sync with it.
//!
//! # Architecture
//!
//! ```text
//! upstream → POST /api/ui/push → Trade Slot ← GET /api/ui/push ← Sync Loop → Desk
//!                                                                              ↓
//!                                                 Execution ← Order Submitter ←┘
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **API**: Ingest, pull, order and health endpoints, plus `/desk` for
//!   viewing, editing and submitting the local proposal
//! - **Desk**: Local proposal, recomputed on every edit; gates submission
//! - **Sync Loop**: Cancellable periodic pull into the desk
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use tradedeskd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new_stub(config);
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
pub mod desk;
pub mod error;
pub mod sync;

// Re-exports for convenience
pub use api::{create_router, ApiState, DeskResponse, SideResponse};
pub use config::{ApiConfig, ClientConfig, Config, Environment, IngestConfig, LogFormat, SyncConfig};
pub use daemon::Daemon;
pub use desk::{Desk, DeskView};
pub use error::{DaemonError, DaemonResult};
pub use sync::{SyncHandle, SyncLoop, SyncStats};
