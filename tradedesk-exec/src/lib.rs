//! Trade Desk Execution Layer
//!
//! Turns one side of a trade proposal into an order and hands it to an
//! execution endpoint.
//!
//! # Architecture
//!
//! ```text
//! Desk (side ready) → OrderRequest → OrderSubmitter → ExecutionPort → log
//! ```
//!
//! # Components
//!
//! - **Order**: `OrderRequest`, textual values copied from the proposal
//! - **Ports**: `ExecutionPort` trait for the endpoint
//! - **Submitter**: spawns the submission, logs the outcome, never retries
//! - **Stub**: `EchoExecution`, in-process endpoint for the daemon and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use tradedesk_exec::{EchoExecution, OrderRequest, OrderSubmitter};
//! use std::sync::Arc;
//!
//! let submitter = OrderSubmitter::new(Arc::new(EchoExecution::new()));
//! submitter.submit(OrderRequest::from_trade(Side::Long, &trade));
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod order;
pub mod ports;
pub mod stub;
pub mod submitter;

// Re-exports for convenience
pub use error::{ExecError, ExecResult};
pub use order::OrderRequest;
pub use ports::{ExecutionPort, OrderAck};
pub use stub::EchoExecution;
pub use submitter::OrderSubmitter;
