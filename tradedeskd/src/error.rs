//! Daemon error types.

use thiserror::Error;
use tradedesk_connectors::ConnectorError;
use tradedesk_domain::{DomainError, Side, TradeField};
use tradedesk_exec::ExecError;
use tradedesk_store::StoreError;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Execution error
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Remote desk client error
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// Submission refused because the side does not pass the readiness gate
    #[error("{side} side is not ready: missing {missing:?}, invalid {invalid:?}")]
    NotReady {
        /// Side that was asked to submit
        side: Side,
        /// Required fields that are empty
        missing: Vec<TradeField>,
        /// Fields that fail validation
        invalid: Vec<TradeField>,
    },

    /// API listener could not be bound
    #[error("Failed to bind {addr}: {reason}")]
    Bind {
        /// Address that was requested
        addr: String,
        /// Underlying I/O error
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
