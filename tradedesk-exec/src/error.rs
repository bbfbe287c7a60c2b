//! Execution layer error types.

use thiserror::Error;

/// Errors that can occur while submitting an order.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Execution endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Execution endpoint answered with a non-success status
    #[error("Order rejected ({status}): {message}")]
    Rejected {
        /// HTTP status (or equivalent) returned by the endpoint
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Endpoint reply could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout waiting for the endpoint
    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
