//! Storage layer errors

use thiserror::Error;
use tradedesk_domain::{DomainError, FieldIssue};

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// Payload rejected at the ingestion boundary; the slot was not touched
    #[error("Ingest rejected: {0}")]
    Rejected(#[from] DomainError),

    /// Latest trade could not be fetched from a remote source
    #[error("Source unavailable: {0}")]
    Source(String),

    /// Fetched payload does not match the trade contract
    #[error("Schema mismatch: {0}")]
    Schema(String),
}

impl StoreError {
    /// Field issues for a rejected ingest, empty otherwise.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            StoreError::Rejected(err) => err.issues(),
            _ => &[],
        }
    }

    /// Create a source-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
