//! Trade Desk Connectors
//!
//! HTTP adapter for a remote desk server. Lets a desk pull the latest trade
//! and submit orders against another process instead of in-process ports.

#![warn(clippy::all)]

// Public modules
pub mod desk_rest;

// Re-exports
pub use desk_rest::{ConnectorError, DeskRestClient};
