//! Trade Desk Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the trade parameter set, its value objects, the field
//! validator and the wire-payload contract used at the ingestion boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod entities;
pub mod payload;
pub mod validation;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{SideParameters, TradeParameterSet};
pub use payload::LEGACY_VOLUME_KEY;
pub use validation::{validate, ValidationResult, INVALID_NUMBER};
pub use value_objects::{parse_number, DomainError, FieldIssue, Leg, NumericString, Side, TradeField};
