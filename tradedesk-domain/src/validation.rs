//! Field validator.
//!
//! A field is valid when its text is empty ("not yet provided") or parses
//! to a finite number. Validation never fails as a whole; it reports one
//! entry per offending field.

use std::collections::BTreeMap;

use crate::entities::TradeParameterSet;
use crate::value_objects::{FieldIssue, Side, TradeField};

/// Message attached to a numeric field that does not parse.
pub const INVALID_NUMBER: &str = "Invalid";

/// Per-field validation outcome for a whole [`TradeParameterSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<TradeField, String>,
}

impl ValidationResult {
    /// Error message for `field`, `None` when the field is valid.
    pub fn error(&self, field: TradeField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether `field` is free of errors.
    pub fn is_field_valid(&self, field: TradeField) -> bool {
        !self.errors.contains_key(&field)
    }

    /// True when no field has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when none of `side`'s numeric fields has an error.
    pub fn is_side_valid(&self, side: Side) -> bool {
        TradeField::for_side(side)
            .iter()
            .all(|field| self.is_field_valid(*field))
    }

    /// Every field paired with its optional error, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (TradeField, Option<&str>)> + '_ {
        TradeField::ALL
            .into_iter()
            .map(move |field| (field, self.error(field)))
    }

    /// Only the offending fields.
    pub fn errors(&self) -> impl Iterator<Item = (TradeField, &str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Offending fields as wire-level issues.
    pub fn issues(&self) -> Vec<FieldIssue> {
        self.errors()
            .map(|(field, msg)| FieldIssue::new(field.key(), msg))
            .collect()
    }
}

/// Validate every field of `trade`.
pub fn validate(trade: &TradeParameterSet) -> ValidationResult {
    let errors = TradeField::ALL
        .into_iter()
        .filter_map(|field| {
            let (side, leg) = field.split()?;
            let valid = trade.side(side).leg(leg).is_valid();
            (!valid).then(|| (field, INVALID_NUMBER.to_string()))
        })
        .collect();

    ValidationResult { errors }
}

// =============================================================================
// Tests
// =============================================================================
