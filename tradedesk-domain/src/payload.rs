//! Wire payload contract.
//!
//! Checks an untyped JSON value against the trade parameter contract and
//! produces a [`TradeParameterSet`] or the full list of offending fields.
//!
//! Rules:
//! - the payload must be a JSON object
//! - `symbol` and the eight per-side numeric fields are required strings
//! - numeric fields must be empty or parse to a finite number
//! - a legacy single `volume` key is migrated into both `long_volume` and
//!   `short_volume`; mixing it with per-side volume keys is rejected
//! - unknown keys are ignored

use serde_json::{Map, Value};

use crate::entities::TradeParameterSet;
use crate::validation::INVALID_NUMBER;
use crate::value_objects::{parse_number, DomainError, FieldIssue, Leg, Side, TradeField};

/// Key of the legacy shared-volume field.
pub const LEGACY_VOLUME_KEY: &str = "volume";

const REQUIRED: &str = "Required";
const EXPECTED_STRING: &str = "Expected string";
const EXPECTED_OBJECT: &str = "Expected object";
const AMBIGUOUS_VOLUME: &str = "Ambiguous volume: send either volume or long_volume/short_volume";

impl TradeParameterSet {
    /// Parse and validate an untyped JSON payload.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPayload` listing every offending field.
    /// Nothing is partially applied: either the whole set is returned or none.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Some(object) = value.as_object() else {
            return Err(DomainError::InvalidPayload(vec![FieldIssue::new(
                "payload",
                EXPECTED_OBJECT,
            )]));
        };

        let mut issues = Vec::new();
        let mut trade = TradeParameterSet::default();

        let legacy_volume = migrate_legacy_volume(object, &mut issues);

        for field in TradeField::ALL {
            let text = match (object.get(field.key()), field.split()) {
                // An unusable legacy volume is already reported under its own key
                (None, Some((_, Leg::Volume))) if object.contains_key(LEGACY_VOLUME_KEY) => {
                    legacy_volume.clone()
                }
                (raw, _) => read_string(field.key(), raw, &mut issues),
            };

            let Some(text) = text else { continue };
            if field.is_numeric() && !text.is_empty() && parse_number(&text).is_none() {
                issues.push(FieldIssue::new(field.key(), INVALID_NUMBER));
                continue;
            }
            trade.set(field, text);
        }

        if issues.is_empty() {
            Ok(trade)
        } else {
            Err(DomainError::InvalidPayload(issues))
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            DomainError::InvalidPayload(vec![FieldIssue::new("payload", e.to_string())])
        })?;
        Self::from_json(&value)
    }
}

/// Resolve the legacy shared `volume` key.
///
/// Returns the text to copy into both per-side volumes, or `None` when the
/// key is absent or unusable (the reason is pushed onto `issues`).
fn migrate_legacy_volume(object: &Map<String, Value>, issues: &mut Vec<FieldIssue>) -> Option<String> {
    let raw = object.get(LEGACY_VOLUME_KEY)?;

    let has_per_side = Side::ALL
        .iter()
        .any(|side| object.contains_key(TradeField::of(*side, Leg::Volume).key()));
    if has_per_side {
        issues.push(FieldIssue::new(LEGACY_VOLUME_KEY, AMBIGUOUS_VOLUME));
        return None;
    }

    let text = read_string(LEGACY_VOLUME_KEY, Some(raw), issues)?;
    if !text.is_empty() && parse_number(&text).is_none() {
        issues.push(FieldIssue::new(LEGACY_VOLUME_KEY, INVALID_NUMBER));
        return None;
    }
    Some(text)
}

fn read_string(key: &str, raw: Option<&Value>, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match raw {
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            issues.push(FieldIssue::new(key, EXPECTED_STRING));
            None
        }
        None => {
            issues.push(FieldIssue::new(key, REQUIRED));
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
