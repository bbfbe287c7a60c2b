//! Value Objects for the Trade Desk Domain
//!
//! Small, copyable domain primitives: trade sides, the fields of a trade
//! parameter set, and the textual numeric representation used for every
//! price and volume.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Payload does not satisfy the trade parameter contract
    #[error("Invalid trade payload: {}", summarize(.0))]
    InvalidPayload(Vec<FieldIssue>),

    /// Unknown side name
    #[error("Invalid side: {0}. Expected: long or short")]
    InvalidSide(String),

    /// Unknown field name
    #[error("Unknown trade field: {0}")]
    UnknownField(String),
}

impl DomainError {
    /// Field issues carried by a payload rejection (empty for other variants).
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            DomainError::InvalidPayload(issues) => issues,
            _ => &[],
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single field-level problem found while checking a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Wire name of the offending field
    pub field: String,
    /// Human readable message
    pub message: String,
}

impl FieldIssue {
    /// Create a new field issue.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Side
// =============================================================================

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Long position (buy low, sell high)
    Long,
    /// Short position (sell high, buy low)
    Short,
}

impl Side {
    /// Both sides, long first.
    pub const ALL: [Side; 2] = [Side::Long, Side::Short];

    /// Lowercase wire name ("long" / "short").
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            _ => Err(DomainError::InvalidSide(s.to_string())),
        }
    }
}

// =============================================================================
// Leg / TradeField
// =============================================================================

/// One of the four per-side numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// Entry price
    Entry,
    /// Take-profit price
    TakeProfit,
    /// Stop-loss price
    StopLoss,
    /// Order volume
    Volume,
}

impl Leg {
    /// All legs in display order.
    pub const ALL: [Leg; 4] = [Leg::Entry, Leg::TakeProfit, Leg::StopLoss, Leg::Volume];

    /// Flat JSON key of this leg on `side`.
    pub fn key(&self, side: Side) -> String {
        format!("{}_{}", side.as_str(), self.suffix())
    }

    fn suffix(&self) -> &'static str {
        match self {
            Leg::Entry => "entry",
            Leg::TakeProfit => "tp",
            Leg::StopLoss => "sl",
            Leg::Volume => "volume",
        }
    }
}

/// Every field of a [`TradeParameterSet`](crate::TradeParameterSet).
///
/// The wire name of each variant is the flat JSON key used by the ingestion
/// and pull endpoints (`long_entry`, `short_tp`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeField {
    /// Instrument symbol
    Symbol,
    /// Long entry
    LongEntry,
    /// Long take-profit
    LongTp,
    /// Long stop-loss
    LongSl,
    /// Long volume
    LongVolume,
    /// Short entry
    ShortEntry,
    /// Short take-profit
    ShortTp,
    /// Short stop-loss
    ShortSl,
    /// Short volume
    ShortVolume,
}

impl TradeField {
    /// All fields in wire order.
    pub const ALL: [TradeField; 9] = [
        TradeField::Symbol,
        TradeField::LongEntry,
        TradeField::LongTp,
        TradeField::LongSl,
        TradeField::LongVolume,
        TradeField::ShortEntry,
        TradeField::ShortTp,
        TradeField::ShortSl,
        TradeField::ShortVolume,
    ];

    /// The field holding `leg` for `side`.
    pub fn of(side: Side, leg: Leg) -> Self {
        match (side, leg) {
            (Side::Long, Leg::Entry) => TradeField::LongEntry,
            (Side::Long, Leg::TakeProfit) => TradeField::LongTp,
            (Side::Long, Leg::StopLoss) => TradeField::LongSl,
            (Side::Long, Leg::Volume) => TradeField::LongVolume,
            (Side::Short, Leg::Entry) => TradeField::ShortEntry,
            (Side::Short, Leg::TakeProfit) => TradeField::ShortTp,
            (Side::Short, Leg::StopLoss) => TradeField::ShortSl,
            (Side::Short, Leg::Volume) => TradeField::ShortVolume,
        }
    }

    /// Numeric fields of one side in display order.
    pub fn for_side(side: Side) -> [TradeField; 4] {
        Leg::ALL.map(|leg| TradeField::of(side, leg))
    }

    /// Side and leg of a numeric field; `None` for the symbol.
    pub fn split(&self) -> Option<(Side, Leg)> {
        Side::ALL
            .into_iter()
            .flat_map(|side| Leg::ALL.map(move |leg| (side, leg)))
            .find(|(side, leg)| TradeField::of(*side, *leg) == *self)
    }

    /// Whether the field is a numeric-string field.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, TradeField::Symbol)
    }

    /// Flat JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            TradeField::Symbol => "symbol",
            TradeField::LongEntry => "long_entry",
            TradeField::LongTp => "long_tp",
            TradeField::LongSl => "long_sl",
            TradeField::LongVolume => "long_volume",
            TradeField::ShortEntry => "short_entry",
            TradeField::ShortTp => "short_tp",
            TradeField::ShortSl => "short_sl",
            TradeField::ShortVolume => "short_volume",
        }
    }
}

impl fmt::Display for TradeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TradeField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradeField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

// =============================================================================
// NumericString
// =============================================================================

/// Textual numeric value exactly as the trader (or the producer) typed it.
///
/// The text is canonical: it is never normalized, so leading zeros and
/// partial edits such as `"1."` survive until computation time. Whether the
/// text is acceptable is decided by the field validator, not at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericString(String);

impl NumericString {
    /// Wrap raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The empty value ("not yet provided").
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing has been provided.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parsed finite value, `None` when empty or not a finite number.
    pub fn value(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        parse_number(&self.0)
    }

    /// Empty, or parses to a finite number.
    pub fn is_valid(&self) -> bool {
        self.is_empty() || self.value().is_some()
    }

    /// Parsed value or the NaN sentinel.
    pub fn value_or_nan(&self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for NumericString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NumericString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NumericString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parse numeric text into a finite `f64`, with JavaScript `Number()` rules.
///
/// Surrounding whitespace is ignored and blank text reads as `0`. Accepts
/// decimal notation with optional sign, fraction and exponent, plus unsigned
/// `0x`, `0o` and `0b` integer literals. Rejects currency symbols, thousands
/// separators, and the `inf`/`nan` spellings; `Infinity` and values
/// overflowing to infinity are rejected as not finite.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let value = match radix_literal(trimmed) {
        Some((radix, digits)) => parse_radix(digits, radix)?,
        None => {
            // f64::from_str also understands "inf"/"nan"; only digits may lead.
            if !trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
            {
                return None;
            }
            f64::from_str(trimmed).ok()?
        }
    };
    value.is_finite().then_some(value)
}

fn radix_literal(text: &str) -> Option<(u32, &str)> {
    let prefix = text.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

// =============================================================================
// Tests
// =============================================================================
