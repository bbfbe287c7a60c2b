//! Trade Desk Domain Entities
//!
//! The in-flight trade proposal: a symbol plus entry, take-profit,
//! stop-loss and volume for each side, all kept as text.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Leg, NumericString, Side, TradeField};

// =============================================================================
// TradeParameterSet
// =============================================================================

/// A single trade proposal covering both sides.
///
/// Serializes to the flat wire form used by the ingest and pull endpoints:
///
/// ```json
/// { "symbol": "BTCUSDT",
///   "long_entry": "100", "long_tp": "110", "long_sl": "95", "long_volume": "1",
///   "short_entry": "", "short_tp": "", "short_sl": "", "short_volume": "" }
/// ```
///
/// # Invariants
/// - Numeric parameters are stored as text and never as parsed numbers
/// - Per-side volume (`long_volume` / `short_volume`) is canonical
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeParameterSet {
    /// Instrument symbol, may be empty
    pub symbol: String,
    /// Long entry price
    pub long_entry: NumericString,
    /// Long take-profit price
    pub long_tp: NumericString,
    /// Long stop-loss price
    pub long_sl: NumericString,
    /// Long volume
    pub long_volume: NumericString,
    /// Short entry price
    pub short_entry: NumericString,
    /// Short take-profit price
    pub short_tp: NumericString,
    /// Short stop-loss price
    pub short_sl: NumericString,
    /// Short volume
    pub short_volume: NumericString,
}

impl TradeParameterSet {
    /// Create an empty proposal for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for one side's four parameters.
    pub fn with_side(
        mut self,
        side: Side,
        entry: impl Into<NumericString>,
        tp: impl Into<NumericString>,
        sl: impl Into<NumericString>,
        volume: impl Into<NumericString>,
    ) -> Self {
        *self.leg_mut(side, Leg::Entry) = entry.into();
        *self.leg_mut(side, Leg::TakeProfit) = tp.into();
        *self.leg_mut(side, Leg::StopLoss) = sl.into();
        *self.leg_mut(side, Leg::Volume) = volume.into();
        self
    }

    /// Raw text of any field.
    pub fn get(&self, field: TradeField) -> &str {
        match field.split() {
            Some((side, leg)) => self.leg(side, leg).as_str(),
            None => &self.symbol,
        }
    }

    /// Overwrite the raw text of any field.
    pub fn set(&mut self, field: TradeField, value: impl Into<String>) {
        match field.split() {
            Some((side, leg)) => *self.leg_mut(side, leg) = NumericString::new(value),
            None => self.symbol = value.into(),
        }
    }

    /// Borrowed view of one side's parameters.
    pub fn side(&self, side: Side) -> SideParameters<'_> {
        SideParameters {
            side,
            entry: self.leg(side, Leg::Entry),
            tp: self.leg(side, Leg::TakeProfit),
            sl: self.leg(side, Leg::StopLoss),
            volume: self.leg(side, Leg::Volume),
        }
    }

    fn leg(&self, side: Side, leg: Leg) -> &NumericString {
        match (side, leg) {
            (Side::Long, Leg::Entry) => &self.long_entry,
            (Side::Long, Leg::TakeProfit) => &self.long_tp,
            (Side::Long, Leg::StopLoss) => &self.long_sl,
            (Side::Long, Leg::Volume) => &self.long_volume,
            (Side::Short, Leg::Entry) => &self.short_entry,
            (Side::Short, Leg::TakeProfit) => &self.short_tp,
            (Side::Short, Leg::StopLoss) => &self.short_sl,
            (Side::Short, Leg::Volume) => &self.short_volume,
        }
    }

    fn leg_mut(&mut self, side: Side, leg: Leg) -> &mut NumericString {
        match (side, leg) {
            (Side::Long, Leg::Entry) => &mut self.long_entry,
            (Side::Long, Leg::TakeProfit) => &mut self.long_tp,
            (Side::Long, Leg::StopLoss) => &mut self.long_sl,
            (Side::Long, Leg::Volume) => &mut self.long_volume,
            (Side::Short, Leg::Entry) => &mut self.short_entry,
            (Side::Short, Leg::TakeProfit) => &mut self.short_tp,
            (Side::Short, Leg::StopLoss) => &mut self.short_sl,
            (Side::Short, Leg::Volume) => &mut self.short_volume,
        }
    }
}

// =============================================================================
// SideParameters
// =============================================================================

/// Borrowed view of one side of a [`TradeParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideParameters<'a> {
    /// Which side this view covers
    pub side: Side,
    /// Entry price text
    pub entry: &'a NumericString,
    /// Take-profit text
    pub tp: &'a NumericString,
    /// Stop-loss text
    pub sl: &'a NumericString,
    /// Volume text
    pub volume: &'a NumericString,
}

impl<'a> SideParameters<'a> {
    /// Text of one leg.
    pub fn leg(&self, leg: Leg) -> &'a NumericString {
        match leg {
            Leg::Entry => self.entry,
            Leg::TakeProfit => self.tp,
            Leg::StopLoss => self.sl,
            Leg::Volume => self.volume,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
