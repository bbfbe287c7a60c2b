//! Order-readiness gate.
//!
//! A side is ready when the symbol and the side's four parameters are
//! present and valid. The bracket-ordering check is advisory and never
//! closes the gate: traders may submit atypical brackets on purpose.

use serde::Serialize;
use tradedesk_domain::{Side, TradeField, TradeParameterSet, ValidationResult};

/// Gate decision for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    /// Side the decision applies to
    pub side: Side,
    /// Whether submission is enabled
    pub ready: bool,
    /// Required fields that are still empty
    pub missing: Vec<TradeField>,
    /// Required fields that failed validation
    pub invalid: Vec<TradeField>,
    /// Bracket ordering looks wrong (advisory only)
    pub ordering_warning: bool,
}

impl Readiness {
    /// Evaluate the gate for `side`.
    ///
    /// Only the symbol and `side`'s own fields are consulted.
    pub fn evaluate(trade: &TradeParameterSet, validation: &ValidationResult, side: Side) -> Self {
        let required = std::iter::once(TradeField::Symbol).chain(TradeField::for_side(side));

        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        for field in required {
            if trade.get(field).is_empty() {
                missing.push(field);
            } else if !validation.is_field_valid(field) {
                invalid.push(field);
            }
        }

        Self {
            side,
            ready: missing.is_empty() && invalid.is_empty(),
            missing,
            invalid,
            ordering_warning: ordering_warning(trade, side),
        }
    }
}

/// Advisory bracket check.
///
/// - long: requires `sl < entry < tp`
/// - short: requires `tp < entry < sl`
///
/// Returns `false` while any of the three prices is missing or unparseable;
/// there is nothing to warn about until the bracket is complete. Unlike a
/// plain numeric comparison, an incomplete bracket never raises the warning.
pub fn ordering_warning(trade: &TradeParameterSet, side: Side) -> bool {
    let params = trade.side(side);
    let (Some(entry), Some(tp), Some(sl)) = (params.entry.value(), params.tp.value(), params.sl.value()) else {
        return false;
    };

    let ordered = match side {
        Side::Long => sl < entry && entry < tp,
        Side::Short => tp < entry && entry < sl,
    };
    !ordered
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tradedesk_domain::validate;

    fn gate(trade: &TradeParameterSet, side: Side) -> Readiness {
        Readiness::evaluate(trade, &validate(trade), side)
    }

    #[test]
    fn test_complete_long_is_ready_without_warning() {
        let trade = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "110", "95", "1");
        let r = gate(&trade, Side::Long);
        assert!(r.ready);
        assert!(!r.ordering_warning);
        assert!(r.missing.is_empty());
    }

    #[test]
    fn test_inverted_long_bracket_warns_but_stays_ready() {
        let trade = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "90", "95", "1");
        let r = gate(&trade, Side::Long);
        assert!(r.ordering_warning);
        assert!(r.ready);
    }

    #[test]
    fn test_short_bracket_ordering() {
        let ok = TradeParameterSet::new("BTCUSDT").with_side(Side::Short, "100", "90", "105", "1");
        assert!(!gate(&ok, Side::Short).ordering_warning);

        let inverted = TradeParameterSet::new("BTCUSDT").with_side(Side::Short, "100", "110", "95", "1");
        assert!(gate(&inverted, Side::Short).ordering_warning);

        // Equal prices violate the strict ordering
        let flat = TradeParameterSet::new("BTCUSDT").with_side(Side::Short, "100", "100", "105", "1");
        assert!(gate(&flat, Side::Short).ordering_warning);
    }

    #[test]
    fn test_incomplete_bracket_never_warns() {
        for (entry, tp, sl) in [("", "90", "95"), ("abc", "90", "95"), ("100", "", ""), ("100", "90", "x")] {
            let trade = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, entry, tp, sl, "1");
            assert!(!ordering_warning(&trade, Side::Long), "{entry:?} {tp:?} {sl:?}");
        }
    }

    #[test]
    fn test_missing_entry_closes_gate() {
        let trade = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "", "110", "95", "1");
        let r = gate(&trade, Side::Long);
        assert!(!r.ready);
        assert_eq!(r.missing, vec![TradeField::LongEntry]);
        assert!(!r.ordering_warning);
    }

    #[test]
    fn test_missing_symbol_closes_both_gates() {
        let trade = TradeParameterSet::new("")
            .with_side(Side::Long, "100", "110", "95", "1")
            .with_side(Side::Short, "100", "90", "105", "1");
        for side in Side::ALL {
            let r = gate(&trade, side);
            assert!(!r.ready);
            assert_eq!(r.missing, vec![TradeField::Symbol]);
        }
    }

    #[test]
    fn test_invalid_field_closes_gate() {
        let trade = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "110", "95", "ten");
        let r = gate(&trade, Side::Long);
        assert!(!r.ready);
        assert_eq!(r.invalid, vec![TradeField::LongVolume]);
    }

    #[test]
    fn test_each_empty_required_field_closes_gate_regardless_of_other_side() {
        let complete = TradeParameterSet::new("BTCUSDT")
            .with_side(Side::Long, "100", "110", "95", "1")
            .with_side(Side::Short, "100", "90", "105", "1");

        for side in Side::ALL {
            for field in TradeField::for_side(side) {
                let mut trade = complete.clone();
                trade.set(field, "");
                assert!(!gate(&trade, side).ready, "{} empty should close {}", field, side);
                assert!(gate(&trade, other(side)).ready, "{} empty should not touch {}", field, other(side));
            }
        }
    }

    #[test]
    fn test_other_side_invalid_does_not_affect_gate() {
        let trade = TradeParameterSet::new("BTCUSDT")
            .with_side(Side::Long, "100", "110", "95", "1")
            .with_side(Side::Short, "abc", "x", "", "");
        assert!(gate(&trade, Side::Long).ready);
        assert!(!gate(&trade, Side::Short).ready);
    }

    fn other(side: Side) -> Side {
        match side {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}
