//! Whole-proposal evaluation.
//!
//! Runs the validator once, then the metrics calculator and the readiness
//! gate for both sides. This is what the desk recomputes after every edit
//! and every applied sync.

use serde::Serialize;
use tracing::debug;
use tradedesk_domain::{validate, Side, TradeParameterSet, ValidationResult};

use crate::metrics::RiskMetrics;
use crate::readiness::Readiness;

/// Metrics and gate decision for one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideAssessment {
    /// Risk metrics (NaN when incomplete)
    pub metrics: RiskMetrics,
    /// Gate decision and advisory warning
    pub readiness: Readiness,
}

/// Evaluation of a whole trade proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeAssessment {
    /// Per-field validation
    pub validation: ValidationResult,
    /// Long side
    pub long: SideAssessment,
    /// Short side
    pub short: SideAssessment,
}

impl TradeAssessment {
    /// Assessment of one side.
    pub fn side(&self, side: Side) -> &SideAssessment {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    /// Whether submission is enabled for `side`.
    pub fn is_ready(&self, side: Side) -> bool {
        self.side(side).readiness.ready
    }
}

/// Stateless evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `trade`.
    pub fn evaluate(&self, trade: &TradeParameterSet) -> TradeAssessment {
        let validation = validate(trade);
        let assess = |side: Side| SideAssessment {
            metrics: RiskMetrics::for_side(&trade.side(side)),
            readiness: Readiness::evaluate(trade, &validation, side),
        };
        let long = assess(Side::Long);
        let short = assess(Side::Short);

        debug!(
            symbol = %trade.symbol,
            long_ready = long.readiness.ready,
            short_ready = short.readiness.ready,
            invalid_fields = validation.errors().count(),
            "Trade evaluated"
        );

        TradeAssessment {
            validation,
            long,
            short,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tradedesk_domain::TradeField;

    #[test]
    fn test_evaluate_both_sides() {
        let trade = TradeParameterSet::new("BTCUSDT")
            .with_side(Side::Long, "100", "110", "95", "1")
            .with_side(Side::Short, "100", "90", "105", "");

        let assessment = Engine::new().evaluate(&trade);

        assert!(assessment.validation.is_valid());
        assert!(assessment.is_ready(Side::Long));
        assert!(!assessment.is_ready(Side::Short));
        assert_eq!(assessment.short.readiness.missing, vec![TradeField::ShortVolume]);
        // Metrics do not need volume
        assert_eq!(assessment.short.metrics.format_ratio(), "2.00");
        assert_eq!(assessment.long.metrics.format_ratio(), "2.00");
    }

    #[test]
    fn test_invalid_field_does_not_block_other_metrics() {
        let trade = TradeParameterSet::new("BTCUSDT")
            .with_side(Side::Long, "100", "11o", "95", "1")
            .with_side(Side::Short, "100", "90", "105", "1");

        let assessment = Engine::new().evaluate(&trade);

        assert_eq!(assessment.validation.error(TradeField::LongTp), Some("Invalid"));
        assert!(assessment.long.metrics.is_unknown());
        assert!(!assessment.is_ready(Side::Long));
        assert!(!assessment.short.metrics.is_unknown());
        assert!(assessment.is_ready(Side::Short));
    }

    #[test]
    fn test_side_assessment_serializes_unknown_as_null() {
        let trade = TradeParameterSet::new("BTCUSDT");
        let assessment = Engine::new().evaluate(&trade);
        let json = serde_json::to_value(&assessment.long).unwrap();
        assert!(json["metrics"]["risk_reward"].is_null());
        assert_eq!(json["readiness"]["ready"], false);
    }
}
