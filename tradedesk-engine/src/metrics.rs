//! Risk metrics calculator.
//!
//! Profit rate, loss rate and risk/reward ratio for one side of a trade.
//! Incomplete input yields NaN for all three outputs; zero is never used as
//! a stand-in since it would read as break-even.

use serde::Serialize;
use tradedesk_domain::{Side, SideParameters};

/// Floor applied to the loss rate before dividing.
pub const LOSS_FLOOR: f64 = 1e-9;

/// Risk metrics of one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Relative gain if take-profit is hit
    pub profit_rate: f64,
    /// Relative loss if stop-loss is hit
    pub loss_rate: f64,
    /// profit_rate / max(loss_rate, LOSS_FLOOR)
    pub risk_reward: f64,
}

impl RiskMetrics {
    /// The "unknown" result.
    pub const UNKNOWN: RiskMetrics = RiskMetrics {
        profit_rate: f64::NAN,
        loss_rate: f64::NAN,
        risk_reward: f64::NAN,
    };

    /// True when the inputs were incomplete.
    pub fn is_unknown(&self) -> bool {
        self.profit_rate.is_nan() && self.loss_rate.is_nan() && self.risk_reward.is_nan()
    }

    /// Metrics for a side view of a trade proposal.
    pub fn for_side(params: &SideParameters<'_>) -> Self {
        compute_metrics(
            params.side,
            params.entry.value_or_nan(),
            params.tp.value_or_nan(),
            params.sl.value_or_nan(),
        )
    }

    /// Percentage rendering of a rate, `"—"` when unknown.
    pub fn format_rate(rate: f64) -> String {
        if rate.is_finite() {
            format!("{:.2}%", rate * 100.0)
        } else {
            "—".to_string()
        }
    }

    /// Two-decimal rendering of the ratio, `"—"` when not finite.
    pub fn format_ratio(&self) -> String {
        if self.risk_reward.is_finite() {
            format!("{:.2}", self.risk_reward)
        } else {
            "—".to_string()
        }
    }
}

/// Compute metrics from parsed prices.
///
/// Non-finite `entry`, `tp` or `sl` (missing input is passed as NaN) yields
/// [`RiskMetrics::UNKNOWN`]. Degenerate prices such as `entry == 0` follow
/// IEEE arithmetic and may produce infinities or NaN; this never panics.
pub fn compute_metrics(side: Side, entry: f64, tp: f64, sl: f64) -> RiskMetrics {
    if !entry.is_finite() || !tp.is_finite() || !sl.is_finite() {
        return RiskMetrics::UNKNOWN;
    }

    let (profit_rate, loss_rate) = match side {
        Side::Long => ((tp - entry) / entry, (entry - sl) / entry),
        Side::Short => ((entry - tp) / entry, (sl - entry) / entry),
    };

    RiskMetrics {
        profit_rate,
        loss_rate,
        risk_reward: profit_rate / loss_rate.max(LOSS_FLOOR),
    }
}

// =============================================================================
// Tests
// =============================================================================
