//! Trade Desk Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes a trade proposal → returns risk metrics and readiness per side.

#![warn(clippy::all)]

pub mod assessment;
pub mod metrics;
pub mod readiness;

pub use assessment::{Engine, SideAssessment, TradeAssessment};
pub use metrics::{compute_metrics, RiskMetrics, LOSS_FLOOR};
pub use readiness::{ordering_warning, Readiness};
