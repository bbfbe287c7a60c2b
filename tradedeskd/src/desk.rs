//! Desk: the single owner of the locally displayed trade proposal.
//!
//! Edits and recomputation run synchronously under one lock. The sync loop is
//! the only asynchronous mutator and goes through [`Desk::apply_synced`],
//! which refuses writes from a sync session that has since been stopped.
//!
//! # Generation guard
//!
//! `begin_sync` and `end_sync` both bump the generation. A sync session
//! captures the value returned by `begin_sync` and every apply compares it
//! against the current value under the lock, so once `end_sync` has run no
//! pull started by that session can land, even one already in flight.

use std::sync::{Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tradedesk_domain::{Side, TradeField, TradeParameterSet};
use tradedesk_engine::{Engine, TradeAssessment};
use tradedesk_exec::{OrderRequest, OrderSubmitter};

use crate::error::{DaemonError, DaemonResult};

/// State guarded by the desk lock.
struct DeskState {
    trade: TradeParameterSet,
    generation: u64,
}

/// Snapshot of the desk: the proposal and everything derived from it.
#[derive(Debug, Clone)]
pub struct DeskView {
    /// Current proposal
    pub trade: TradeParameterSet,
    /// Validation, metrics and readiness for both sides
    pub assessment: TradeAssessment,
}

/// Local trade desk.
pub struct Desk {
    state: Mutex<DeskState>,
    engine: Engine,
    submitter: OrderSubmitter,
}

impl Desk {
    /// Create a desk with an empty proposal.
    pub fn new(submitter: OrderSubmitter) -> Self {
        Self::with_trade(TradeParameterSet::default(), submitter)
    }

    /// Create a desk seeded with `trade`.
    pub fn with_trade(trade: TradeParameterSet, submitter: OrderSubmitter) -> Self {
        Self {
            state: Mutex::new(DeskState {
                trade,
                generation: 0,
            }),
            engine: Engine::new(),
            submitter,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeskState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current proposal.
    pub fn trade(&self) -> TradeParameterSet {
        self.lock().trade.clone()
    }

    /// Current proposal with its assessment.
    pub fn view(&self) -> DeskView {
        let trade = self.trade();
        let assessment = self.engine.evaluate(&trade);
        DeskView { trade, assessment }
    }

    /// Overwrite one field and return the recomputed assessment.
    pub fn edit(&self, field: TradeField, value: impl Into<String>) -> TradeAssessment {
        let mut state = self.lock();
        state.trade.set(field, value);
        self.engine.evaluate(&state.trade)
    }

    /// Current sync generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Open a sync session; returns the generation its applies must carry.
    pub fn begin_sync(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.generation
    }

    /// Close the session opened with `generation`. Closing an already
    /// superseded session is a no-op.
    pub fn end_sync(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation {
            state.generation += 1;
        }
    }

    /// Replace the proposal with a pulled one if `generation` is still current.
    ///
    /// Returns whether the trade was applied.
    pub fn apply_synced(&self, generation: u64, trade: TradeParameterSet) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "Dropping pull from stopped sync session"
            );
            return false;
        }
        if state.trade != trade {
            let assessment = self.engine.evaluate(&trade);
            info!(
                symbol = %trade.symbol,
                generation,
                long_ready = assessment.long.readiness.ready,
                long_ordering_warning = assessment.long.readiness.ordering_warning,
                long_risk_reward = %assessment.long.metrics.format_ratio(),
                short_ready = assessment.short.readiness.ready,
                short_ordering_warning = assessment.short.readiness.ordering_warning,
                short_risk_reward = %assessment.short.metrics.format_ratio(),
                "Desk updated from sync"
            );
        }
        state.trade = trade;
        true
    }

    /// Submit `side` of the current proposal.
    ///
    /// Refused with [`DaemonError::NotReady`] unless the side passes the
    /// readiness gate. An inverted bracket is logged but does not block.
    pub fn place_order(&self, side: Side) -> DaemonResult<JoinHandle<()>> {
        let request = {
            let state = self.lock();
            let assessment = self.engine.evaluate(&state.trade);
            let readiness = &assessment.side(side).readiness;
            if !readiness.ready {
                return Err(DaemonError::NotReady {
                    side,
                    missing: readiness.missing.clone(),
                    invalid: readiness.invalid.clone(),
                });
            }
            if readiness.ordering_warning {
                warn!(%side, symbol = %state.trade.symbol, "Submitting with inverted price ordering");
            }
            OrderRequest::from_trade(side, &state.trade)
        };

        Ok(self.submitter.submit(request))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tradedesk_exec::EchoExecution;

    fn desk() -> (Desk, Arc<EchoExecution>) {
        let echo = Arc::new(EchoExecution::new());
        (Desk::new(OrderSubmitter::new(echo.clone())), echo)
    }

    fn ready_long() -> TradeParameterSet {
        TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "110", "95", "1")
    }

    #[test]
    fn test_edit_recomputes() {
        let (desk, _) = desk();
        desk.edit(TradeField::Symbol, "BTCUSDT");
        desk.edit(TradeField::LongEntry, "100");
        desk.edit(TradeField::LongTp, "110");
        desk.edit(TradeField::LongSl, "95");
        let assessment = desk.edit(TradeField::LongVolume, "1");

        assert!(assessment.is_ready(Side::Long));
        assert_eq!(assessment.long.metrics.format_ratio(), "2.00");

        let assessment = desk.edit(TradeField::LongTp, "abc");
        assert_eq!(assessment.validation.error(TradeField::LongTp), Some("Invalid"));
        assert!(!assessment.is_ready(Side::Long));
        assert_eq!(desk.trade().long_tp.as_str(), "abc");
    }

    #[test]
    fn test_apply_synced_respects_generation() {
        let (desk, _) = desk();
        let generation = desk.begin_sync();

        assert!(desk.apply_synced(generation, ready_long()));
        assert_eq!(desk.trade(), ready_long());

        desk.end_sync(generation);
        let later = TradeParameterSet::new("ETHUSDT");
        assert!(!desk.apply_synced(generation, later));
        assert_eq!(desk.trade().symbol, "BTCUSDT");
    }

    #[test]
    fn test_new_session_supersedes_old_one() {
        let (desk, _) = desk();
        let old = desk.begin_sync();
        let new = desk.begin_sync();

        assert!(!desk.apply_synced(old, ready_long()));
        // Ending the superseded session does not disturb the live one
        desk.end_sync(old);
        assert!(desk.apply_synced(new, ready_long()));
    }

    #[tokio::test]
    async fn test_place_order_when_ready() {
        let (desk, echo) = desk();
        let generation = desk.begin_sync();
        desk.apply_synced(generation, ready_long());

        desk.place_order(Side::Long).unwrap().await.unwrap();

        let sent = echo.submitted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], OrderRequest::from_trade(Side::Long, &ready_long()));
    }

    #[tokio::test]
    async fn test_place_order_refused_when_not_ready() {
        let (desk, echo) = desk();
        desk.apply_synced(desk.generation(), ready_long());

        let err = desk.place_order(Side::Short).unwrap_err();
        match err {
            DaemonError::NotReady { side, missing, invalid } => {
                assert_eq!(side, Side::Short);
                assert_eq!(missing, TradeField::for_side(Side::Short).to_vec());
                assert!(invalid.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(echo.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_ordering_warning_does_not_block() {
        let (desk, echo) = desk();
        let inverted = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "90", "95", "1");
        desk.apply_synced(desk.generation(), inverted);

        assert!(desk.view().assessment.long.readiness.ordering_warning);
        desk.place_order(Side::Long).unwrap().await.unwrap();
        assert_eq!(echo.submitted().len(), 1);
    }
}
