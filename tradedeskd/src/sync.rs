//! Sync loop: keeps a desk in step with the shared trade slot.
//!
//! Pulls immediately on activation, then on every interval tick, until
//! stopped. A failed pull is logged and the loop keeps going; an empty slot
//! leaves the desk alone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tradedesk_store::TradeSource;

use crate::desk::Desk;

/// Counters for a running sync loop.
#[derive(Debug, Default)]
pub struct SyncStats {
    applied: AtomicU64,
    empty: AtomicU64,
    failed: AtomicU64,
}

impl SyncStats {
    /// Pulls that replaced the desk's proposal.
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    /// Pulls that found the slot never populated.
    pub fn empty(&self) -> u64 {
        self.empty.load(Ordering::Relaxed)
    }

    /// Pulls that failed.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Spawner for the periodic pull task.
pub struct SyncLoop;

impl SyncLoop {
    /// Start syncing `desk` from `source` every `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(source: Arc<dyn TradeSource>, desk: Arc<Desk>, period: Duration) -> SyncHandle {
        let cancel = CancellationToken::new();
        let generation = desk.begin_sync();
        let stats = Arc::new(SyncStats::default());

        info!(generation, period_ms = period.as_millis() as u64, "Sync loop started");

        let task = tokio::spawn(run(
            source,
            Arc::clone(&desk),
            period,
            generation,
            cancel.clone(),
            Arc::clone(&stats),
        ));

        SyncHandle {
            cancel,
            desk,
            generation,
            task,
            stats,
        }
    }
}

async fn run(
    source: Arc<dyn TradeSource>,
    desk: Arc<Desk>,
    period: Duration,
    generation: u64,
    cancel: CancellationToken,
    stats: Arc<SyncStats>,
) {
    // First tick completes immediately
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Dropping the pull on cancellation is what keeps a stopped loop
        // from applying; the generation check in the desk backs it up.
        let pulled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            pulled = source.fetch_latest() => pulled,
        };

        match pulled {
            Ok(Some(trade)) => {
                if desk.apply_synced(generation, trade) {
                    stats.applied.fetch_add(1, Ordering::Relaxed);
                } else {
                    break;
                }
            }
            Ok(None) => {
                stats.empty.fetch_add(1, Ordering::Relaxed);
                debug!(generation, "Slot empty, desk left untouched");
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(generation, error = %e, "Sync pull failed");
            }
        }
    }

    info!(generation, applied = stats.applied(), failed = stats.failed(), "Sync loop stopped");
}

/// Handle to a running sync loop.
///
/// Dropping the handle does not stop the loop; call [`SyncHandle::stop`].
pub struct SyncHandle {
    cancel: CancellationToken,
    desk: Arc<Desk>,
    generation: u64,
    task: JoinHandle<()>,
    stats: Arc<SyncStats>,
}

impl SyncHandle {
    /// Stop the loop. No pull, in flight or future, mutates the desk after
    /// this returns.
    pub fn stop(&self) {
        self.desk.end_sync(self.generation);
        self.cancel.cancel();
    }

    /// Whether `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Generation this loop applies with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loop counters.
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Stop the loop and wait for the task to exit.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            error!(error = %e, "Sync task panicked");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
