//! Integration tests: desk sync against a live daemon and a gated source.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tradedesk_connectors::DeskRestClient;
use tradedesk_domain::{Side, TradeField, TradeParameterSet};
use tradedesk_exec::{EchoExecution, OrderSubmitter};
use tradedesk_store::{StoreError, TradeSource};
use tradedeskd::{Config, Daemon, Desk, SyncLoop};

fn trade(symbol: &str) -> TradeParameterSet {
    TradeParameterSet::new(symbol)
        .with_side(Side::Long, "100", "110", "95", "1")
        .with_side(Side::Short, "100", "90", "105", "1")
}

/// Poll `check` until it holds or two seconds pass.
async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_desk_follows_ingest_over_http() {
    let daemon = Daemon::new_stub(Config::test());
    let addr = daemon.start_api_server().await.unwrap();
    let (desk, sync) = daemon.start_desk(addr).unwrap();

    // Empty slot: local edits survive
    desk.edit(TradeField::Symbol, "LOCAL");
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(desk.trade().symbol, "LOCAL");
    assert!(sync.stats().empty() >= 1);

    let upstream = DeskRestClient::new(format!("http://{}", addr)).with_ingest_token("test-token");
    upstream.ingest(&trade("BTCUSDT")).await.unwrap();
    assert!(eventually(|| desk.trade() == trade("BTCUSDT")).await);

    upstream.ingest(&trade("ETHUSDT")).await.unwrap();
    assert!(eventually(|| desk.trade().symbol == "ETHUSDT").await);

    let view = desk.view();
    assert!(view.assessment.is_ready(Side::Long));
    assert_eq!(view.assessment.short.metrics.format_ratio(), "2.00");

    sync.shutdown().await;
}

/// Source whose pull blocks until released.
struct GatedSource {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl TradeSource for GatedSource {
    async fn fetch_latest(&self) -> Result<Option<TradeParameterSet>, StoreError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(Some(trade("LATE")))
    }
}

#[tokio::test]
async fn test_stop_during_in_flight_pull_leaves_desk_untouched() {
    let source = Arc::new(GatedSource {
        started: Notify::new(),
        release: Notify::new(),
    });
    let desk = Arc::new(Desk::new(OrderSubmitter::new(Arc::new(EchoExecution::new()))));
    desk.edit(TradeField::Symbol, "LOCAL");

    let sync = SyncLoop::spawn(source.clone(), desk.clone(), Duration::from_secs(60));
    source.started.notified().await;

    // Pull is in flight; stop, then let it complete
    sync.stop();
    source.release.notify_one();
    sync.shutdown().await;

    assert_eq!(desk.trade().symbol, "LOCAL");
}

#[tokio::test]
async fn test_ready_side_submits_through_echo() {
    let echo = Arc::new(EchoExecution::new());
    let desk = Desk::with_trade(trade("BTCUSDT"), OrderSubmitter::new(echo.clone()));

    desk.place_order(Side::Short).unwrap().await.unwrap();
    desk.edit(TradeField::LongVolume, "");
    assert!(desk.place_order(Side::Long).is_err());

    let sent = echo.submitted();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].side, Side::Short);
    assert_eq!(sent[0].sl, "105");
}
