//! Integration tests: the real router over a bound listener.
//!
//! Flow:
//! 1. Bind the daemon API on an ephemeral port
//! 2. Drive ingest / pull / order with reqwest
//! 3. Check status codes, bodies and slot metadata

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tradedesk_store::{MemoryTradeSlot, TradeSlotStore};
use tradedeskd::{Config, Daemon};

const TOKEN: &str = "test-token";

struct Harness {
    base: String,
    http: reqwest::Client,
    store: Arc<MemoryTradeSlot>,
}

impl Harness {
    async fn start(config: Config) -> Self {
        let daemon = Daemon::new_stub(config);
        let addr = daemon.start_api_server().await.unwrap();
        Self {
            base: format!("http://{}", addr),
            http: reqwest::Client::new(),
            store: daemon.store().clone(),
        }
    }

    async fn ingest(&self, body: &Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.http.post(format!("{}/api/ui/push", self.base)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> Value {
        let response = self.http.get(format!("{}{}", self.base, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

fn trade_a() -> Value {
    json!({
        "symbol": "BTCUSDT",
        "long_entry": "100", "long_tp": "110", "long_sl": "95", "long_volume": "1",
        "short_entry": "100", "short_tp": "90", "short_sl": "105", "short_volume": "1"
    })
}

fn trade_b() -> Value {
    json!({
        "symbol": "ETHUSDT",
        "long_entry": "", "long_tp": "", "long_sl": "", "long_volume": "",
        "short_entry": "3500", "short_tp": "3300", "short_sl": "3600", "short_volume": "5"
    })
}

#[tokio::test]
async fn test_push_pull_roundtrip_and_last_write_wins() {
    let h = Harness::start(Config::test()).await;

    assert_eq!(h.get("/api/ui/push").await, json!({}));

    let (status, body) = h.ingest(&trade_a(), Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(h.get("/api/ui/push").await, trade_a());

    // Idempotent pull
    assert_eq!(h.get("/api/ui/push").await, h.get("/api/ui/push").await);

    let (status, _) = h.ingest(&trade_b(), Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.get("/api/ui/push").await, trade_b());

    let status = h.get("/status").await;
    assert_eq!(status["populated"], true);
    assert_eq!(status["revision"], 2);
    assert!(status["updated_at"].is_string());
}

#[tokio::test]
async fn test_unauthorized_ingest_leaves_slot_empty() {
    let h = Harness::start(Config::test()).await;

    let (status, body) = h.ingest(&trade_a(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));

    let (status, _) = h.ingest(&trade_a(), Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(!h.store.status().await.populated);
    assert_eq!(h.get("/api/ui/push").await, json!({}));
}

#[tokio::test]
async fn test_ingest_disabled_without_token() {
    let mut config = Config::test();
    config.ingest.token = None;
    let h = Harness::start(config).await;

    let (status, _) = h.ingest(&trade_a(), Some(TOKEN)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_ingest_keeps_previous_trade() {
    let h = Harness::start(Config::test()).await;
    h.ingest(&trade_a(), Some(TOKEN)).await;

    let mut bad = trade_b();
    bad["short_entry"] = json!("abc");
    let (status, body) = h.ingest(&bad, Some(TOKEN)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    let fields: Vec<&str> = body["error"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["short_entry"]);

    assert_eq!(h.get("/api/ui/push").await, trade_a());
}

#[tokio::test]
async fn test_missing_fields_are_reported() {
    let h = Harness::start(Config::test()).await;
    let (status, body) = h.ingest(&json!({"symbol": "BTCUSDT"}), Some(TOKEN)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_legacy_volume_is_migrated() {
    let h = Harness::start(Config::test()).await;
    let legacy = json!({
        "symbol": "BTCUSDT",
        "long_entry": "100", "long_tp": "110", "long_sl": "95",
        "short_entry": "100", "short_tp": "90", "short_sl": "105",
        "volume": "0.5"
    });

    let (status, _) = h.ingest(&legacy, Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);

    let pulled = h.get("/api/ui/push").await;
    assert_eq!(pulled["long_volume"], "0.5");
    assert_eq!(pulled["short_volume"], "0.5");
    assert!(pulled.get("volume").is_none());
}

#[tokio::test]
async fn test_order_is_echoed() {
    let h = Harness::start(Config::test()).await;
    let order = json!({
        "side": "long", "symbol": "BTCUSDT",
        "entry": "100", "tp": "110", "sl": "95", "volume": "1"
    });

    let response = h
        .http
        .post(format!("{}/api/order", h.base))
        .json(&order)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), order);
}

#[tokio::test]
async fn test_health() {
    let h = Harness::start(Config::test()).await;
    let body = h.get("/health").await;
    assert_eq!(body["status"], "healthy");
}
