//! Desk server REST client
//!
//! Talks to the desk HTTP API of another process:
//! - `GET /api/ui/push` pulls the latest trade (`{}` when never populated)
//! - `POST /api/ui/push` ingests a trade with a bearer token
//! - `POST /api/order` submits an order
//!
//! Implements [`TradeSource`] so a sync loop can poll a remote slot, and
//! [`ExecutionPort`] so a desk can submit through a remote endpoint.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;
use zeroize::Zeroizing;

use tradedesk_domain::{FieldIssue, TradeParameterSet};
use tradedesk_exec::{ExecError, ExecutionPort, OrderAck, OrderRequest};
use tradedesk_store::{StoreError, TradeSource};

// =============================================================================
// Constants
// =============================================================================

/// Pull / ingest path
const PUSH_PATH: &str = "/api/ui/push";

/// Order submission path
const ORDER_PATH: &str = "/api/order";

/// Default request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur in the desk REST client.
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Ingest rejected by the server's payload validation
    #[error("Ingest rejected: {} field issue(s)", .0.len())]
    Rejected(Vec<FieldIssue>),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

impl From<ConnectorError> for StoreError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::ParseError(msg) => StoreError::Schema(msg),
            other => StoreError::unavailable(other.to_string()),
        }
    }
}

impl From<ConnectorError> for ExecError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::RequestFailed(msg) => ExecError::Transport(msg),
            ConnectorError::Status { status, body } => ExecError::Rejected {
                status,
                message: body,
            },
            ConnectorError::Rejected(issues) => ExecError::Rejected {
                status: StatusCode::BAD_REQUEST.as_u16(),
                message: format!("{} field issue(s)", issues.len()),
            },
            ConnectorError::ParseError(msg) => ExecError::InvalidResponse(msg),
            ConnectorError::Timeout => ExecError::Timeout("order endpoint".to_string()),
        }
    }
}

/// Body of a 400 ingest response.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    error: Vec<FieldIssue>,
}

// =============================================================================
// Desk REST Client
// =============================================================================

/// HTTP client for a remote desk server.
pub struct DeskRestClient {
    /// HTTP client
    client: Client,
    /// Server base URL without trailing slash
    base_url: String,
    /// Per-request timeout
    request_timeout: Duration,
    /// Bearer token for ingest, zeroed on drop
    ingest_token: Option<Zeroizing<String>>,
}

impl DeskRestClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            ingest_token: None,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Bearer token sent with `ingest`.
    pub fn with_ingest_token(mut self, token: impl Into<String>) -> Self {
        self.ingest_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, returning status and body text.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), ConnectorError> {
        let response = timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| ConnectorError::Timeout)?
            .map_err(|e| ConnectorError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = timeout(self.request_timeout, response.text())
            .await
            .map_err(|_| ConnectorError::Timeout)?
            .map_err(|e| ConnectorError::ParseError(e.to_string()))?;

        Ok((status, body))
    }

    /// Pull the latest trade. `Ok(None)` when the server slot was never populated.
    pub async fn pull(&self) -> Result<Option<TradeParameterSet>, ConnectorError> {
        let (status, body) = self.send(self.client.get(self.url(PUSH_PATH))).await?;
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| ConnectorError::ParseError(e.to_string()))?;
        if value.as_object().is_some_and(|map| map.is_empty()) {
            debug!(base_url = %self.base_url, "Remote slot is empty");
            return Ok(None);
        }

        TradeParameterSet::from_json(&value)
            .map(Some)
            .map_err(|e| ConnectorError::ParseError(e.to_string()))
    }

    /// Push `trade` into the remote slot.
    ///
    /// Without a configured token the request is still sent; the server
    /// answers 401.
    pub async fn ingest(&self, trade: &TradeParameterSet) -> Result<(), ConnectorError> {
        let mut request = self.client.post(self.url(PUSH_PATH)).json(trade);
        if let Some(token) = &self.ingest_token {
            request = request.bearer_auth(token.as_str());
        }

        let (status, body) = self.send(request).await?;
        if status == StatusCode::BAD_REQUEST {
            if let Ok(rejection) = serde_json::from_str::<RejectionBody>(&body) {
                return Err(ConnectorError::Rejected(rejection.error));
            }
        }
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Submit an order, returning the server's response body.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<Value, ConnectorError> {
        let (status, body) = self
            .send(self.client.post(self.url(ORDER_PATH)).json(order))
            .await?;
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ConnectorError::ParseError(e.to_string()))
    }
}

impl fmt::Debug for DeskRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskRestClient")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("ingest_token", &self.ingest_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl TradeSource for DeskRestClient {
    async fn fetch_latest(&self) -> Result<Option<TradeParameterSet>, StoreError> {
        Ok(self.pull().await?)
    }
}

#[async_trait]
impl ExecutionPort for DeskRestClient {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderAck, ExecError> {
        let body = self.submit_order(request).await?;
        Ok(OrderAck::new(body))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::Arc;
    use tradedesk_domain::Side;
    use tradedesk_store::{MemoryTradeSlot, TradeSlotStore};

    const TOKEN: &str = "secret";

    async fn fake_pull(State(slot): State<Arc<MemoryTradeSlot>>) -> Json<Value> {
        Json(slot.pull_json().await)
    }

    async fn fake_ingest(
        State(slot): State<Arc<MemoryTradeSlot>>,
        headers: HeaderMap,
        Json(payload): Json<Value>,
    ) -> axum::response::Response {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"));
        if !authorized {
            return (AxumStatus::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
        }
        match slot.ingest(&payload).await {
            Ok(_) => Json(json!({"ok": true})).into_response(),
            Err(e) => (
                AxumStatus::BAD_REQUEST,
                Json(json!({"ok": false, "error": e.issues()})),
            )
                .into_response(),
        }
    }

    async fn fake_order(Json(order): Json<Value>) -> Json<Value> {
        Json(order)
    }

    async fn slow_pull() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Json(json!({}))
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn desk_server() -> (String, Arc<MemoryTradeSlot>) {
        let slot = Arc::new(MemoryTradeSlot::new());
        let router = Router::new()
            .route(PUSH_PATH, get(fake_pull).post(fake_ingest))
            .route(ORDER_PATH, post(fake_order))
            .with_state(slot.clone());
        (spawn_server(router).await, slot)
    }

    fn trade() -> TradeParameterSet {
        TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "100", "110", "95", "1")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DeskRestClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(PUSH_PATH), "http://localhost:8080/api/ui/push");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = DeskRestClient::new("http://localhost:8080").with_ingest_token("hunter2");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_pull_empty_slot_is_none() {
        let (url, _slot) = desk_server().await;
        let client = DeskRestClient::new(url);
        assert!(client.pull().await.unwrap().is_none());
        assert!(client.fetch_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ingest_then_pull() {
        let (url, slot) = desk_server().await;
        let client = DeskRestClient::new(url).with_ingest_token(TOKEN);

        client.ingest(&trade()).await.unwrap();
        assert_eq!(slot.status().await.revision, 1);
        assert_eq!(client.pull().await.unwrap(), Some(trade()));
    }

    #[tokio::test]
    async fn test_ingest_without_token_is_unauthorized() {
        let (url, slot) = desk_server().await;
        let client = DeskRestClient::new(url);

        let err = client.ingest(&trade()).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Status { status: 401, .. }));
        assert!(!slot.status().await.populated);
    }

    #[tokio::test]
    async fn test_ingest_rejection_carries_field_issues() {
        let (url, _slot) = desk_server().await;
        let client = DeskRestClient::new(url).with_ingest_token(TOKEN);
        let bad = TradeParameterSet::new("BTCUSDT").with_side(Side::Long, "abc", "110", "95", "1");

        match client.ingest(&bad).await.unwrap_err() {
            ConnectorError::Rejected(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "long_entry");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_goes_through_execution_port() {
        let (url, _slot) = desk_server().await;
        let client = DeskRestClient::new(url);
        let order = OrderRequest::from_trade(Side::Long, &trade());

        let ack = ExecutionPort::submit(&client, &order).await.unwrap();
        assert_eq!(ack.body["side"], "long");
        assert_eq!(ack.body["entry"], "100");
    }

    #[tokio::test]
    async fn test_schema_mismatch_maps_to_store_schema_error() {
        let router = Router::new().route(PUSH_PATH, get(|| async { Json(json!({"symbol": 5})) }));
        let client = DeskRestClient::new(spawn_server(router).await);

        let err = client.fetch_latest().await.unwrap_err();
        assert!(matches!(err, StoreError::Schema(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_source_error() {
        let router = Router::new().route(
            PUSH_PATH,
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = DeskRestClient::new(spawn_server(router).await);

        let err = client.fetch_latest().await.unwrap_err();
        assert!(matches!(err, StoreError::Source(_)));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let router = Router::new().route(PUSH_PATH, get(slow_pull));
        let client = DeskRestClient::new(spawn_server(router).await).with_timeout(Duration::from_millis(100));

        assert!(matches!(client.pull().await, Err(ConnectorError::Timeout)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) is not listening on loopback in test environments
        let client = DeskRestClient::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        assert!(matches!(
            client.pull().await,
            Err(ConnectorError::RequestFailed(_)) | Err(ConnectorError::Timeout)
        ));
    }
}
