//! HTTP API for the trade desk daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Slot status
//! - Ingest (`POST /api/ui/push`, bearer token)
//! - Pull (`GET /api/ui/push`)
//! - Order submission (`POST /api/order`)
//! - Desk view, edit and submission (`/desk`)

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use tradedesk_domain::{DomainError, FieldIssue, Side, TradeField, TradeParameterSet};
use tradedesk_engine::{Readiness, RiskMetrics, SideAssessment};
use tradedesk_exec::{ExecutionPort, OrderRequest};
use tradedesk_store::{SlotStatus, StoreError, TradeSlotStore};

use crate::desk::{Desk, DeskView};
use crate::error::DaemonError;

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState<E: ExecutionPort + 'static, S: TradeSlotStore + 'static> {
    pub store: Arc<S>,
    pub execution: Arc<E>,
    /// `None` rejects every ingest
    pub ingest_token: Option<Zeroizing<String>>,
    /// Local proposal behind `/desk`
    pub desk: Arc<Desk>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(error: &str) -> Json<Self> {
        Json(Self {
            error: error.to_string(),
        })
    }
}

/// Desk proposal with its validation, metrics and readiness.
#[derive(Debug, Serialize)]
pub struct DeskResponse {
    pub trade: TradeParameterSet,
    pub errors: Vec<FieldIssue>,
    pub long: SideResponse,
    pub short: SideResponse,
}

/// One side of [`DeskResponse`].
#[derive(Debug, Serialize)]
pub struct SideResponse {
    /// Raw metrics; unknown values serialize as `null`
    pub metrics: RiskMetrics,
    pub profit: String,
    pub loss: String,
    pub risk_reward: String,
    pub readiness: Readiness,
}

impl From<&SideAssessment> for SideResponse {
    fn from(side: &SideAssessment) -> Self {
        Self {
            metrics: side.metrics,
            profit: RiskMetrics::format_rate(side.metrics.profit_rate),
            loss: RiskMetrics::format_rate(side.metrics.loss_rate),
            risk_reward: side.metrics.format_ratio(),
            readiness: side.readiness.clone(),
        }
    }
}

impl From<DeskView> for DeskResponse {
    fn from(view: DeskView) -> Self {
        Self {
            errors: view.assessment.validation.issues(),
            long: SideResponse::from(&view.assessment.long),
            short: SideResponse::from(&view.assessment.short),
            trade: view.trade,
        }
    }
}

/// Single-field desk edit.
#[derive(Debug, Deserialize)]
pub struct DeskEditRequest {
    pub field: String,
    pub value: String,
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router<E, S>(state: Arc<ApiState<E, S>>) -> Router
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/api/ui/push", get(pull_handler).post(ingest_handler))
        .route("/api/order", post(order_handler))
        .route("/desk", get(desk_handler))
        .route("/desk/edit", post(desk_edit_handler))
        .route("/desk/order/:side", post(desk_order_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Slot metadata.
async fn status_handler<E, S>(State(state): State<Arc<ApiState<E, S>>>) -> Json<SlotStatus>
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    Json(state.store.status().await)
}

/// Latest trade, or `{}` if never populated.
async fn pull_handler<E, S>(State(state): State<Arc<ApiState<E, S>>>) -> Json<Value>
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    Json(state.store.pull_json().await)
}

/// Replace the slot. Authorization is checked before the body is looked at.
async fn ingest_handler<E, S>(
    State(state): State<Arc<ApiState<E, S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    if !is_authorized(&headers, state.ingest_token.as_ref()) {
        warn!("Unauthorized ingest attempt");
        return (StatusCode::UNAUTHORIZED, ErrorResponse::new("Unauthorized")).into_response();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Ingest body is not JSON");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "ok": false }))).into_response();
        }
    };

    match state.store.ingest(&payload).await {
        Ok(receipt) => {
            info!(revision = receipt.revision, "Ingest accepted");
            Json(json!({ "ok": true })).into_response()
        }
        Err(StoreError::Rejected(e)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": e.issues() })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Ingest failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "ok": false }))).into_response()
        }
    }
}

/// Submit an order through the execution port and echo the endpoint reply.
async fn order_handler<E, S>(
    State(state): State<Arc<ApiState<E, S>>>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)>
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    let request: OrderRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Unreadable order body");
        server_error()
    })?;

    info!(side = %request.side, symbol = %request.symbol, "Order received");

    let ack = state.execution.submit(&request).await.map_err(|e| {
        error!(error = %e, side = %request.side, "Order execution failed");
        server_error()
    })?;

    Ok(Json(ack.body))
}

/// Current desk proposal and its assessment.
async fn desk_handler<E, S>(State(state): State<Arc<ApiState<E, S>>>) -> Json<DeskResponse>
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    Json(state.desk.view().into())
}

/// Overwrite one desk field and return the recomputed view.
async fn desk_edit_handler<E, S>(
    State(state): State<Arc<ApiState<E, S>>>,
    Json(edit): Json<DeskEditRequest>,
) -> Result<Json<DeskResponse>, (StatusCode, Json<ErrorResponse>)>
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    let field = edit.field.parse::<TradeField>().map_err(bad_request)?;

    state.desk.edit(field, edit.value);
    Ok(Json(state.desk.view().into()))
}

/// Submit one side of the desk proposal. The order is sent in the
/// background; 202 only means the gate let it through.
async fn desk_order_handler<E, S>(
    State(state): State<Arc<ApiState<E, S>>>,
    Path(side): Path<String>,
) -> Response
where
    E: ExecutionPort + 'static,
    S: TradeSlotStore + 'static,
{
    let side = match side.parse::<Side>() {
        Ok(side) => side,
        Err(e) => return bad_request(e).into_response(),
    };

    match state.desk.place_order(side) {
        Ok(_submission) => {
            info!(%side, "Desk order accepted");
            (StatusCode::ACCEPTED, Json(json!({ "ok": true, "side": side }))).into_response()
        }
        Err(DaemonError::NotReady { side, missing, invalid }) => {
            warn!(%side, ?missing, ?invalid, "Desk order refused");
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "ok": false,
                    "error": format!("{side} side is not ready"),
                    "missing": missing,
                    "invalid": invalid,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, %side, "Desk order failed");
            server_error().into_response()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn server_error() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new("Server error"))
}

fn bad_request(e: DomainError) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, ErrorResponse::new(&e.to_string()))
}

/// `Authorization: Bearer <token>` must match the configured token exactly.
fn is_authorized(headers: &HeaderMap, token: Option<&Zeroizing<String>>) -> bool {
    let Some(expected) = token else {
        return false;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|presented| token_eq(presented.as_bytes(), expected.as_bytes()))
}

/// Compare without short-circuiting on the first differing byte.
fn token_eq(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

// =============================================================================
// Tests
// =============================================================================
