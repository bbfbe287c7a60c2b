//! In-process execution endpoint.
//!
//! Stands in for brokerage integration: every accepted order is answered
//! with the order itself.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::error::ExecError;
use crate::order::OrderRequest;
use crate::ports::{ExecutionPort, OrderAck};

/// Echo execution endpoint.
#[derive(Default)]
pub struct EchoExecution {
    /// Orders accepted so far, in submission order
    submitted: Mutex<Vec<OrderRequest>>,
    /// Whether to simulate a failure on the next submit
    fail_next: Mutex<bool>,
}

impl EchoExecution {
    /// Create a new echo endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the next submit to fail.
    pub fn set_fail_next(&self, fail: bool) {
        *lock(&self.fail_next) = fail;
    }

    /// Orders accepted so far.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        lock(&self.submitted).clone()
    }

    fn should_fail(&self) -> bool {
        std::mem::take(&mut *lock(&self.fail_next))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ExecutionPort for EchoExecution {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderAck, ExecError> {
        if self.should_fail() {
            return Err(ExecError::Transport("Simulated endpoint failure".to_string()));
        }

        let body = serde_json::to_value(request)
            .map_err(|e| ExecError::InvalidResponse(e.to_string()))?;
        lock(&self.submitted).push(request.clone());

        tracing::debug!(side = %request.side, symbol = %request.symbol, "Echo: order accepted");
        Ok(OrderAck::new(body))
    }
}
