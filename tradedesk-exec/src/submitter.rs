//! Fire-and-forget order submission.
//!
//! The desk never waits on the endpoint: each submission runs as its own
//! task, the outcome is logged and nothing is retried.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::order::OrderRequest;
use crate::ports::ExecutionPort;

/// Dispatches orders onto the runtime.
#[derive(Clone)]
pub struct OrderSubmitter {
    port: Arc<dyn ExecutionPort>,
}

impl OrderSubmitter {
    /// Create a submitter over an execution port.
    pub fn new(port: Arc<dyn ExecutionPort>) -> Self {
        Self { port }
    }

    /// Spawn the submission and return immediately.
    ///
    /// The handle is only useful to tests; dropping it does not cancel the
    /// submission. Must be called from within a tokio runtime.
    pub fn submit(&self, request: OrderRequest) -> JoinHandle<()> {
        let port = Arc::clone(&self.port);
        // Correlates the dispatch and outcome log lines; never sent
        let submission_id = Uuid::now_v7();

        info!(
            %submission_id,
            side = %request.side,
            symbol = %request.symbol,
            "Submitting order"
        );

        tokio::spawn(async move {
            match port.submit(&request).await {
                Ok(ack) => info!(
                    %submission_id,
                    side = %request.side,
                    received_at = %ack.received_at,
                    "Order acknowledged"
                ),
                Err(e) => error!(
                    %submission_id,
                    side = %request.side,
                    error = %e,
                    "Order submission failed"
                ),
            }
        })
    }
}
