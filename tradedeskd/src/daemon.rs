//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together:
//! - Trade slot (shared latest trade)
//! - API Server (ingest, pull, order, health, desk)
//! - Desk + Sync Loop (local proposal kept in step with a slot over HTTP)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Bind and start the API server
//! 3. Start the desk and its sync loop (if enabled)
//! 4. Wait for SIGINT
//! 5. Stop the sync loop

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use tradedesk_connectors::DeskRestClient;
use tradedesk_exec::{EchoExecution, ExecutionPort, OrderSubmitter};
use tradedesk_store::{MemoryTradeSlot, TradeSlotStore, TradeSource};

use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::desk::Desk;
use crate::error::{DaemonError, DaemonResult};
use crate::sync::{SyncHandle, SyncLoop};

// =============================================================================
// Daemon
// =============================================================================

/// The trade desk daemon.
pub struct Daemon<E: ExecutionPort + 'static, S: TradeSlotStore + 'static> {
    /// Configuration
    config: Config,
    /// Shared trade slot served by the API
    store: Arc<S>,
    /// Execution endpoint behind `POST /api/order`
    execution: Arc<E>,
    /// Local proposal served under `/desk`
    desk: Arc<Desk>,
}

impl Daemon<EchoExecution, MemoryTradeSlot> {
    /// Create a new daemon with in-memory slot and echo execution.
    pub fn new_stub(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(MemoryTradeSlot::new()),
            Arc::new(EchoExecution::new()),
        )
    }
}

impl<E: ExecutionPort + 'static, S: TradeSlotStore + 'static> Daemon<E, S> {
    /// Create a new daemon with provided components.
    ///
    /// Desk orders go to `TRADEDESK_ORDER_URL` when set and to `execution`
    /// otherwise.
    pub fn new(config: Config, store: Arc<S>, execution: Arc<E>) -> Self {
        let port: Arc<dyn ExecutionPort> = match &config.client.order_url {
            Some(url) => Arc::new(DeskRestClient::new(url.clone()).with_timeout(config.client.request_timeout)),
            None => Arc::clone(&execution) as Arc<dyn ExecutionPort>,
        };
        let desk = Arc::new(Desk::new(OrderSubmitter::new(port)));

        Self {
            config,
            store,
            execution,
            desk,
        }
    }

    /// Shared trade slot.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Local desk.
    pub fn desk(&self) -> &Arc<Desk> {
        &self.desk
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            ingest_enabled = self.config.ingest.token.is_some(),
            "Starting trade desk daemon"
        );

        let api_addr = self.start_api_server().await?;
        info!(%api_addr, "API server started");

        let sync = if self.config.sync.enabled {
            Some(self.start_desk(api_addr)?.1)
        } else {
            info!("Desk sync disabled");
            None
        };

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");

        if let Some(sync) = sync {
            sync.shutdown().await;
        }
        let view = self.desk.view();
        info!(
            symbol = %view.trade.symbol,
            long_ready = view.assessment.long.readiness.ready,
            short_ready = view.assessment.short.readiness.ready,
            "Desk closed"
        );

        info!("Daemon shutdown complete");
        Ok(())
    }

    /// Bind and start the API server.
    pub async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let state = Arc::new(ApiState {
            store: Arc::clone(&self.store),
            execution: Arc::clone(&self.execution),
            ingest_token: self.config.ingest.token.clone(),
            desk: Arc::clone(&self.desk),
        });

        let router = create_router(state);
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr).await.map_err(|e| DaemonError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        let local_addr = listener.local_addr().map_err(|e| DaemonError::Bind {
            addr,
            reason: e.to_string(),
        })?;

        // Spawn the server task
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }

    /// Start syncing the desk.
    ///
    /// Pulls from `TRADEDESK_SYNC_URL`, or from this daemon's own API at
    /// `api_addr`.
    pub fn start_desk(&self, api_addr: SocketAddr) -> DaemonResult<(Arc<Desk>, SyncHandle)> {
        let timeout = self.config.client.request_timeout;

        let sync_url = self
            .config
            .sync
            .url
            .clone()
            .unwrap_or_else(|| local_url(api_addr));
        if !sync_url.starts_with("http://") && !sync_url.starts_with("https://") {
            return Err(DaemonError::Config(format!("Invalid TRADEDESK_SYNC_URL: {}", sync_url)));
        }
        let source: Arc<dyn TradeSource> = Arc::new(DeskRestClient::new(sync_url.clone()).with_timeout(timeout));

        let desk = Arc::clone(&self.desk);
        let sync = SyncLoop::spawn(source, Arc::clone(&desk), self.config.sync.interval);

        info!(%sync_url, generation = sync.generation(), "Desk started");
        Ok((desk, sync))
    }
}

/// Loopback URL for a bound address; wildcard binds are reached via 127.0.0.1.
fn local_url(addr: SocketAddr) -> String {
    let host = if addr.ip().is_unspecified() {
        "127.0.0.1".to_string()
    } else {
        addr.ip().to_string()
    };
    let host = if addr.is_ipv6() && !addr.ip().is_unspecified() {
        format!("[{}]", host)
    } else {
        host
    };
    format!("http://{}:{}", host, addr.port())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_url() {
        assert_eq!(local_url("0.0.0.0:8080".parse().unwrap()), "http://127.0.0.1:8080");
        assert_eq!(local_url("10.0.0.5:9000".parse().unwrap()), "http://10.0.0.5:9000");
        assert_eq!(local_url("[::1]:8080".parse().unwrap()), "http://[::1]:8080");
    }

    #[tokio::test]
    async fn test_api_server_binds_ephemeral_port() {
        let daemon = Daemon::new_stub(Config::test());
        let addr = daemon.start_api_server().await.unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bad_sync_url_is_config_error() {
        let mut config = Config::test();
        config.sync.url = Some("ftp://desk".to_string());
        let daemon = Daemon::new_stub(config);

        let err = daemon.start_desk("127.0.0.1:1".parse().unwrap()).err().expect("expected config error");
        assert!(matches!(err, DaemonError::Config(_)));
    }
}
