//! Trade Desk Daemon
//!
//! Runtime for the shared trade slot, its HTTP API and the local desk.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p tradedeskd
//!
//! # Start with custom environment
//! INGEST_TOKEN=secret TRADEDESK_API_PORT=8081 cargo run -p tradedeskd
//! ```
//!
//! # Environment Variables
//!
//! - `TRADEDESK_ENV`: Environment (test, development, production)
//! - `TRADEDESK_API_HOST`: API host (default: 0.0.0.0)
//! - `TRADEDESK_API_PORT`: API port (default: 8080)
//! - `INGEST_TOKEN`: Bearer token for ingest (unset: ingest disabled)
//! - `TRADEDESK_SYNC_ENABLED`: Run the desk sync loop (default: true)
//! - `TRADEDESK_SYNC_URL`: Desk server to pull from (default: own API)
//! - `TRADEDESK_SYNC_INTERVAL_SECS`: Pull interval (default: 5)
//! - `TRADEDESK_ORDER_URL`: Remote order endpoint (default: in-process echo)
//! - `TRADEDESK_REQUEST_TIMEOUT_SECS`: Outbound request timeout (default: 10)
//! - `TRADEDESK_LOG_FORMAT`: text or json (default: text)

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tradedeskd::{Config, Daemon, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; it decides the log format
    let config = Config::from_env()?;

    // Initialize tracing
    let (text, json) = match config.log_format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(text)
        .with(json)
        .with(
            EnvFilter::from_default_env()
                .add_directive("tradedesk=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        sync_enabled = config.sync.enabled,
        "Trade desk daemon"
    );

    // Create and run daemon
    let daemon = Daemon::new_stub(config);
    daemon.run().await?;

    Ok(())
}
