//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroizing;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Ingest authorization
    pub ingest: IngestConfig,

    /// Desk sync loop configuration
    pub sync: SyncConfig,

    /// Outbound HTTP client configuration
    pub client: ClientConfig,

    /// Log output format
    pub log_format: LogFormat,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Ingest authorization.
#[derive(Clone, Default)]
pub struct IngestConfig {
    /// Bearer token expected on `POST /api/ui/push`; `None` rejects every ingest
    pub token: Option<Zeroizing<String>>,
}

/// Desk sync loop configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Start the desk and its sync loop with the daemon
    pub enabled: bool,
    /// Desk server to pull from; `None` means this daemon's own API
    pub url: Option<String>,
    /// Time between pulls
    pub interval: Duration,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote order endpoint; `None` submits to the in-process echo endpoint
    pub order_url: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> DaemonResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("TRADEDESK_ENV")
            .map(|v| v.parse::<Environment>())
            .transpose()?
            .unwrap_or(Environment::Development);

        let api = ApiConfig {
            host: lookup("TRADEDESK_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "TRADEDESK_API_PORT", 8080)?,
        };

        let ingest = IngestConfig {
            token: non_empty(lookup("INGEST_TOKEN")).map(Zeroizing::new),
        };

        let interval_secs: u64 =
            parse_var(&lookup, "TRADEDESK_SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(DaemonError::Config(
                "TRADEDESK_SYNC_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        let sync = SyncConfig {
            enabled: match lookup("TRADEDESK_SYNC_ENABLED") {
                Some(v) => parse_bool("TRADEDESK_SYNC_ENABLED", &v)?,
                None => true,
            },
            url: non_empty(lookup("TRADEDESK_SYNC_URL")),
            interval: Duration::from_secs(interval_secs),
        };

        let timeout_secs: u64 = parse_var(
            &lookup,
            "TRADEDESK_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let client = ClientConfig {
            order_url: non_empty(lookup("TRADEDESK_ORDER_URL")),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        let log_format = lookup("TRADEDESK_LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(LogFormat::Text);

        Ok(Self {
            api,
            ingest,
            sync,
            client,
            log_format,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            ingest: IngestConfig {
                token: Some(Zeroizing::new("test-token".to_string())),
            },
            sync: SyncConfig {
                enabled: true,
                url: None,
                interval: Duration::from_millis(50),
            },
            client: ClientConfig {
                order_url: None,
                request_timeout: Duration::from_secs(2),
            },
            log_format: LogFormat::Text,
            environment: Environment::Test,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> DaemonResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|_| DaemonError::Config(format!("Invalid {}: {}", key, val))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> DaemonResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(DaemonError::Config(format!("Invalid {}: {}", key, value))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            ingest: IngestConfig::default(),
            sync: SyncConfig {
                enabled: true,
                url: None,
                interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            },
            client: ClientConfig {
                order_url: None,
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            log_format: LogFormat::Text,
            environment: Environment::Development,
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FromStr for Environment {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid TRADEDESK_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DaemonError::Config(format!(
                "Invalid TRADEDESK_LOG_FORMAT: {}. Expected: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
