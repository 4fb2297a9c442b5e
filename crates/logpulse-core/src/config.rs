//! Configuration management for LogPulse
//!
//! Values are layered: built-in defaults, then an optional config file, then
//! `LOGPULSE__<SECTION>__<KEY>` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "LOGPULSE";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Request log source
    pub source: SourceConfig,

    /// Entries query bounds
    pub query: QueryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Self-monitoring
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.query.max_limit == 0 {
            return Err(Error::config("query.max_limit must be at least 1"));
        }
        if self.query.default_limit == 0 || self.query.default_limit > self.query.max_limit {
            return Err(Error::config(format!(
                "query.default_limit must be between 1 and {}",
                self.query.max_limit
            )));
        }
        if self.source.read_timeout.is_zero() {
            return Err(Error::config("source.read_timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8000,
        }
    }
}

/// Request log location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path of the request log
    pub path: PathBuf,
    /// Upper bound on a single full read
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("api_logs.log"),
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// Bounds for the entries query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Limit used when a caller gives none
    pub default_limit: usize,
    /// Largest accepted limit
    pub max_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 1000,
            max_limit: 10_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Self-monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Serve Prometheus metrics at `/metrics`
    pub prometheus: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { prometheus: true }
    }
}
