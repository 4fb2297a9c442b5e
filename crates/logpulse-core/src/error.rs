//! Error types for LogPulse

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using LogPulse's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for LogPulse operations
#[derive(Error, Debug)]
pub enum Error {
    /// The request log could not be read at all
    #[error("Log source unavailable at {}: {source}", path.display())]
    SourceUnavailable {
        /// Configured log location
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Reading the request log did not finish within the configured bound
    #[error("Timed out after {} reading log source {}", humantime::format_duration(*timeout), path.display())]
    SourceTimeout {
        /// Configured log location
        path: PathBuf,
        /// Bound that was exceeded
        timeout: Duration,
    },

    /// Caller-supplied parameters are out of contract
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a source-unavailable error
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::SourceTimeout { .. } => "source_timeout",
            Self::Validation(_) => "validation_error",
            Self::Config(_) => "config_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_messages() {
        let missing = Error::source_unavailable(
            "api_logs.log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(missing.kind(), "source_unavailable");
        assert_eq!(missing.to_string(), "Log source unavailable at api_logs.log: gone");

        let timeout = Error::SourceTimeout {
            path: PathBuf::from("api_logs.log"),
            timeout: Duration::from_millis(300),
        };
        assert_eq!(timeout.kind(), "source_timeout");
        assert_eq!(timeout.to_string(), "Timed out after 300ms reading log source api_logs.log");

        assert_eq!(Error::validation("limit").kind(), "validation_error");
        assert_eq!(Error::config("port").kind(), "config_error");
        assert_eq!(Error::Internal("bind".into()).kind(), "internal_error");
    }
}
