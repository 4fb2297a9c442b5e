//! # LogPulse
//!
//! Request-log ingestion and metrics aggregation for HTTP APIs.
//!
//! LogPulse reads the access log written by an API's request-logging
//! middleware, turns each line into a structured event and serves two views
//! over it: an aggregate overview (volume, latency, error rate, busiest
//! endpoints) and a filtered tail of the raw entries.
//!
//! ## Architecture
//!
//! - **Parser**: one line of log text to one event, or nothing
//! - **Source**: re-reads the whole log on every call
//! - **Engine**: pure aggregation and selection over the event sequence
//! - **Service**: validate, read, compute, respond
//! - **API**: REST endpoints polled by dashboards
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve the metrics API over ./api_logs.log
//! logpulse serve --log-file api_logs.log
//!
//! # One-off overview in the terminal
//! logpulse overview --log-file api_logs.log
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod parser;
pub mod service;
pub mod source;
pub mod telemetry;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::service::MetricsService;
    pub use crate::source::{EventSource, LogFileSource};
}
