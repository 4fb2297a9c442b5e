//! Metrics service: one full read-compute cycle per call

use std::sync::Arc;

use tracing::debug;

use crate::config::QueryConfig;
use crate::engine::{select_entries, summarize};
use crate::error::Result;
use crate::models::{EntriesPage, EntriesParams, OverviewSnapshot};
use crate::source::EventSource;

/// Read operations over the request log.
///
/// Holds no state besides its collaborators, so any number of calls may run
/// concurrently. Every call re-reads the source; either the whole result is
/// returned or an error is, never a partial one.
#[derive(Clone)]
pub struct MetricsService {
    source: Arc<dyn EventSource>,
    limits: QueryConfig,
}

impl MetricsService {
    /// Create a service over `source`, validating entries queries against `limits`
    pub fn new(source: Arc<dyn EventSource>, limits: QueryConfig) -> Self {
        Self { source, limits }
    }

    /// Aggregate snapshot over every event in the log
    pub async fn overview(&self) -> Result<OverviewSnapshot> {
        let events = self.source.read_events().await?;
        let snapshot = summarize(&events);
        debug!(total = snapshot.total_requests, "Computed overview");
        Ok(snapshot)
    }

    /// Most recent events matching `params`.
    ///
    /// Parameters are validated before the log is touched.
    pub async fn entries(&self, params: &EntriesParams) -> Result<EntriesPage> {
        let filter = params.validate(&self.limits)?;
        let events = self.source.read_events().await?;
        let page = select_entries(&events, &filter);
        debug!(scanned = events.len(), returned = page.count, "Selected entries");
        Ok(page)
    }
}
