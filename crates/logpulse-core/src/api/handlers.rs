//! API handlers for the HTTP REST API

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::warn;

use crate::error::Error;
use crate::models::{EntriesPage, EntriesParams, OverviewSnapshot};
use crate::service::MetricsService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Read operations over the request log
    pub service: MetricsService,
    /// Renders `/metrics`; `None` when self-monitoring is disabled
    pub prometheus: Option<PrometheusHandle>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Aggregate metrics over the whole request log
pub async fn get_overview(State(state): State<AppState>) -> Result<Json<OverviewSnapshot>, Error> {
    Ok(Json(state.service.overview().await?))
}

/// Most recent request log entries matching the query string
pub async fn get_entries(
    State(state): State<AppState>,
    query: Result<Query<EntriesParams>, QueryRejection>,
) -> Result<Json<EntriesPage>, Error> {
    let Query(params) = query.map_err(|e| Error::validation(e.body_text()))?;
    Ok(Json(state.service.entries(&params).await?))
}

/// Prometheus exposition of the service's own counters
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Error body returned for every failed request
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, see [`Error::kind`]
    pub error: &'static str,
    /// Human-readable description
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::SourceTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
