//! Health check handlers for service monitoring.
//!
//! The collector holds no connections and no state, so the probes report
//! process liveness only; sink reachability surfaces per-request instead.

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::server::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when the health check was performed
    pub timestamp: DateTime<Utc>,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is operational
    Healthy,
}

/// Primary health check endpoint.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    debug!("Performing health check");

    let response = HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: state.clock.now_utc(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Liveness check endpoint for orchestration probes.
///
/// Minimal check that the HTTP server is responding; no external
/// dependencies are touched.
#[instrument(name = "liveness_check", skip(state))]
pub async fn liveness_check(State(state): State<AppState>) -> Response {
    let response = serde_json::json!({
        "status": "alive",
        "timestamp": state.clock.now_utc(),
        "service": "logfunnel-api"
    });

    (StatusCode::OK, Json(response)).into_response()
}
