//! Observability HTTP Routes
//!
//! Health check and request counters.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::observability::MetricsRegistry;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// State for the observability routes
pub struct ObservabilityState {
    pub database: String,
    pub metrics: Arc<MetricsRegistry>,
}

/// Create `/health` and `/metrics`
pub fn observability_routes(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.database.clone(),
    };

    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            database: "fiber-hrms".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "fiber-hrms");
    }
}
