//! Request logging middleware
//!
//! Emits one `HTTP_REQUEST` line per request and feeds the counters.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::observability::{Logger, MetricsRegistry, Severity};

pub async fn log_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    metrics.record_response(status.as_u16());

    let severity = if status.is_server_error() {
        Severity::Error
    } else if status.is_client_error() {
        Severity::Warn
    } else {
        Severity::Info
    };
    let duration_ms = started.elapsed().as_millis().to_string();
    Logger::log(
        severity,
        "HTTP_REQUEST",
        &[
            ("duration_ms", &duration_ms),
            ("method", method.as_str()),
            ("path", &path),
            ("status", status.as_str()),
        ],
    );

    response
}
