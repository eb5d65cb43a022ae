//! # HTTP Server
//!
//! Combines the employee routes with health, metrics, CORS and request
//! logging, and serves them on a TCP listener.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{Logger, MetricsRegistry};
use crate::rest_api::{CollectionEmployeeHandler, EmployeeHandler, RestServer};
use crate::storage::Database;

use super::config::HttpServerConfig;
use super::middleware::log_requests;
use super::observability_routes::{observability_routes, ObservabilityState};

/// HTTP server for the employee API
pub struct HttpServer {
    config: HttpServerConfig,
    metrics: Arc<MetricsRegistry>,
    router: Router,
}

impl HttpServer {
    /// Serve `collection` of an open database
    pub fn for_database(config: HttpServerConfig, db: &Arc<Database>, collection: &str) -> Self {
        let handler = CollectionEmployeeHandler::new(db.collection(collection));
        Self::with_handler(config, handler, db.name())
    }

    /// Serve an arbitrary employee handler
    pub fn with_handler<H: EmployeeHandler + 'static>(
        config: HttpServerConfig,
        handler: H,
        database: &str,
    ) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let router = Self::build_router(&config, handler, database, Arc::clone(&metrics));
        Self {
            config,
            metrics,
            router,
        }
    }

    fn build_router<H: EmployeeHandler + 'static>(
        config: &HttpServerConfig,
        handler: H,
        database: &str,
        metrics: Arc<MetricsRegistry>,
    ) -> Router {
        let observability_state = Arc::new(ObservabilityState {
            database: database.to_string(),
            metrics: Arc::clone(&metrics),
        });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(observability_routes(observability_state))
            .merge(RestServer::new(handler, Arc::clone(&metrics)).router())
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn_with_state(metrics, log_requests))
                    .layer(cors),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Counters shared with the request middleware
    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.socket_addr()).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        Logger::info("SERVER_START", &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Logger::info("SERVER_STOPPED", &[("addr", &addr.to_string())]);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        Logger::warn("SIGNAL_HANDLER_FAILED", &[("message", &e.to_string())]);
        std::future::pending::<()>().await;
    }
}
