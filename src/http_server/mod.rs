//! # HTTP Server Module
//!
//! Assembles the employee API into a single Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Request counters
//! - `/employee`, `/employee/:id` - Employee CRUD

pub mod config;
mod middleware;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
