//! # REST API Router
//!
//! Axum routes for the employee resource.
//!
//! - `GET    /employee`
//! - `POST   /employee`
//! - `PUT    /employee/:id`
//! - `DELETE /employee/:id`

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::employee::Employee;
use crate::observability::MetricsRegistry;

use super::errors::RestError;
use super::handler::EmployeeHandler;
use super::parser::{parse_employee, parse_id};

/// REST API server state
pub struct RestServer<H: EmployeeHandler> {
    handler: Arc<H>,
    metrics: Arc<MetricsRegistry>,
}

impl<H: EmployeeHandler + 'static> RestServer<H> {
    pub fn new(handler: H, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            handler: Arc::new(handler),
            metrics,
        }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route(
                "/employee",
                get(list_handler::<H>).post(create_handler::<H>),
            )
            .route(
                "/employee/:id",
                put(update_handler::<H>).delete(delete_handler::<H>),
            )
            .with_state(state)
    }
}

/// Shared state type
type ServerState<H> = Arc<RestServer<H>>;

/// List employees handler
async fn list_handler<H: EmployeeHandler + 'static>(
    State(server): State<ServerState<H>>,
) -> Result<Json<Vec<Employee>>, RestError> {
    let employees = server.handler.list()?;
    Ok(Json(employees))
}

/// Create employee handler
async fn create_handler<H: EmployeeHandler + 'static>(
    State(server): State<ServerState<H>>,
    body: Bytes,
) -> Result<Json<Employee>, RestError> {
    let employee = parse_employee(&body)?;

    let created = server.handler.create(employee)?;
    server.metrics.increment_created();
    Ok(Json(created))
}

/// Update employee handler
async fn update_handler<H: EmployeeHandler + 'static>(
    State(server): State<ServerState<H>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Employee>, RestError> {
    let id = parse_id(&id)?;
    let employee = parse_employee(&body)?;

    let updated = server.handler.update(&id, employee)?;
    server.metrics.increment_updated();
    Ok(Json(updated))
}

/// Delete employee handler
async fn delete_handler<H: EmployeeHandler + 'static>(
    State(server): State<ServerState<H>>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, RestError> {
    let id = parse_id(&id)?;

    let confirmation = server.handler.delete(&id)?;
    server.metrics.increment_deleted();
    Ok(Json(confirmation))
}
