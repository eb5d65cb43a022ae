//! # Employee REST API
//!
//! HTTP endpoints for CRUD over the employee collection. Each request
//! performs exactly one storage operation.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::{CollectionEmployeeHandler, EmployeeHandler, DELETE_CONFIRMATION};
pub use parser::{parse_employee, parse_id};
pub use server::RestServer;
