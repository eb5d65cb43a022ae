//! hrms - employee records over HTTP
//!
//! CRUD endpoints for a single employee resource, backed by an embedded
//! document store.

pub mod cli;
pub mod config;
pub mod employee;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod storage;
