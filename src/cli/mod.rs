//! CLI module for hrms
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Connect storage and serve the employee API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, ServeOptions};
pub use errors::{CliError, CliErrorCode, CliResult};
