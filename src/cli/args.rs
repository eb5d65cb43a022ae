//! CLI argument definitions using clap
//!
//! Commands:
//! - hrms init [--config <path>]
//! - hrms serve [--config <path>] [--port <n>] [--data-dir <path>] [--in-memory]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hrms - employee records over HTTP
#[derive(Parser, Debug)]
#[command(name = "hrms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path of the configuration file to create
        #[arg(long, default_value = "./hrms.json")]
        config: PathBuf,
    },

    /// Connect storage and serve the employee API
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,

        /// Override storage.data_dir
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use the volatile in-memory backend
        #[arg(long, conflicts_with = "data_dir")]
        in_memory: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
