//! CLI command implementations
//!
//! `serve` startup sequence (strict order):
//! 1. Configuration load and overrides
//! 2. Storage connection under the connect timeout
//! 3. HTTP activation
//!
//! Any failure before step 3 completes halts startup.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::observability::Logger;
use crate::storage::{Backend, Database};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Overrides accepted by `serve`
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub config: Option<PathBuf>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub in_memory: bool,
}

impl ServeOptions {
    /// Load the configuration file (or defaults) and apply overrides
    pub fn resolve(&self) -> CliResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.backend = Backend::File;
            config.storage.data_dir = data_dir.clone();
        }
        if self.in_memory {
            config.storage.backend = Backend::Memory;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve {
            config,
            port,
            data_dir,
            in_memory,
        } => serve(ServeOptions {
            config,
            port,
            data_dir,
            in_memory,
        }),
    }
}

/// Write a default configuration file. Refuses to overwrite.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::io_error(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let content = Config::default().to_json_pretty()?;
    fs::write(config_path, content).map_err(|e| {
        CliError::io_error(format!("Failed to write {}: {}", config_path.display(), e))
    })?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string(),
    }))
}

/// Connect storage and serve HTTP until Ctrl-C
pub fn serve(options: ServeOptions) -> CliResult<()> {
    let config = options.resolve()?;
    Logger::set_min_severity(config.log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    runtime.block_on(run_server(config))
}

async fn run_server(config: Config) -> CliResult<()> {
    let db = Database::connect(&config.storage).await.map_err(|e| {
        CliError::boot_failed(format!("Storage connection failed [{}]: {}", e.code(), e))
    })?;

    let documents = db
        .document_count(&config.storage.collection)
        .map_err(|e| CliError::boot_failed(e.to_string()))?;
    Logger::info(
        "STORAGE_CONNECTED",
        &[
            ("collection", &config.storage.collection),
            ("database", db.name()),
            ("documents", &documents.to_string()),
            ("durable", &db.is_durable().to_string()),
        ],
    );

    let server = HttpServer::for_database(config.server.clone(), &db, &config.storage.collection);
    server
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

fn write_response(data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)
        .map_err(|e| CliError::io_error(format!("JSON error: {}", e)))?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_defaults() {
        let config = ServeOptions::default().resolve().unwrap();
        assert_eq!(config.server.port, 3456);
        assert_eq!(config.storage.backend, Backend::File);
    }

    #[test]
    fn test_resolve_overrides() {
        let options = ServeOptions {
            port: Some(9000),
            in_memory: true,
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, Backend::Memory);
    }

    #[test]
    fn test_resolve_data_dir_forces_file_backend() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hrms.json");
        fs::write(&path, r#"{"storage": {"backend": "memory"}}"#).unwrap();

        let options = ServeOptions {
            config: Some(path),
            data_dir: Some(temp_dir.path().join("data")),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.storage.backend, Backend::File);
        assert_eq!(config.storage.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_resolve_missing_config_file() {
        let options = ServeOptions {
            config: Some(PathBuf::from("/nonexistent/hrms.json")),
            ..Default::default()
        };
        let err = options.resolve().unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_init_writes_loadable_config_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("hrms.json");

        init(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.database, "fiber-hrms");

        let err = init(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[tokio::test]
    async fn test_run_server_fails_when_storage_cannot_open() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fiber-hrms"), b"").unwrap();

        let options = ServeOptions {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = run_server(options.resolve().unwrap()).await.unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::BootFailed);
        assert!(err.message().contains("HRMS_STORAGE_IO_ERROR"));
    }
}
