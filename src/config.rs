//! Process configuration
//!
//! Loaded from a JSON file. Every field has a default, so an empty object
//! (or no file at all) yields a working configuration.
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "server":  { "host": "0.0.0.0", "port": 3456, "cors_origins": [] },
//!   "storage": { "backend": "file", "data_dir": "./data", "database": "fiber-hrms",
//!                "collection": "employees", "connect_timeout_secs": 20 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::storage::{Backend, StorageConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: HttpServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database must not be empty".to_string(),
            ));
        }

        if self.storage.collection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.collection must not be empty".to_string(),
            ));
        }

        if self.storage.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "storage.connect_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.storage.backend == Backend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.data_dir is required for the file backend".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.log_level, Severity::Info);
        assert_eq!(config.server.port, 3456);
        assert_eq!(config.storage.database, "fiber-hrms");
        assert_eq!(config.storage.collection, "employees");
        assert_eq!(config.storage.connect_timeout_secs, 20);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_json(r#"{"storage": {"connect_timeout_secs": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let err = Config::from_json(r#"{"storage": {"collection": " "}}"#).unwrap_err();
        assert!(err.to_string().contains("collection"));
    }

    #[test]
    fn test_memory_backend_ignores_data_dir() {
        let config =
            Config::from_json(r#"{"storage": {"backend": "memory", "data_dir": ""}}"#).unwrap();
        assert_eq!(config.storage.backend, Backend::Memory);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(Config::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_round_trips_pretty_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hrms.json");

        let mut config = Config::default();
        config.server.port = 9000;
        config.log_level = Severity::Debug;
        fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.log_level, Severity::Debug);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/hrms.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
