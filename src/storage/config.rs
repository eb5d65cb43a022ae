//! Storage configuration
//!
//! Selects the backend and names the database and collection the
//! employee endpoints operate on.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where documents live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Checksummed append-only log under `data_dir`
    #[default]
    File,
    /// Volatile, lost on exit
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind (default: "file")
    #[serde(default)]
    pub backend: Backend,

    /// Root directory for file-backed databases (default: "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Database name (default: "fiber-hrms")
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding employee documents (default: "employees")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Connection-establishment timeout in seconds (default: 20)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_database() -> String {
    "fiber-hrms".to_string()
}

fn default_collection() -> String {
    "employees".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    20
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: default_data_dir(),
            database: default_database(),
            collection: default_collection(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl StorageConfig {
    /// Volatile configuration with default names
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory,
            ..Default::default()
        }
    }

    /// File-backed configuration rooted at `data_dir`
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File,
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
