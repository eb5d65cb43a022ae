//! # Storage Errors
//!
//! Error codes:
//! - HRMS_STORAGE_IO_ERROR (ERROR severity)
//! - HRMS_STORAGE_CONNECT_TIMEOUT (ERROR severity)
//! - HRMS_STORAGE_INVALID_ID (ERROR severity)
//! - HRMS_STORAGE_ENCODING (ERROR severity)
//! - HRMS_STORAGE_MALFORMED_DOCUMENT (ERROR severity)
//! - HRMS_STORAGE_UNAVAILABLE (ERROR severity)
//! - HRMS_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// The store cannot be trusted; startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the document store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk I/O failure
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Checksum, length or framing failure in the document log
    #[error("data corruption at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// A string that is not a well-formed document id
    #[error("malformed document id '{0}'")]
    InvalidId(String),

    /// Document body could not be encoded or decoded
    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A stored document does not have the expected shape
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The backend did not open within the configured timeout
    #[error("storage connection not established within {0:?}")]
    ConnectTimeout(Duration),

    /// The backend is not reachable (poisoned lock, aborted open task)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a corruption error at a byte offset
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        StorageError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Io { .. } => "HRMS_STORAGE_IO_ERROR",
            StorageError::Corruption { .. } => "HRMS_DATA_CORRUPTION",
            StorageError::InvalidId(_) => "HRMS_STORAGE_INVALID_ID",
            StorageError::Encoding(_) => "HRMS_STORAGE_ENCODING",
            StorageError::MalformedDocument(_) => "HRMS_STORAGE_MALFORMED_DOCUMENT",
            StorageError::ConnectTimeout(_) => "HRMS_STORAGE_CONNECT_TIMEOUT",
            StorageError::Unavailable(_) => "HRMS_STORAGE_UNAVAILABLE",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            StorageError::Corruption { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Returns whether this error means the store cannot be used at all
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
