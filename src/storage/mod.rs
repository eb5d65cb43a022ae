//! Embedded document store
//!
//! Holds the employee documents. Collections are ordered lists of JSON
//! objects keyed by `_id`. The file backend keeps an append-only,
//! checksummed log and rebuilds memory from it on open.
//!
//! # Design Principles
//!
//! - Append-only log, no in-place file updates
//! - Checksum-verified on every read
//! - Latest record wins for the same document id
//! - Record is fsynced before the mutation becomes visible
//! - Corruption halts the open

mod collection;
mod config;
mod database;
mod document_id;
mod errors;
mod reader;
mod record;
mod writer;

pub use collection::{Collection, DeleteResult, InsertOneResult};
pub use config::{Backend, StorageConfig};
pub use database::{Database, Document, ID_FIELD, STORAGE_FILE};
pub use document_id::DocumentId;
pub use errors::{Severity, StorageError, StorageResult};
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use writer::{LogFile, StorageWriter};
