//! Append-only writer for the document log
//!
//! Every append is followed by fsync. A mutation is applied in memory only
//! after its record is durable. A failed append is truncated away, so the
//! log always ends on a complete record. If the truncate fails too, the
//! writer refuses all further appends.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// File operations the writer needs from its backing log
pub trait LogFile: Send + Sync {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    fn sync_all(&mut self) -> io::Result<()>;
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl LogFile for File {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(self, buf)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        File::sync_all(self)
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

/// Appends records to `documents.dat`.
pub struct StorageWriter {
    file: Box<dyn LogFile>,
    current_offset: u64,
    poisoned: bool,
}

impl StorageWriter {
    /// Opens or creates the log file, creating parent directories if needed.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        if let Some(parent) = storage_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::io(
                        format!("Failed to create data directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(storage_path)
            .map_err(|e| {
                StorageError::io(
                    format!("Failed to open storage file {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io("Failed to read file metadata", e))?
            .len();

        Ok(Self::with_file(file, current_offset))
    }

    /// Writer over an already opened log whose valid records end at `current_offset`
    pub fn with_file(file: impl LogFile + 'static, current_offset: u64) -> Self {
        Self {
            file: Box::new(file),
            current_offset,
            poisoned: false,
        }
    }

    /// Returns the current end-of-log offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Whether a failed rollback left the log tail unknown
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Appends a record and fsyncs. Returns the offset the record was written at.
    ///
    /// On failure the log is truncated back to that offset before the error
    /// is returned.
    pub fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        if self.poisoned {
            return Err(StorageError::Unavailable(format!(
                "document log could not be rolled back to offset {}",
                self.current_offset
            )));
        }

        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.file.write_all(&serialized) {
            self.rollback(offset);
            return Err(StorageError::io(
                format!("Failed to write document {}", record.document_id),
                e,
            ));
        }

        if let Err(e) = self.file.sync_all() {
            self.rollback(offset);
            return Err(StorageError::io(
                format!("fsync failed after writing document {}", record.document_id),
                e,
            ));
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    fn rollback(&mut self, offset: u64) {
        let truncated = self
            .file
            .set_len(offset)
            .and_then(|_| self.file.sync_all());
        if truncated.is_err() {
            self.poisoned = true;
        }
    }
}
