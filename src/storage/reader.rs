//! Sequential reader for the document log
//!
//! The log is loaded whole and decoded record by record. Every record is
//! checksum-verified; any framing or checksum failure is reported as
//! corruption at the offset where the damaged record starts.

use std::fs;
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// Reader for replaying the document log from offset 0.
pub struct StorageReader {
    data: Vec<u8>,
    current_offset: usize,
    failed: bool,
}

impl StorageReader {
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let data = fs::read(storage_path).map_err(|e| {
            StorageError::io(
                format!("Failed to read storage file {}", storage_path.display()),
                e,
            )
        })?;

        Ok(Self {
            data,
            current_offset: 0,
            failed: false,
        })
    }

    /// Byte offset of the next record
    pub fn current_offset(&self) -> u64 {
        self.current_offset as u64
    }

    /// Decode the next record. `Ok(None)` at end of log.
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        let remaining = &self.data[self.current_offset..];
        if remaining.is_empty() {
            return Ok(None);
        }

        let (record, consumed) = DocumentRecord::deserialize(remaining).map_err(|e| {
            StorageError::corruption_at_offset(self.current_offset(), e.to_string())
        })?;
        self.current_offset += consumed;

        Ok(Some(record))
    }

    /// Decode all remaining records. Stops at the first corruption.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        self.by_ref().map(|entry| entry.map(|(_, record)| record)).collect()
    }
}

/// Yields each record with the offset it starts at. Ends after the first error.
impl Iterator for StorageReader {
    type Item = StorageResult<(u64, DocumentRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let offset = self.current_offset();
        match self.read_next() {
            Ok(Some(record)) => Some(Ok((offset, record))),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::document_id::DocumentId;
    use super::super::writer::StorageWriter;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_all_in_write_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.dat");

        let first = DocumentId::generate();
        let second = DocumentId::generate();
        {
            let mut writer = StorageWriter::open(&path).unwrap();
            writer
                .append(&DocumentRecord::live("employees", &first, b"{}".to_vec()))
                .unwrap();
            writer
                .append(&DocumentRecord::tombstone("employees", &second))
                .unwrap();
        }

        let mut reader = StorageReader::open(&path).unwrap();
        let records = reader.read_all().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_id, first.to_string());
        assert!(records[1].is_tombstone);
        assert_eq!(reader.current_offset(), std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_empty_file_reads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.dat");
        std::fs::write(&path, b"").unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_iterator_reports_offsets_and_stops_on_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.dat");
        let second_offset = {
            let mut writer = StorageWriter::open(&path).unwrap();
            writer
                .append(&DocumentRecord::tombstone("employees", &DocumentId::generate()))
                .unwrap();
            writer
                .append(&DocumentRecord::tombstone("employees", &DocumentId::generate()))
                .unwrap()
        };
        let mut contents = std::fs::read(&path).unwrap();
        contents.push(0);
        std::fs::write(&path, contents).unwrap();

        let entries: Vec<_> = StorageReader::open(&path).unwrap().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().unwrap().0, 0);
        assert_eq!(entries[1].as_ref().unwrap().0, second_offset);
        assert!(entries[2].as_ref().unwrap_err().is_fatal());
    }

    #[test]
    fn test_trailing_garbage_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.dat");
        {
            let mut writer = StorageWriter::open(&path).unwrap();
            writer
                .append(&DocumentRecord::live(
                    "employees",
                    &DocumentId::generate(),
                    b"{}".to_vec(),
                ))
                .unwrap();
        }
        let mut contents = std::fs::read(&path).unwrap();
        let valid_len = contents.len() as u64;
        contents.extend_from_slice(&[1, 2, 3]);
        std::fs::write(&path, contents).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        match reader.read_next() {
            Err(StorageError::Corruption { offset, .. }) => assert_eq!(offset, valid_len),
            other => panic!("expected corruption, got {:?}", other),
        }
    }
}
