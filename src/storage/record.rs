//! Document log record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Collection       | (length-prefixed string)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Record length covers the whole record. The checksum is CRC32 (IEEE) over every
//! byte before it.

use std::io::{self, Read};

use crc32fast::hash as compute_checksum;

use super::document_id::DocumentId;

/// len + collection len + id len + tombstone + body len + checksum
const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 1 + 4 + 4;

/// One entry in the document log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Collection the document belongs to
    pub collection: String,
    /// Document key, hyphenated UUID
    pub document_id: String,
    /// Whether this record deletes the document
    pub is_tombstone: bool,
    /// Full JSON document (empty for tombstones)
    pub body: Vec<u8>,
}

impl DocumentRecord {
    /// Record holding the full current state of a document
    pub fn live(collection: &str, id: &DocumentId, body: Vec<u8>) -> Self {
        Self {
            collection: collection.to_string(),
            document_id: id.to_string(),
            is_tombstone: false,
            body,
        }
    }

    /// Record marking a document deleted
    pub fn tombstone(collection: &str, id: &DocumentId) -> Self {
        Self {
            collection: collection.to_string(),
            document_id: id.to_string(),
            is_tombstone: true,
            body: Vec::new(),
        }
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            4 + self.collection.len() + 4 + self.document_id.len() + 1 + 4 + self.body.len(),
        );

        buf.extend_from_slice(&(self.collection.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.collection.as_bytes());

        buf.extend_from_slice(&(self.document_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.document_id.as_bytes());

        buf.push(u8::from(self.is_tombstone));

        buf.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying the checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let collection = read_string(&mut cursor)?;
        let document_id = read_string(&mut cursor)?;

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;
        let is_tombstone = tombstone_buf[0] != 0;

        let body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                collection,
                document_id,
                is_tombstone,
                body,
            },
            record_length,
        ))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let buf = read_bytes(reader)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}
