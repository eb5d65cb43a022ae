//! # Database
//!
//! A named set of document collections. The file backend replays
//! `<data_dir>/<database>/documents.dat` on open and appends every
//! mutation to it before applying the mutation in memory.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::observability::Logger;

use super::collection::Collection;
use super::config::{Backend, StorageConfig};
use super::document_id::DocumentId;
use super::errors::{StorageError, StorageResult};
use super::reader::StorageReader;
use super::record::DocumentRecord;
use super::writer::StorageWriter;

/// A stored JSON object
pub type Document = serde_json::Map<String, Value>;

/// Key under which every document stores its id
pub const ID_FIELD: &str = "_id";

/// Log file name inside the database directory
pub const STORAGE_FILE: &str = "documents.dat";

pub(super) struct DatabaseState {
    /// collection -> documents in insertion order
    pub(super) collections: HashMap<String, CollectionData>,
    /// `None` for the memory backend
    pub(super) log: Option<StorageWriter>,
}

impl DatabaseState {
    /// Make a record durable before the caller mutates memory
    pub(super) fn persist(&mut self, record: &DocumentRecord) -> StorageResult<()> {
        if let Some(log) = self.log.as_mut() {
            log.append(record)?;
        }
        Ok(())
    }
}

/// Handle to an open database
pub struct Database {
    name: String,
    state: RwLock<DatabaseState>,
}

impl Database {
    /// Open a volatile database
    pub fn in_memory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(DatabaseState {
                collections: HashMap::new(),
                log: None,
            }),
        }
    }

    /// Open (or create) a file-backed database, replaying its log.
    ///
    /// Fails with `StorageError::Corruption` if any record is damaged.
    pub fn open(data_dir: &Path, name: &str) -> StorageResult<Self> {
        let storage_path = data_dir.join(name).join(STORAGE_FILE);

        let mut collections = HashMap::new();
        let mut replayed = 0usize;
        if storage_path.exists() {
            for entry in StorageReader::open(&storage_path)? {
                let (offset, record) = entry?;
                replay(&mut collections, record, offset)?;
                replayed += 1;
            }
        }
        Logger::debug(
            "STORAGE_REPLAYED",
            &[("database", name), ("records", &replayed.to_string())],
        );

        let log = StorageWriter::open(&storage_path)?;

        Ok(Self {
            name: name.to_string(),
            state: RwLock::new(DatabaseState {
                collections,
                log: Some(log),
            }),
        })
    }

    /// Open the configured backend under the connection timeout.
    ///
    /// The open runs on the blocking pool so log replay never stalls the runtime.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Arc<Self>> {
        let timeout = config.connect_timeout();
        let config = config.clone();

        let open = tokio::task::spawn_blocking(move || match config.backend {
            Backend::Memory => Ok(Database::in_memory(&config.database)),
            Backend::File => Database::open(&config.data_dir, &config.database),
        });

        match tokio::time::timeout(timeout, open).await {
            Ok(Ok(result)) => result.map(Arc::new),
            Ok(Err(join_err)) => Err(StorageError::Unavailable(format!(
                "open task failed: {}",
                join_err
            ))),
            Err(_) => Err(StorageError::ConnectTimeout(timeout)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether mutations are written to disk
    pub fn is_durable(&self) -> bool {
        self.read_state().map(|s| s.log.is_some()).unwrap_or(false)
    }

    /// Handle to a named collection. Collections exist implicitly.
    pub fn collection(self: &Arc<Self>, name: &str) -> Collection {
        Collection::new(Arc::clone(self), name)
    }

    /// Number of live documents in a collection
    pub fn document_count(&self, collection: &str) -> StorageResult<usize> {
        let state = self.read_state()?;
        Ok(state.collections.get(collection).map_or(0, CollectionData::len))
    }

    pub(super) fn read_state(&self) -> StorageResult<RwLockReadGuard<'_, DatabaseState>> {
        self.state
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }

    pub(super) fn write_state(&self) -> StorageResult<RwLockWriteGuard<'_, DatabaseState>> {
        self.state
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }
}

/// Documents of one collection in insertion order, indexed by id
#[derive(Debug, Default)]
pub(super) struct CollectionData {
    next_seq: u64,
    /// insertion sequence -> document
    documents: BTreeMap<u64, Document>,
    /// document id -> insertion sequence
    by_id: HashMap<String, u64>,
}

impl CollectionData {
    pub(super) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(super) fn get(&self, key: &str) -> Option<&Document> {
        self.by_id.get(key).and_then(|seq| self.documents.get(seq))
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Replace the document in place, or append it when the id is new
    pub(super) fn upsert(&mut self, key: String, document: Document) {
        let seq = match self.by_id.get(&key) {
            Some(seq) => *seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.by_id.insert(key, seq);
                seq
            }
        };
        self.documents.insert(seq, document);
    }

    pub(super) fn remove(&mut self, key: &str) -> Option<Document> {
        let seq = self.by_id.remove(key)?;
        self.documents.remove(&seq)
    }
}

/// Apply one log record to the in-memory collections. Latest record wins.
fn replay(
    collections: &mut HashMap<String, CollectionData>,
    record: DocumentRecord,
    offset: u64,
) -> StorageResult<()> {
    let id = DocumentId::parse(&record.document_id).map_err(|_| {
        StorageError::corruption_at_offset(
            offset,
            format!("Invalid document id '{}'", record.document_id),
        )
    })?;
    let key = id.to_string();
    let documents = collections.entry(record.collection).or_default();

    if record.is_tombstone {
        documents.remove(&key);
        return Ok(());
    }

    let document: Document = serde_json::from_slice(&record.body).map_err(|e| {
        StorageError::corruption_at_offset(offset, format!("Invalid document body: {}", e))
    })?;
    if !has_id(&document, &key) {
        return Err(StorageError::corruption_at_offset(
            offset,
            format!("Document body does not carry id {}", key),
        ));
    }

    documents.upsert(key, document);
    Ok(())
}

fn has_id(document: &Document, key: &str) -> bool {
    document.get(ID_FIELD).and_then(Value::as_str) == Some(key)
}
