//! # Collection
//!
//! Single-document operations. Each call takes the database lock once,
//! so every operation is atomic with respect to the others.

use std::sync::Arc;

use serde_json::Value;

use super::database::{Database, Document, ID_FIELD};
use super::document_id::DocumentId;
use super::errors::StorageResult;
use super::record::DocumentRecord;

/// Outcome of `insert_one`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOneResult {
    pub inserted_id: DocumentId,
}

/// Outcome of `delete_one`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Handle to a named collection inside a database
#[derive(Clone)]
pub struct Collection {
    db: Arc<Database>,
    name: String,
}

impl Collection {
    pub(super) fn new(db: Arc<Database>, name: &str) -> Self {
        Self {
            db,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All documents in insertion order. Empty when the collection does not exist.
    pub fn find_all(&self) -> StorageResult<Vec<Document>> {
        let state = self.db.read_state()?;
        Ok(state
            .collections
            .get(&self.name)
            .map(|docs| docs.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Document with the given id, if any
    pub fn find_one(&self, id: &DocumentId) -> StorageResult<Option<Document>> {
        let key = id.to_string();
        let state = self.db.read_state()?;
        Ok(state
            .collections
            .get(&self.name)
            .and_then(|docs| docs.get(&key))
            .cloned())
    }

    /// Insert a document under a freshly assigned id.
    ///
    /// Any `_id` already present in `document` is discarded.
    pub fn insert_one(&self, mut document: Document) -> StorageResult<InsertOneResult> {
        let id = DocumentId::generate();
        let key = id.to_string();
        document.insert(ID_FIELD.to_string(), Value::String(key.clone()));

        let record = DocumentRecord::live(&self.name, &id, serde_json::to_vec(&document)?);

        let mut state = self.db.write_state()?;
        state.persist(&record)?;
        state
            .collections
            .entry(self.name.clone())
            .or_default()
            .upsert(key, document);

        Ok(InsertOneResult { inserted_id: id })
    }

    /// Overwrite the fields in `set` on the matching document.
    ///
    /// `_id` is never overwritten. Returns the updated document, or `None`
    /// when no document matched.
    pub fn find_one_and_update(
        &self,
        id: &DocumentId,
        set: Document,
    ) -> StorageResult<Option<Document>> {
        let key = id.to_string();
        let mut state = self.db.write_state()?;

        let Some(mut updated) = state
            .collections
            .get(&self.name)
            .and_then(|docs| docs.get(&key))
            .cloned()
        else {
            return Ok(None);
        };

        for (field, value) in set {
            if field != ID_FIELD {
                updated.insert(field, value);
            }
        }

        let record = DocumentRecord::live(&self.name, id, serde_json::to_vec(&updated)?);
        state.persist(&record)?;

        if let Some(docs) = state.collections.get_mut(&self.name) {
            docs.upsert(key, updated.clone());
        }

        Ok(Some(updated))
    }

    /// Delete the matching document. `deleted_count` is 0 when nothing matched.
    pub fn delete_one(&self, id: &DocumentId) -> StorageResult<DeleteResult> {
        let key = id.to_string();
        let mut state = self.db.write_state()?;

        let exists = state
            .collections
            .get(&self.name)
            .is_some_and(|docs| docs.get(&key).is_some());
        if !exists {
            return Ok(DeleteResult { deleted_count: 0 });
        }

        state.persist(&DocumentRecord::tombstone(&self.name, id))?;

        if let Some(docs) = state.collections.get_mut(&self.name) {
            docs.remove(&key);
        }

        Ok(DeleteResult { deleted_count: 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn employees() -> Collection {
        Arc::new(Database::in_memory("fiber-hrms")).collection("employees")
    }

    #[test]
    fn test_find_all_on_missing_collection_is_empty() {
        assert!(employees().find_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_id_and_discards_supplied_one() {
        let collection = employees();
        let supplied = DocumentId::generate().to_string();

        let result = collection
            .insert_one(doc(json!({"_id": supplied, "name": "A"})))
            .unwrap();
        assert_ne!(result.inserted_id.to_string(), supplied);

        let stored = collection.find_one(&result.inserted_id).unwrap().unwrap();
        assert_eq!(stored[ID_FIELD], json!(result.inserted_id.to_string()));
        assert_eq!(stored["name"], json!("A"));
    }

    #[test]
    fn test_find_all_keeps_insertion_order() {
        let collection = employees();
        for name in ["A", "B", "C"] {
            collection.insert_one(doc(json!({"name": name}))).unwrap();
        }

        let names: Vec<_> = collection
            .find_all()
            .unwrap()
            .into_iter()
            .map(|d| d["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);
    }

    #[test]
    fn test_update_sets_fields_but_not_id() {
        let collection = employees();
        let id = collection
            .insert_one(doc(json!({"name": "A", "salary": 100.0})))
            .unwrap()
            .inserted_id;

        let updated = collection
            .find_one_and_update(
                &id,
                doc(json!({"_id": "other", "salary": 200.0, "age": 31.0})),
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated[ID_FIELD], json!(id.to_string()));
        assert_eq!(updated["name"], json!("A"));
        assert_eq!(updated["salary"], json!(200.0));
        assert_eq!(updated["age"], json!(31.0));
        assert_eq!(collection.find_one(&id).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_update_missing_document_returns_none() {
        let collection = employees();
        let result = collection
            .find_one_and_update(&DocumentId::generate(), doc(json!({"name": "X"})))
            .unwrap();
        assert!(result.is_none());
        assert!(collection.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_counts() {
        let collection = employees();
        let id = collection
            .insert_one(doc(json!({"name": "A"})))
            .unwrap()
            .inserted_id;

        assert_eq!(collection.delete_one(&id).unwrap().deleted_count, 1);
        assert_eq!(collection.delete_one(&id).unwrap().deleted_count, 0);
        assert!(collection.find_one(&id).unwrap().is_none());
    }

    #[test]
    fn test_collections_do_not_share_documents() {
        let db = Arc::new(Database::in_memory("fiber-hrms"));
        db.collection("employees")
            .insert_one(doc(json!({"name": "A"})))
            .unwrap();
        assert!(db.collection("contractors").find_all().unwrap().is_empty());
    }
}
