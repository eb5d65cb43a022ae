//! Employee entity and its document mapping

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{Document, StorageError, StorageResult, ID_FIELD};

/// An employee record.
///
/// `id` is assigned by storage. It is absent on creation requests and
/// always present on records read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub salary: f64,
    pub age: f64,
}

impl Employee {
    pub fn new(name: impl Into<String>, salary: f64, age: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            salary,
            age,
        }
    }

    /// Same record with the identifier replaced
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The mutable fields as a document. Never carries an id.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name".to_string(), Value::String(self.name.clone()));
        doc.insert("salary".to_string(), number(self.salary));
        doc.insert("age".to_string(), number(self.age));
        doc
    }

    /// Rebuild an employee from a stored document, mapping `_id` to `id`.
    pub fn from_document(mut doc: Document) -> StorageResult<Self> {
        let id = doc.remove(ID_FIELD);
        let mut employee: Employee = serde_json::from_value(Value::Object(doc))?;
        employee.id = match id {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };
        if employee.id.is_none() {
            return Err(StorageError::MalformedDocument(
                "stored employee document has no id".to_string(),
            ));
        }
        Ok(employee)
    }
}

// serde_json cannot represent NaN or infinity
fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
