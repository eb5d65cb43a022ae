//! # REST API Handler
//!
//! Maps the four employee operations onto single-document storage calls.

use crate::employee::Employee;
use crate::storage::{Collection, DocumentId, StorageError};

use super::errors::{RestError, RestResult};

/// Body returned by a successful delete
pub const DELETE_CONFIRMATION: &str = "Record deleted";

/// Employee operations behind the HTTP routes
pub trait EmployeeHandler: Send + Sync {
    /// All employees, unfiltered and unordered
    fn list(&self) -> RestResult<Vec<Employee>>;

    /// Insert an employee and return it as stored
    fn create(&self, employee: Employee) -> RestResult<Employee>;

    /// Overwrite name, salary and age of the matching employee
    fn update(&self, id: &DocumentId, employee: Employee) -> RestResult<Employee>;

    /// Remove the matching employee
    fn delete(&self, id: &DocumentId) -> RestResult<&'static str>;
}

/// Handler backed by a document collection
pub struct CollectionEmployeeHandler {
    employees: Collection,
}

impl CollectionEmployeeHandler {
    pub fn new(employees: Collection) -> Self {
        Self { employees }
    }
}

impl EmployeeHandler for CollectionEmployeeHandler {
    fn list(&self) -> RestResult<Vec<Employee>> {
        self.employees
            .find_all()?
            .into_iter()
            .map(|doc| Employee::from_document(doc).map_err(RestError::from))
            .collect()
    }

    fn create(&self, employee: Employee) -> RestResult<Employee> {
        let inserted = self.employees.insert_one(employee.to_document())?;

        let stored = self
            .employees
            .find_one(&inserted.inserted_id)?
            .ok_or_else(|| {
                StorageError::Unavailable(format!(
                    "inserted employee {} could not be read back",
                    inserted.inserted_id
                ))
            })?;

        Ok(Employee::from_document(stored)?)
    }

    fn update(&self, id: &DocumentId, employee: Employee) -> RestResult<Employee> {
        match self
            .employees
            .find_one_and_update(id, employee.to_document())?
        {
            Some(_) => Ok(employee.with_id(id.to_string())),
            None => Err(RestError::UpdateTargetMissing(id.to_string())),
        }
    }

    fn delete(&self, id: &DocumentId) -> RestResult<&'static str> {
        let result = self.employees.delete_one(id)?;
        if result.deleted_count < 1 {
            return Err(RestError::NotFound(id.to_string()));
        }
        Ok(DELETE_CONFIRMATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use std::sync::Arc;

    fn create_test_handler() -> CollectionEmployeeHandler {
        let db = Arc::new(Database::in_memory("fiber-hrms"));
        CollectionEmployeeHandler::new(db.collection("employees"))
    }

    #[test]
    fn test_list_empty() {
        let handler = create_test_handler();
        assert!(handler.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_id() {
        let handler = create_test_handler();

        let created = handler.create(Employee::new("A", 100.0, 30.0)).unwrap();
        assert!(!created.id.as_deref().unwrap_or_default().is_empty());
        assert_eq!(created.name, "A");
        assert_eq!(created.salary, 100.0);
        assert_eq!(created.age, 30.0);

        assert_eq!(handler.list().unwrap(), vec![created]);
    }

    #[test]
    fn test_update_then_list() {
        let handler = create_test_handler();
        let created = handler.create(Employee::new("A", 100.0, 30.0)).unwrap();
        let id = DocumentId::parse(created.id.as_deref().unwrap()).unwrap();

        let updated = handler.update(&id, Employee::new("A", 200.0, 30.0)).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.salary, 200.0);

        let listed = handler.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].salary, 200.0);
    }

    #[test]
    fn test_update_missing() {
        let handler = create_test_handler();
        let result = handler.update(&DocumentId::generate(), Employee::new("A", 1.0, 2.0));
        assert!(matches!(result, Err(RestError::UpdateTargetMissing(_))));
    }

    #[test]
    fn test_delete_twice() {
        let handler = create_test_handler();
        let created = handler.create(Employee::new("A", 100.0, 30.0)).unwrap();
        let id = DocumentId::parse(created.id.as_deref().unwrap()).unwrap();

        assert_eq!(handler.delete(&id).unwrap(), DELETE_CONFIRMATION);
        assert!(matches!(handler.delete(&id), Err(RestError::NotFound(_))));
        assert!(handler.list().unwrap().is_empty());
    }
}
