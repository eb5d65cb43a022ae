//! # Request Parsing
//!
//! Turns raw path segments and bodies into typed values. Every failure
//! here is a validation error (400).

use crate::employee::Employee;
use crate::storage::DocumentId;

use super::errors::{RestError, RestResult};

/// Parse an employee body. Any supplied `id` is discarded.
pub fn parse_employee(body: &[u8]) -> RestResult<Employee> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RestError::InvalidBody("empty body".to_string()));
    }
    let mut employee: Employee =
        serde_json::from_slice(body).map_err(|e| RestError::InvalidBody(e.to_string()))?;
    employee.id = None;
    Ok(employee)
}

/// Parse a path identifier into a storage key
pub fn parse_id(raw: &str) -> RestResult<DocumentId> {
    DocumentId::parse(raw).map_err(|_| RestError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_employee() {
        let employee = parse_employee(br#"{"name":"A","salary":100,"age":30}"#).unwrap();
        assert_eq!(employee, Employee::new("A", 100.0, 30.0));
    }

    #[test]
    fn test_supplied_id_is_cleared() {
        let employee =
            parse_employee(br#"{"id":"abc","name":"A","salary":100,"age":30}"#).unwrap();
        assert!(employee.id.is_none());
    }

    #[test]
    fn test_malformed_bodies() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"   ",
            b"{not json",
            br#"{"name":"A","salary":"lots","age":30}"#,
            br#"[1,2,3]"#,
        ];
        for body in bodies {
            assert!(
                matches!(parse_employee(body), Err(RestError::InvalidBody(_))),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_id() {
        let id = DocumentId::generate();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("not-an-id"), Err(RestError::InvalidId(_))));
    }
}
