//! Document identifiers
//!
//! Every stored document is keyed by a UUID assigned at insert time.
//! Callers only ever see the hyphenated string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{StorageError, StorageResult};

/// Storage key of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id received from a caller.
    ///
    /// Only the lowercase hyphenated form this type displays is accepted, so a
    /// parsed id always prints back as the exact input. Anything else fails
    /// with `StorageError::InvalidId`.
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let invalid = || StorageError::InvalidId(raw.to_string());
        let id = Uuid::parse_str(raw).map(Self).map_err(|_| invalid())?;
        if id.to_string() != raw {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
