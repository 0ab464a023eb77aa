//! Risk entry identity - prefixed ULIDs
//!
//! Entry IDs have the form `RA-<ULID>`, e.g. `RA-01HQ3K4N5M6P7R8S9T0V1W2X3Y`.
//! ULIDs sort by creation time, so IDs created later compare greater.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix shared by all risk entry IDs
pub const ENTRY_PREFIX: &str = "RA";

/// Errors parsing an entry ID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("Entry ID must start with 'RA-': {0}")]
    MissingPrefix(String),

    #[error("Invalid ULID in entry ID '{id}': {reason}")]
    InvalidUlid { id: String, reason: String },
}

/// Opaque identity of a risk assessment entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(Ulid);

impl EntryId {
    /// Generate a new unique entry ID
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// The ULID part of the ID
    pub fn ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", ENTRY_PREFIX, self.0)
    }
}

impl FromStr for EntryId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid_part = s
            .strip_prefix(ENTRY_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(|| IdParseError::MissingPrefix(s.to_string()))?;

        Ulid::from_string(ulid_part)
            .map(EntryId)
            .map_err(|e| IdParseError::InvalidUlid {
                id: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl TryFrom<String> for EntryId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_format() {
        let id = EntryId::new();
        let s = id.to_string();
        assert!(s.starts_with("RA-"));
        assert_eq!(s.len(), 29); // 2 prefix + 1 dash + 26 ULID
    }

    #[test]
    fn test_entry_id_parse() {
        let id = EntryId::new();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_entry_id_rejects_bad_input() {
        assert!(matches!(
            "HAZ-01HQ3K4N5M6P7R8S9T0V1W2X3Y".parse::<EntryId>(),
            Err(IdParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            "RA-not-a-ulid".parse::<EntryId>(),
            Err(IdParseError::InvalidUlid { .. })
        ));
    }

    #[test]
    fn test_entry_id_serializes_as_string() {
        let id = EntryId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
