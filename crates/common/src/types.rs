use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a stored record.
///
/// Identifiers are assigned by the record store on insert and are
/// serialized as bare JSON integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// The identifier handed out to the first record of an empty collection.
    pub const FIRST: RecordId = RecordId(1);

    /// Creates a record ID from a raw integer.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for u64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Error returned when a path segment is not a valid record identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRecordIdError {
    pub input: String,
}

impl std::fmt::Display for ParseRecordIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid record id: {:?}", self.input)
    }
}

impl std::error::Error for ParseRecordIdError {}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    /// Accepts only plain decimal digits, so `"+1"`, `"1.0"` and `" 1"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseRecordIdError {
                input: s.to_string(),
            });
        }
        s.parse::<u64>().map(Self).map_err(|_| ParseRecordIdError {
            input: s.to_string(),
        })
    }
}
