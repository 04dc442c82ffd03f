//! History store error types.

use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors that can occur while loading or saving history
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying storage failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Stored data is not a valid JSON history array
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Stored records parsed but failed validation
    #[error("{} invalid history record(s)", .0.len())]
    InvalidRecords(NonEmptyVec<RecordViolation>),

    /// Backend-specific failure
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// A single problem found in a persisted history record
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordViolation {
    #[error("Record {index} has an empty id")]
    MissingId { index: usize },

    #[error("Record {index} has an empty expression")]
    MissingExpression { index: usize },

    #[error("Record {index} has a non-finite result")]
    NonFiniteResult { index: usize },

    #[error("Record {index} repeats id '{id}'")]
    DuplicateId { index: usize, id: String },
}
