/// Errors from world-state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// World-state keys must be non-empty.
    #[error("key must not be an empty string")]
    EmptyKey,

    /// Range start sorts after range end.
    #[error("invalid range: start {start:?} is after end {end:?}")]
    InvalidRange { start: String, end: String },

    /// The backend refused a write.
    #[error("write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },

    /// The backend refused to open a range scan.
    #[error("range scan rejected: {0}")]
    ScanRejected(String),

    /// A range cursor failed while iterating.
    #[error("cursor failed after {position} entries: {reason}")]
    Cursor { position: usize, reason: String },

    /// Internal backend failure (e.g. a poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization or deserialization of a snapshot failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing a snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
