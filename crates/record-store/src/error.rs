use thiserror::Error;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file does not have the expected layout.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
