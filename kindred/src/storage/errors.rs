//! Error types for storage operations

use thiserror::Error;

/// Error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error
    #[error("Query error: {0}")]
    Query(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Data not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// Unsupported storage type
    #[error("Unsupported storage type: {0}")]
    UnsupportedStorageType(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Convert a JSON error to a storage error
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Convert a standard IO error to a storage error
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}
