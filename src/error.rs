//! Error types for the state store.

use thiserror::Error;

/// Boxed error produced by caller-supplied asynchronous updates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid state format: {0}")]
    InvalidFormat(String),

    #[error("Unknown storage type: {0}")]
    UnknownStorageType(String),

    #[error("Storage is locked by another process")]
    Locked,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("This is not an Async function")]
    NotAsync,

    #[error("Update failed to resolve: {0}")]
    Resolve(#[source] BoxError),

    #[error("Update function panicked: {0}")]
    UpdatePanicked(String),

    #[error("{failed} observer(s) panicked during notification")]
    Observer { failed: usize },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
