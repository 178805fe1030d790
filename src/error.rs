//! Error types for the memo store.

use crate::types::RecordId;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored or imported blob is structurally invalid.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The collection could not be serialized. Not expected in practice.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// Opaque failure reported by a blob store backend.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Store is locked by another process")]
    Locked,

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Record content is empty")]
    EmptyContent,

    #[error("Import data is empty")]
    EmptyImport,

    #[error("No records to export")]
    NothingToExport,

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::Encoding(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for StoreError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        StoreError::Decoding(e.to_string())
    }
}

impl From<base64::DecodeError> for StoreError {
    fn from(e: base64::DecodeError) -> Self {
        StoreError::Decoding(format!("invalid base64: {}", e))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
