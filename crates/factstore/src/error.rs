//! Error types for factstore

use thiserror::Error;

use crate::session::SessionKeyError;

/// Main error type for fact store operations
#[derive(Error, Debug)]
pub enum FactStoreError {
    /// A write was rejected before touching the backing store
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Backing store read/write failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Session key failed validation
    #[error("Invalid session key: {0}")]
    InvalidSessionKey(#[from] SessionKeyError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FactStoreError {
    fn from(e: serde_json::Error) -> Self {
        FactStoreError::Serialization(e.to_string())
    }
}

/// Result type alias for fact store operations
pub type Result<T> = std::result::Result<T, FactStoreError>;
