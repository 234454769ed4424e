//! Error types for gdsave
//!
//! Provides a unified error type for all operations.
//!
//! Note that decode failures while constructing a [`Part`](crate::part::Part)
//! never reach the caller; [`SaveError::Decode`] only surfaces when the codec
//! is driven directly.

use thiserror::Error;

/// Result type alias using SaveError
pub type Result<T> = std::result::Result<T, SaveError>;

/// Unified error type for gdsave operations
#[derive(Debug, Error)]
pub enum SaveError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Save Transform Errors
    // -------------------------------------------------------------------------
    #[error("Save transform error: {0}")]
    Crypt(String),

    // -------------------------------------------------------------------------
    // Collection Errors
    // -------------------------------------------------------------------------
    #[error("Level collection is not bound to a database and no target was given")]
    UnboundCollection,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
