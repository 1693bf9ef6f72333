//! Error types for the masking engine.

use thiserror::Error;

/// Result type for masking operations.
pub type Result<T> = std::result::Result<T, MaskError>;

/// Errors that can occur during masking.
///
/// Only infrastructure faults surface here. Data-level faults (unclassified
/// keys, unsupported scalar types, over-deep nesting) degrade to logged
/// diagnostics so one malformed record cannot abort a whole batch.
#[derive(Error, Debug)]
pub enum MaskError {
    /// An injected token store failed an operation.
    #[error("store error: {0}")]
    StoreError(String),

    /// I/O error during policy or snapshot file operations.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MaskError {
    /// Create a store error from any displayable cause.
    pub fn store(cause: impl std::fmt::Display) -> Self {
        MaskError::StoreError(cause.to_string())
    }
}
