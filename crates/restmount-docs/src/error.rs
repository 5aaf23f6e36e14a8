//! Error types for the documentation crate.

use thiserror::Error;

/// Errors that can occur while producing the API document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize API document: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
