//! Error types for editor operations.

use crate::element::ElementId;
use thiserror::Error;

/// Errors returned by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Element already exists: {0}")]
    DuplicateElement(ElementId),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
