//! Error types for Threadix.

use thiserror::Error;

/// Result type alias using ThreadixError.
pub type Result<T> = std::result::Result<T, ThreadixError>;

/// Errors that can occur in Threadix index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadixError {
    #[error("Key is empty after normalization")]
    EmptyKey,

    #[error("Key not found")]
    KeyNotFound,

    #[error("Element {element} not stored under key")]
    ElementMismatch { element: i64 },

    #[error("Entry already present")]
    DuplicateEntry,
}
