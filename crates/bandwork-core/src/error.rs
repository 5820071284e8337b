//! Error types for bandwork-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bandwork-core
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while loading or saving a design
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed design document
    #[error("Invalid design document: {0}")]
    Json(#[from] serde_json::Error),

    /// Band index out of bounds
    #[error("Band index {0} out of bounds (count: {1})")]
    BandOutOfBounds(usize, usize),

    /// Object not found by id
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Invalid color specification
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
