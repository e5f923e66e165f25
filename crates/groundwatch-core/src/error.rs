//! Error types for Groundwatch

use thiserror::Error;

/// Result type alias using Groundwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Groundwatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure while fetching the contact document
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Data source answered with a non-success status
    #[error("Data source returned status {0}")]
    Status(u16),

    /// Contact document could not be decoded
    #[error("Malformed contact document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Persistent state read/write error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Not found error
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Terminal error
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
