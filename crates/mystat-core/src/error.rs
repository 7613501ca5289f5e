//! Error types for mystat

use thiserror::Error;

/// Core error type for mystat operations
#[derive(Error, Debug)]
pub enum MystatError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// A snapshot or delta precondition is violated. Never papered over
    /// with default values.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl MystatError {
    /// Whether this error means the connection itself is gone, as opposed
    /// to a single statement failing on a healthy connection.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, MystatError::Connection(_))
    }
}

/// Result type alias for mystat operations
pub type Result<T> = std::result::Result<T, MystatError>;
