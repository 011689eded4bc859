//! Global error handling for repodump

use std::io;

use thiserror::Error;

/// Global error type for repodump operations
#[derive(Error, Debug)]
pub enum DumpError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Document assembly or serialization errors
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for repodump operations
pub type Result<T> = std::result::Result<T, DumpError>;

// Failing to persist a temporary output file reduces to the underlying
// IO error; the temp path is already gone by then.
impl From<tempfile::PersistError> for DumpError {
    fn from(err: tempfile::PersistError) -> Self {
        DumpError::Io(err.error)
    }
}
