//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Nothing stored under the given key or path
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON document could not be read or written
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parser error from triage-parser
    #[error("Parser error: {0}")]
    Parser(String),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}

impl From<triage_parser::ParseError> for RepositoryError {
    fn from(err: triage_parser::ParseError) -> Self {
        RepositoryError::Parser(err.to_string())
    }
}
