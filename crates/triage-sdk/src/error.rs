//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] triage_parser::ParseError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] triage_runtime::RuntimeError),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(#[from] triage_repository::RepositoryError),

    /// No tree configured for the subject's age category
    #[error("No assessment tree configured for subject '{0}'")]
    NoTreeForSubject(String),

    /// No stored session for the subject
    #[error("No session found for subject '{0}'")]
    SessionNotFound(String),

    /// Answer could not be converted from JSON
    #[error("Invalid answer: {0}")]
    InvalidAnswer(#[from] triage_core::CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

impl SdkError {
    /// The runtime error behind this one, if any
    pub fn runtime(&self) -> Option<&triage_runtime::RuntimeError> {
        match self {
            SdkError::RuntimeError(e) => Some(e),
            _ => None,
        }
    }
}
