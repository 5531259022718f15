//! Parser error types

use thiserror::Error;
use triage_core::CoreError;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Document parsed but the tree breaks a structural invariant
    #[error("Invalid tree: {0}")]
    InvalidTree(#[from] CoreError),

    /// Generic parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
