//! Error types for Triage Core

use crate::tree::TreeIssue;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid tree '{tree_id}': {}", format_issues(.issues))]
    InvalidTree {
        tree_id: String,
        issues: Vec<TreeIssue>,
    },

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("Invalid visibility predicate '{predicate}': {message}")]
    InvalidPredicate { predicate: String, message: String },
}

fn format_issues(issues: &[TreeIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, CoreError>;
