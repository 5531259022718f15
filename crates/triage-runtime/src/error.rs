//! Runtime error types

use thiserror::Error;
use triage_core::CoreError;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// No tree registered under this id
    #[error("Tree not found: {0}")]
    TreeNotFound(String),

    /// Node id does not exist in the session's tree
    #[error("Question '{node_id}' not found in tree '{tree_id}'")]
    QuestionNotFound { tree_id: String, node_id: String },

    /// Answer has the wrong shape, is out of bounds, or matches no transition key
    #[error("Invalid answer for '{node_id}': {message}")]
    InvalidAnswer { node_id: String, message: String },

    /// Predicate rules exist but none holds
    #[error("No clinically appropriate rule found for the given findings (node '{node_id}')")]
    NoMatchingRule { node_id: String },

    /// Mutation attempted on a terminal session
    #[error("Assessment flow already completed: session '{session_id}' is {status}")]
    FlowAlreadyCompleted { session_id: String, status: String },

    /// A transition deferred to a classifier but none is registered for the tree
    #[error("No classifier registered for tree: {0}")]
    ClassifierNotFound(String),

    /// A classification id that is not an outcome of the tree
    #[error("Outcome '{outcome_id}' not found in tree '{tree_id}'")]
    OutcomeNotFound { tree_id: String, outcome_id: String },

    /// Tree rejected at registration
    #[error("Invalid tree: {0}")]
    InvalidTree(#[source] CoreError),
}

impl RuntimeError {
    pub(crate) fn invalid_answer(node_id: &str, message: impl Into<String>) -> Self {
        RuntimeError::InvalidAnswer {
            node_id: node_id.to_string(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::TreeNotFound(_) => "tree_not_found",
            RuntimeError::QuestionNotFound { .. } => "question_not_found",
            RuntimeError::InvalidAnswer { .. } => "invalid_answer",
            RuntimeError::NoMatchingRule { .. } => "no_matching_rule",
            RuntimeError::FlowAlreadyCompleted { .. } => "flow_already_completed",
            RuntimeError::ClassifierNotFound(_) => "classifier_not_found",
            RuntimeError::OutcomeNotFound { .. } => "outcome_not_found",
            RuntimeError::InvalidTree(_) => "invalid_tree",
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
