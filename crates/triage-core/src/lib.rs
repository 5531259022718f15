//! Triage Core - Core types and definitions for the triage decision tree engine
//!
//! This crate provides the fundamental types used across the triage ecosystem:
//! - Tree model (nodes, transitions, predicate rules, outcomes)
//! - Answer values and assessment sessions
//! - The structured clinical findings record
//! - Visibility predicate parsing
//! - Error types

pub mod condition;
pub mod error;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use condition::VisibilityPredicate;
pub use error::CoreError;
pub use tree::{
    Classification, Node, NodeRouting, NodeType, NumericBounds, Outcome, Rule, RuleKind,
    SeverityColor, Thresholds, Transition, Tree, TreeIssue, AUTO_CLASSIFICATION, VALUE_BASED_KEY,
};
pub use types::{
    AgeCategory, AnswerValue, Answers, AnswersExt, ClinicalFindings, Session, SessionStatus,
    SubjectProfile,
};
