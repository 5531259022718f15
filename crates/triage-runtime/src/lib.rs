//! Triage Runtime - Execution engine for triage decision trees
//!
//! This crate interprets registered trees against operator answers:
//! stepwise traversal, batch evaluation, deferred classification and the
//! clinical findings projection. Everything here is synchronous and performs
//! no I/O; persistence belongs to the caller.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod findings;
pub mod observability;
pub mod registry;

// Re-export main types
pub use classifier::{Classifier, ClassifierRegistry};
pub use engine::{Question, SubmitResult, TraversalEngine};
pub use error::{Result, RuntimeError};
pub use evaluator::{is_visible, normalize_answer, route, rule_holds};
pub use findings::{
    completed_units, fast_breathing_threshold, is_fast_breathing, FindingRule, FindingsProjector,
};
pub use observability::{Counter, Histogram, Metrics, MetricsCollector, MetricsSnapshot};
pub use registry::TreeRegistry;
