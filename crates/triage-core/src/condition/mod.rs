//! Visibility Predicate Module
//!
//! Decides whether a question should be shown to the operator, based on
//! answers already given. Routing never depends on visibility.
//!
//! # Syntax
//!
//! A predicate is a conjunction of `node_id.expected_answer` clauses:
//! ```yaml
//! visibility_predicate: cough.yes
//! visibility_predicate: cough.yes AND wheezing.no
//! ```
//!
//! The node id is everything before the first `.`; the expected answer is
//! everything after it (so answers may themselves contain dots, e.g. `temp.37.5`).
//!
//! A clause holds when the stored answer renders to the expected text
//! (booleans as `yes`/`no`, numbers in shortest form) or, for multi-choice
//! answers, when the selection contains it. A clause over an unanswered node
//! never holds.

mod visibility;

pub use visibility::{VisibilityClause, VisibilityPredicate};
