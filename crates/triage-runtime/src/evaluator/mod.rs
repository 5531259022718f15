//! Condition evaluation
//!
//! Pure functions that turn a submitted answer into a routing decision:
//! - `normalize_answer` coerces the answer to the node's type
//! - `route` picks the transition (exact key lookup or ordered predicate rules)
//! - `rule_holds` evaluates one predicate rule
//! - `is_visible` evaluates a node's visibility predicate

mod normalize;
mod predicate;
mod routing;

pub use normalize::normalize_answer;
pub use predicate::rule_holds;
pub use routing::route;

use triage_core::{Answers, Node, VisibilityPredicate};

/// Whether a node should be shown given the answers so far.
///
/// Nodes without a predicate are always visible.
pub fn is_visible(node: &Node, answers: &Answers) -> bool {
    match node.visibility_predicate.as_deref() {
        None => true,
        Some(predicate) => match VisibilityPredicate::parse(predicate) {
            Ok(parsed) => parsed.holds(answers),
            Err(e) => {
                tracing::warn!("Ignoring visibility predicate of node '{}': {}", node.id, e);
                true
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{AnswerValue, NodeType};

    #[test]
    fn test_visibility() {
        let node = Node::new("gasping", "Gasping?", NodeType::Boolean).visible_when("not_breathing.no");
        let mut answers = Answers::new();
        assert!(!is_visible(&node, &answers));

        answers.insert("not_breathing".to_string(), AnswerValue::from("no"));
        assert!(is_visible(&node, &answers));

        let plain = Node::new("q", "Q", NodeType::Boolean);
        assert!(is_visible(&plain, &Answers::new()));
    }
}
