//! Question presentation view

use crate::evaluator::is_visible;
use serde::{Deserialize, Serialize};
use triage_core::{Answers, Node, NodeType, NumericBounds, Session};

/// What the operator is asked next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub node_id: String,
    pub prompt: String,
    pub node_type: NodeType,
    pub required: bool,
    pub depth: u32,

    /// Choices to offer; empty for numeric and computed nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_bounds: Option<NumericBounds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Whether the visibility predicate holds for the current answers
    pub visible: bool,
}

impl Question {
    /// Build the view of a node against the answers given so far
    pub fn from_node(node: &Node, answers: &Answers) -> Self {
        Self {
            node_id: node.id.clone(),
            prompt: node.prompt.clone(),
            node_type: node.node_type,
            required: node.required,
            depth: node.depth,
            options: node.choices(),
            numeric_bounds: node.numeric_bounds,
            help: node.help.clone(),
            visible: is_visible(node, answers),
        }
    }
}

/// Result of accepting one answer
#[derive(Debug, Clone)]
pub struct SubmitResult {
    /// The updated session
    pub session: Session,
    /// Next question, or `None` once the session is terminal
    pub next_question: Option<Question>,
}

impl SubmitResult {
    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }
}
