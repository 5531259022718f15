//! Decision tree model
//!
//! A `Tree` is an explicit directed graph: nodes route to other nodes or to
//! outcomes through transitions. Cycles are legal (a "wait until calm" gate may
//! re-ask itself), so nothing in the model assumes a hierarchy.

mod node;
mod outcome;
mod validator;

pub use node::{
    Classification, Node, NodeRouting, NodeType, NumericBounds, Rule, RuleKind, Thresholds,
    Transition, AUTO_CLASSIFICATION, VALUE_BASED_KEY,
};
pub use outcome::{Outcome, SeverityColor};
pub use validator::TreeIssue;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A clinical decision protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Unique tree identifier
    pub id: String,

    pub title: String,

    /// Operator-facing instructions shown before the first question
    #[serde(default)]
    pub instructions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub start_node_id: String,

    /// Nodes in declaration order
    pub nodes: Vec<Node>,

    /// Outcome id -> outcome
    #[serde(default)]
    pub outcomes: HashMap<String, Outcome>,
}

impl Tree {
    /// Create an empty tree
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            instructions: String::new(),
            version: None,
            start_node_id: start_node_id.into(),
            nodes: Vec::new(),
            outcomes: HashMap::new(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a node
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add or replace an outcome
    pub fn with_outcome(mut self, id: impl Into<String>, outcome: Outcome) -> Self {
        self.outcomes.insert(id.into(), outcome);
        self
    }

    /// Look up a node by id
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == node_id)
    }

    /// Look up an outcome by id
    pub fn outcome(&self, outcome_id: &str) -> Option<&Outcome> {
        self.outcomes.get(outcome_id)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.node(&self.start_node_id)
    }

    /// Whether any transition defers to a classifier
    pub fn has_deferred_classification(&self) -> bool {
        self.nodes.iter().any(|node| {
            node.routing
                .transitions()
                .iter()
                .any(|t| t.classification() == Some(Classification::Deferred))
        })
    }
}
