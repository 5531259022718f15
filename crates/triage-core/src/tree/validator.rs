//! Structural validation of trees
//!
//! Checks the referential invariants a tree must satisfy before registration.
//! Clinical content is never judged, and cycles are not issues.

use super::node::{Classification, NodeRouting, VALUE_BASED_KEY};
use super::Tree;
use crate::condition::VisibilityPredicate;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A structural problem found in a tree
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum TreeIssue {
    #[error("start node '{start_node_id}' is not defined")]
    MissingStartNode { start_node_id: String },

    #[error("node '{node_id}' is defined more than once")]
    DuplicateNode { node_id: String },

    #[error("node '{node_id}' routes to unknown node '{target}'")]
    UnknownNextNode { node_id: String, target: String },

    #[error("node '{node_id}' routes to unknown outcome '{classification_id}'")]
    UnknownOutcome {
        node_id: String,
        classification_id: String,
    },

    #[error("numeric node '{node_id}' declares transition key '{key}' (only 'value_based' is allowed)")]
    InvalidNumericKey { node_id: String, key: String },

    #[error("node '{node_id}' has an invalid visibility predicate: {message}")]
    InvalidVisibility { node_id: String, message: String },
}

impl Tree {
    /// Collect every structural issue in the tree
    pub fn validate(&self) -> Vec<TreeIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                issues.push(TreeIssue::DuplicateNode {
                    node_id: node.id.clone(),
                });
            }
        }

        if !seen.contains(self.start_node_id.as_str()) {
            issues.push(TreeIssue::MissingStartNode {
                start_node_id: self.start_node_id.clone(),
            });
        }

        for node in &self.nodes {
            if let NodeRouting::Transitions(map) = &node.routing {
                if node.node_type.is_value_based() {
                    for key in map.keys().filter(|key| key.as_str() != VALUE_BASED_KEY) {
                        issues.push(TreeIssue::InvalidNumericKey {
                            node_id: node.id.clone(),
                            key: key.clone(),
                        });
                    }
                }
            }

            for transition in node.routing.transitions() {
                if let Some(target) = transition.next_node() {
                    if !seen.contains(target) {
                        issues.push(TreeIssue::UnknownNextNode {
                            node_id: node.id.clone(),
                            target: target.to_string(),
                        });
                    }
                }
                if let Some(Classification::Outcome(id)) = transition.classification() {
                    if !self.outcomes.contains_key(id) {
                        issues.push(TreeIssue::UnknownOutcome {
                            node_id: node.id.clone(),
                            classification_id: id.to_string(),
                        });
                    }
                }
            }

            if let Some(predicate) = &node.visibility_predicate {
                match VisibilityPredicate::parse(predicate) {
                    Ok(parsed) => {
                        for clause in parsed.clauses() {
                            if !seen.contains(clause.node_id.as_str()) {
                                issues.push(TreeIssue::InvalidVisibility {
                                    node_id: node.id.clone(),
                                    message: format!("unknown node '{}'", clause.node_id),
                                });
                            }
                        }
                    }
                    Err(e) => issues.push(TreeIssue::InvalidVisibility {
                        node_id: node.id.clone(),
                        message: e.to_string(),
                    }),
                }
            }
        }

        issues
    }

    /// Validate and fail with every issue found
    pub fn ensure_valid(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidTree {
                tree_id: self.id.clone(),
                issues,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeType, Outcome, SeverityColor, Transition};

    fn base() -> Tree {
        Tree::new("t", "Test", "a").with_outcome("DONE", Outcome::new("Done", SeverityColor::Green))
    }

    #[test]
    fn test_valid_tree_with_cycle() {
        let tree = base()
            .with_node(
                Node::new("a", "Calm?", NodeType::Boolean)
                    .on("no", Transition::to_node("a"))
                    .on("yes", Transition::to_node("b")),
            )
            .with_node(
                Node::new("b", "Rate", NodeType::Numeric).on_value(Transition::to_outcome("DONE")),
            );

        assert!(tree.validate().is_empty());
        assert!(tree.ensure_valid().is_ok());
    }

    #[test]
    fn test_missing_start_and_dangling_references() {
        let tree = Tree::new("t", "Test", "start")
            .with_node(
                Node::new("a", "Q", NodeType::Boolean)
                    .on("yes", Transition::to_node("ghost"))
                    .on("no", Transition::to_outcome("NOPE")),
            );

        let issues = tree.validate();
        assert!(issues.contains(&TreeIssue::MissingStartNode {
            start_node_id: "start".to_string()
        }));
        assert!(issues.contains(&TreeIssue::UnknownNextNode {
            node_id: "a".to_string(),
            target: "ghost".to_string()
        }));
        assert!(issues.contains(&TreeIssue::UnknownOutcome {
            node_id: "a".to_string(),
            classification_id: "NOPE".to_string()
        }));
    }

    #[test]
    fn test_auto_classification_is_not_an_unknown_outcome() {
        let tree = base().with_node(
            Node::new("a", "Q", NodeType::Boolean).on("yes", Transition::deferred()),
        );
        assert!(tree.validate().is_empty());
    }

    #[test]
    fn test_duplicate_and_numeric_key() {
        let tree = base()
            .with_node(Node::new("a", "Rate", NodeType::Numeric).on("55", Transition::to_outcome("DONE")))
            .with_node(Node::new("a", "Again", NodeType::Boolean));

        let issues = tree.validate();
        assert!(issues.contains(&TreeIssue::DuplicateNode {
            node_id: "a".to_string()
        }));
        assert!(issues.contains(&TreeIssue::InvalidNumericKey {
            node_id: "a".to_string(),
            key: "55".to_string()
        }));
    }

    #[test]
    fn test_visibility_references_checked() {
        let tree = base()
            .with_node(Node::new("a", "Q", NodeType::Boolean).on("yes", Transition::to_node("b")))
            .with_node(
                Node::new("b", "Q2", NodeType::Boolean)
                    .visible_when("a.yes AND ghost.no")
                    .on("yes", Transition::to_outcome("DONE")),
            );

        let issues = tree.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(&issues[0], TreeIssue::InvalidVisibility { node_id, .. } if node_id == "b"));

        match tree.ensure_valid() {
            Err(CoreError::InvalidTree { tree_id, issues }) => {
                assert_eq!(tree_id, "t");
                assert_eq!(issues.len(), 1);
            }
            other => panic!("Expected InvalidTree, got {:?}", other),
        }
    }
}
