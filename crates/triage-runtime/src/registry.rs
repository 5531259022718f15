//! Tree registry
//!
//! Holds every registered tree by id. The registry is filled at startup and
//! then shared behind an `Arc`; reads need no locking.

use crate::error::{Result, RuntimeError};
use std::collections::HashMap;
use std::sync::Arc;
use triage_core::Tree;

/// In-memory catalogue of trees
#[derive(Debug, Clone, Default)]
pub struct TreeRegistry {
    trees: HashMap<String, Arc<Tree>>,
}

impl TreeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a tree, replacing any tree with the same id
    pub fn register(&mut self, tree: Tree) -> Result<()> {
        tree.ensure_valid().map_err(RuntimeError::InvalidTree)?;

        let tree_id = tree.id.clone();
        if self.trees.insert(tree_id.clone(), Arc::new(tree)).is_some() {
            tracing::warn!("Replaced previously registered tree '{}'", tree_id);
        }
        Ok(())
    }

    /// Register several trees, stopping at the first invalid one
    pub fn register_all(&mut self, trees: impl IntoIterator<Item = Tree>) -> Result<()> {
        for tree in trees {
            let tree_id = tree.id.clone();
            self.register(tree)?;
            tracing::debug!("Registered tree '{}'", tree_id);
        }
        Ok(())
    }

    /// Get a tree by id
    pub fn get(&self, tree_id: &str) -> Result<Arc<Tree>> {
        self.trees
            .get(tree_id)
            .cloned()
            .ok_or_else(|| RuntimeError::TreeNotFound(tree_id.to_string()))
    }

    pub fn contains(&self, tree_id: &str) -> bool {
        self.trees.contains_key(tree_id)
    }

    /// Registered tree ids, sorted
    pub fn tree_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.trees.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Node, NodeType, Outcome, SeverityColor, Transition};

    fn tree(id: &str, title: &str) -> Tree {
        Tree::new(id, title, "q")
            .with_node(Node::new("q", "Q", NodeType::Boolean).on("yes", Transition::to_outcome("DONE")))
            .with_outcome("DONE", Outcome::new("Done", SeverityColor::Green))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TreeRegistry::new();
        assert!(registry.is_empty());

        registry.register(tree("b", "B")).unwrap();
        registry.register(tree("a", "A")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert_eq!(registry.tree_ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.get("a").unwrap().title, "A");
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = TreeRegistry::new();
        registry.register(tree("a", "First")).unwrap();
        registry.register(tree("a", "Second")).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().title, "Second");
    }

    #[test]
    fn test_get_missing_tree() {
        let registry = TreeRegistry::new();
        assert_eq!(
            registry.get("nope").unwrap_err(),
            RuntimeError::TreeNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_register_rejects_invalid_tree() {
        let mut registry = TreeRegistry::new();
        let broken = Tree::new("broken", "Broken", "missing");

        let result = registry.register(broken);
        assert!(matches!(result, Err(RuntimeError::InvalidTree(_))));
        assert!(!registry.contains("broken"));
    }
}
