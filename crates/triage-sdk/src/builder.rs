//! Builder pattern for TriageEngine

use crate::catalog;
use crate::config::{EngineConfig, StoreConfig};
use crate::engine::TriageEngine;
use crate::error::Result;
use std::path::PathBuf;
use triage_core::{Answers, Tree};
use triage_parser::TreeParser;
use triage_repository::{FileSystemTreeRepository, TreeRepository};
use triage_runtime::{Classifier, ClassifierRegistry, TreeRegistry};

/// Builder for TriageEngine
///
/// # Example
///
/// ```rust,ignore
/// use triage_sdk::TriageEngineBuilder;
///
/// // Built-in catalogue plus a directory of site-specific trees
/// let engine = TriageEngineBuilder::new()
///     .add_tree_dir("trees")
///     .build()
///     .await?;
///
/// // Only the given document (for testing)
/// let engine = TriageEngineBuilder::new()
///     .include_builtin_catalog(false)
///     .add_tree_content("fever", yaml_content)
///     .build()
///     .await?;
/// ```
pub struct TriageEngineBuilder {
    config: EngineConfig,
    trees: Vec<Tree>,
    classifiers: ClassifierRegistry,
}

impl TriageEngineBuilder {
    /// Create a new builder with the IMCI classifiers
    pub fn new() -> Self {
        Self::from_config(EngineConfig::new())
    }

    /// Start from a loaded configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            classifiers: ClassifierRegistry::imci(),
        }
    }

    /// Add a directory scanned recursively for tree documents
    pub fn add_tree_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tree_dirs.push(path.into());
        self
    }

    /// Add a tree document file
    pub fn add_tree_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tree_files.push(path.into());
        self
    }

    /// Add tree document content directly (alternative to file path)
    pub fn add_tree_content(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.config.tree_contents.push((name.into(), content.into()));
        self
    }

    /// Add a tree built in code
    pub fn add_tree(mut self, tree: Tree) -> Self {
        self.trees.push(tree);
        self
    }

    /// Set the classifier for a tree's `AUTO` transitions
    pub fn with_classifier(
        mut self,
        tree_id: impl Into<String>,
        classifier: impl Classifier + 'static,
    ) -> Self {
        self.classifiers.register(tree_id, classifier);
        self
    }

    /// Use a closure as a tree's classifier
    pub fn with_classifier_fn<F>(self, tree_id: impl Into<String>, classify: F) -> Self
    where
        F: Fn(&Answers) -> String + Send + Sync + 'static,
    {
        self.with_classifier(tree_id, classify)
    }

    pub fn include_builtin_catalog(mut self, include: bool) -> Self {
        self.config.include_builtin_catalog = include;
        self
    }

    pub fn with_young_infant_tree(mut self, tree_id: impl Into<String>) -> Self {
        self.config.young_infant_tree = tree_id.into();
        self
    }

    pub fn with_child_tree(mut self, tree_id: impl Into<String>) -> Self {
        self.config.child_tree = tree_id.into();
        self
    }

    pub fn with_session_store(mut self, store: StoreConfig) -> Self {
        self.config.session_store = store;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Load every configured source and build the engine.
    ///
    /// Documents found by scanning a directory are skipped with a warning
    /// when they do not parse; explicitly named files and contents must parse.
    /// Any tree that fails structural validation fails the build.
    pub async fn build(self) -> Result<TriageEngine> {
        let mut registry = TreeRegistry::new();

        if self.config.include_builtin_catalog {
            registry.register_all(catalog::builtin_trees()?)?;
        }

        for dir in &self.config.tree_dirs {
            let repository = FileSystemTreeRepository::new(dir)?;
            for (name, content) in repository.load_all().await? {
                match TreeParser::parse_document(&content) {
                    Ok(trees) => registry.register_all(trees)?,
                    Err(e) => tracing::warn!(
                        "Skipping tree document '{}' in {}: {}",
                        name,
                        dir.display(),
                        e
                    ),
                }
            }
        }

        for path in &self.config.tree_files {
            let content = tokio::fs::read_to_string(path).await?;
            registry.register_all(TreeParser::parse_document(&content)?)?;
            tracing::debug!("Loaded tree document {}", path.display());
        }

        for (name, content) in &self.config.tree_contents {
            registry.register_all(TreeParser::parse_document(content)?)?;
            tracing::debug!("Loaded tree content '{}'", name);
        }

        registry.register_all(self.trees)?;

        for tree_id in [&self.config.young_infant_tree, &self.config.child_tree] {
            if !registry.contains(tree_id) {
                tracing::warn!("Default tree '{}' is not registered", tree_id);
            }
        }

        Ok(TriageEngine::new(registry, self.classifiers, self.config))
    }
}

impl Default for TriageEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_with_catalog() {
        let engine = TriageEngineBuilder::new().build().await.unwrap();

        assert_eq!(engine.tree_ids().len(), 5);
        assert!(engine.get_tree("birth_asphyxia_check").is_ok());
        assert!(engine.metrics().is_some());
    }

    #[tokio::test]
    async fn test_builder_without_catalog() {
        let engine = TriageEngineBuilder::new()
            .include_builtin_catalog(false)
            .add_tree(crate::catalog::birth_asphyxia::tree())
            .enable_metrics(false)
            .build()
            .await
            .unwrap();

        assert_eq!(engine.tree_ids(), vec!["birth_asphyxia_check".to_string()]);
        assert!(engine.metrics().is_none());
    }

    #[tokio::test]
    async fn test_builder_rejects_bad_content() {
        let result = TriageEngineBuilder::new()
            .include_builtin_catalog(false)
            .add_tree_content("broken", "tree:\n  id: broken\n")
            .build()
            .await;

        assert!(matches!(result, Err(crate::SdkError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_builder_missing_file() {
        let result = TriageEngineBuilder::new()
            .add_tree_file("/nonexistent/tree.yaml")
            .build()
            .await;

        assert!(matches!(result, Err(crate::SdkError::IoError(_))));
    }

    #[test]
    fn test_builder_options() {
        let builder = TriageEngineBuilder::new()
            .add_tree_dir("trees")
            .add_tree_file("a.yaml")
            .add_tree_file("b.json")
            .with_child_tree("general_danger_signs")
            .enable_metrics(false);

        assert_eq!(builder.config.tree_dirs.len(), 1);
        assert_eq!(builder.config.tree_files.len(), 2);
        assert_eq!(builder.config.child_tree, "general_danger_signs");
        assert!(!builder.config.enable_metrics);
    }
}
