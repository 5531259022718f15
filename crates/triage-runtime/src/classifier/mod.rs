//! Deferred classification
//!
//! A transition whose `classification_id` is `AUTO` hands the whole answer set
//! to the classifier registered for the tree. Classifiers are pure decision
//! tables: the same answers always give the same outcome id, whichever way
//! they were collected.

pub mod imci;

use crate::error::{Result, RuntimeError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use triage_core::Answers;

/// Tree-specific outcome selection over accumulated answers
pub trait Classifier: Send + Sync {
    /// Pick an outcome id
    fn classify(&self, answers: &Answers) -> String;
}

impl<F> Classifier for F
where
    F: Fn(&Answers) -> String + Send + Sync,
{
    fn classify(&self, answers: &Answers) -> String {
        self(answers)
    }
}

/// Classifiers keyed by tree id
#[derive(Clone, Default)]
pub struct ClassifierRegistry {
    classifiers: HashMap<String, Arc<dyn Classifier>>,
}

impl ClassifierRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in IMCI decision tables
    pub fn imci() -> Self {
        let mut registry = Self::new();
        registry.register(imci::MALNUTRITION_TREE, imci::classify_malnutrition);
        registry.register(imci::COUGH_TREE, imci::classify_cough);
        registry.register(imci::YOUNG_INFANT_JAUNDICE_TREE, imci::classify_young_infant_jaundice);
        registry
    }

    /// Add or replace the classifier of a tree
    pub fn register(&mut self, tree_id: impl Into<String>, classifier: impl Classifier + 'static) {
        self.classifiers.insert(tree_id.into(), Arc::new(classifier));
    }

    pub fn get(&self, tree_id: &str) -> Option<Arc<dyn Classifier>> {
        self.classifiers.get(tree_id).cloned()
    }

    pub fn contains(&self, tree_id: &str) -> bool {
        self.classifiers.contains_key(tree_id)
    }

    /// Run the classifier of a tree
    pub fn classify(&self, tree_id: &str, answers: &Answers) -> Result<String> {
        let classifier = self
            .classifiers
            .get(tree_id)
            .ok_or_else(|| RuntimeError::ClassifierNotFound(tree_id.to_string()))?;

        let outcome_id = classifier.classify(answers);
        tracing::debug!("Classifier for tree '{}' selected '{}'", tree_id, outcome_id);
        Ok(outcome_id)
    }

    /// Registered tree ids, sorted
    pub fn tree_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.classifiers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("trees", &self.tree_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{AnswerValue, AnswersExt};

    #[test]
    fn test_closure_classifier() {
        let mut registry = ClassifierRegistry::new();
        registry.register("fever", |answers: &Answers| {
            if answers.number("temperature").map_or(false, |t| t >= 37.5) {
                "FEVER".to_string()
            } else {
                "NO_FEVER".to_string()
            }
        });

        let mut answers = Answers::new();
        answers.insert("temperature".to_string(), AnswerValue::Number(38.2));

        assert!(registry.contains("fever"));
        assert_eq!(registry.classify("fever", &answers).unwrap(), "FEVER");
    }

    #[test]
    fn test_missing_classifier() {
        let registry = ClassifierRegistry::new();
        assert_eq!(
            registry.classify("cough", &Answers::new()).unwrap_err(),
            RuntimeError::ClassifierNotFound("cough".to_string())
        );
    }

    #[test]
    fn test_imci_registry() {
        let registry = ClassifierRegistry::imci();
        assert_eq!(
            registry.tree_ids(),
            vec![
                imci::COUGH_TREE.to_string(),
                imci::MALNUTRITION_TREE.to_string(),
                imci::YOUNG_INFANT_JAUNDICE_TREE.to_string(),
            ]
        );
    }
}
