//! TriageEngine - Main API for running assessments

use crate::config::EngineConfig;
use crate::error::Result;
use std::sync::Arc;
use triage_core::{AnswerValue, Answers, Session, SubjectProfile, Tree};
use triage_runtime::{
    ClassifierRegistry, MetricsCollector, Question, SubmitResult, TraversalEngine, TreeRegistry,
};

/// Facade over the traversal engine with its configuration
#[derive(Debug, Clone)]
pub struct TriageEngine {
    runtime: TraversalEngine,
    config: EngineConfig,
}

impl TriageEngine {
    /// Create an engine over an already filled registry
    pub fn new(registry: TreeRegistry, classifiers: ClassifierRegistry, config: EngineConfig) -> Self {
        let runtime = TraversalEngine::new(registry).with_classifiers(classifiers);
        tracing::info!(
            "Triage engine ready with {} trees: {:?}",
            runtime.registry().len(),
            runtime.registry().tree_ids()
        );
        Self { runtime, config }
    }

    /// Register a tree after construction.
    ///
    /// Engines cloned before the call do not see the new tree.
    pub fn register_tree(&mut self, tree: Tree) -> Result<()> {
        let tree_id = tree.id.clone();
        self.runtime.register_tree(tree)?;
        tracing::info!("Registered tree '{}'", tree_id);
        Ok(())
    }

    /// Get a registered tree
    pub fn get_tree(&self, tree_id: &str) -> Result<Arc<Tree>> {
        Ok(self.runtime.get_tree(tree_id)?)
    }

    /// Registered tree ids, sorted
    pub fn tree_ids(&self) -> Vec<String> {
        self.runtime.registry().tree_ids()
    }

    /// Start a session at the tree's first question
    pub fn start(&self, subject_reference: &str, tree_id: &str) -> Result<Session> {
        Ok(self.runtime.start(subject_reference, tree_id)?)
    }

    /// Start a session with the subject's age known
    pub fn start_with_profile(&self, profile: &SubjectProfile, tree_id: &str) -> Result<Session> {
        Ok(self.runtime.start_with_profile(profile, tree_id)?)
    }

    /// Submit one answer; `session` is left untouched
    pub fn submit_answer(
        &self,
        session: &Session,
        node_id: &str,
        value: impl Into<AnswerValue>,
    ) -> Result<SubmitResult> {
        Ok(self.runtime.submit_answer(session, node_id, value)?)
    }

    /// Submit an answer received as JSON
    pub fn submit_json(
        &self,
        session: &Session,
        node_id: &str,
        value: &serde_json::Value,
    ) -> Result<SubmitResult> {
        let answer = AnswerValue::from_json(value)?;
        self.submit_answer(session, node_id, answer)
    }

    /// The question the session is waiting on
    pub fn current_question(&self, session: &Session) -> Result<Option<Question>> {
        Ok(self.runtime.current_question(session)?)
    }

    /// Questions whose visibility predicate holds for the session's answers
    pub fn visible_questions(&self, session: &Session) -> Result<Vec<Question>> {
        Ok(self.runtime.visible_questions(session)?)
    }

    /// Evaluate a complete answer set
    pub fn process_batch(
        &self,
        subject_reference: &str,
        tree_id: &str,
        answers: Answers,
    ) -> Result<Session> {
        Ok(self.runtime.process_batch(subject_reference, tree_id, answers)?)
    }

    /// Evaluate a complete answer set with the subject's age known
    pub fn process_batch_with_profile(
        &self,
        profile: &SubjectProfile,
        tree_id: &str,
        answers: Answers,
    ) -> Result<Session> {
        Ok(self
            .runtime
            .process_batch_with_profile(profile, tree_id, answers)?)
    }

    /// Metrics collector, when metrics are enabled
    pub fn metrics(&self) -> Option<Arc<MetricsCollector>> {
        self.config.enable_metrics.then(|| self.runtime.metrics())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying traversal engine
    pub fn runtime(&self) -> &TraversalEngine {
        &self.runtime
    }
}
