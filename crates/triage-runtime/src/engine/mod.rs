//! Traversal engine
//!
//! Drives sessions through registered trees one answer at a time, or in one
//! call for a pre-collected answer set (see `batch`).
//!
//! Every operation takes the caller's session by reference and returns a new
//! one, so a failed call never leaves a half-applied answer behind.

mod batch;
mod question;

#[cfg(test)]
mod tests;

pub use question::{Question, SubmitResult};

use crate::classifier::ClassifierRegistry;
use crate::error::{Result, RuntimeError};
use crate::evaluator::{is_visible, normalize_answer, route};
use crate::findings::FindingsProjector;
use crate::observability::{names, Metrics, MetricsCollector};
use crate::registry::TreeRegistry;
use std::sync::Arc;
use std::time::Instant;
use triage_core::{
    AnswerValue, Classification, Session, SessionStatus, SubjectProfile, Transition, Tree,
};

/// Where following a transition left the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Moved to `session.current_node_id`
    Advanced,
    /// Reached an outcome or a dead end
    Terminal,
}

/// Stepwise and batch traversal over a frozen tree registry
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    registry: Arc<TreeRegistry>,
    classifiers: Arc<ClassifierRegistry>,
    projector: Arc<FindingsProjector>,
    metrics: Arc<MetricsCollector>,
}

impl TraversalEngine {
    /// Create an engine over a registry, with no classifiers and the IMCI
    /// findings projector
    pub fn new(registry: impl Into<Arc<TreeRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            classifiers: Arc::new(ClassifierRegistry::new()),
            projector: Arc::new(FindingsProjector::imci()),
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    /// Set the classifiers used for `AUTO` transitions
    pub fn with_classifiers(mut self, classifiers: impl Into<Arc<ClassifierRegistry>>) -> Self {
        self.classifiers = classifiers.into();
        self
    }

    /// Set the findings projector
    pub fn with_projector(mut self, projector: impl Into<Arc<FindingsProjector>>) -> Self {
        self.projector = projector.into();
        self
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn registry(&self) -> &TreeRegistry {
        &self.registry
    }

    pub fn classifiers(&self) -> &ClassifierRegistry {
        &self.classifiers
    }

    /// Get metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Get a registered tree
    pub fn get_tree(&self, tree_id: &str) -> Result<Arc<Tree>> {
        self.registry.get(tree_id)
    }

    /// Add or replace a tree.
    ///
    /// The registry is copied on write: engines cloned earlier keep the trees
    /// they were created with.
    pub fn register_tree(&mut self, tree: Tree) -> Result<()> {
        Arc::make_mut(&mut self.registry).register(tree)
    }

    /// Start a session at the tree's start node
    pub fn start(&self, subject_reference: &str, tree_id: &str) -> Result<Session> {
        self.start_with_profile(&SubjectProfile::new(subject_reference), tree_id)
    }

    /// Start a session, recording the subject's age for age-dependent thresholds
    pub fn start_with_profile(&self, profile: &SubjectProfile, tree_id: &str) -> Result<Session> {
        let tree = self.registry.get(tree_id)?;
        let session = Session::new(&profile.subject_reference, &tree.id, &tree.start_node_id)
            .with_age_months(profile.age_months);

        self.metrics.counter(names::SESSIONS_STARTED).inc();
        tracing::info!(
            "Started session {} for subject '{}' on tree '{}'",
            session.id,
            session.subject_reference,
            tree.id
        );
        Ok(session)
    }

    /// Accept one answer and return the advanced session.
    ///
    /// `session` itself is never modified; on error nothing is recorded.
    pub fn submit_answer(
        &self,
        session: &Session,
        node_id: &str,
        answer: impl Into<AnswerValue>,
    ) -> Result<SubmitResult> {
        let started = Instant::now();
        let result = self.try_submit(session, node_id, answer.into());
        self.metrics
            .record_execution_time(names::SUBMIT_ANSWER, started.elapsed());

        match &result {
            Ok(submitted) => {
                self.metrics.counter(names::ANSWERS_ACCEPTED).inc();
                self.record_terminal(&submitted.session);
            }
            Err(e) => {
                self.metrics.counter(names::ANSWERS_REJECTED).inc();
                self.metrics.record_error(e.kind());
                tracing::debug!("Rejected answer for '{}' in session {}: {}", node_id, session.id, e);
            }
        }
        result
    }

    fn try_submit(&self, session: &Session, node_id: &str, answer: AnswerValue) -> Result<SubmitResult> {
        if session.is_terminal() {
            return Err(RuntimeError::FlowAlreadyCompleted {
                session_id: session.id.clone(),
                status: session.status.as_str().to_string(),
            });
        }

        let tree = self.registry.get(&session.tree_id)?;
        let node = tree
            .node(node_id)
            .ok_or_else(|| RuntimeError::QuestionNotFound {
                tree_id: tree.id.clone(),
                node_id: node_id.to_string(),
            })?;

        let value = normalize_answer(node, answer)?;
        let transition = route(node, &value)?;

        let mut next = session.clone();
        self.projector.project(&mut next.findings, node_id, &value);
        next.answers.insert(node_id.to_string(), value);
        next.touch();

        let next_question = match self.follow(&tree, &mut next, node_id, transition)? {
            Step::Advanced => tree
                .node(&next.current_node_id)
                .map(|node| Question::from_node(node, &next.answers)),
            Step::Terminal => None,
        };

        Ok(SubmitResult {
            session: next,
            next_question,
        })
    }

    /// Apply a matched transition: outcome first, then next node, else dead end
    fn follow(
        &self,
        tree: &Tree,
        session: &mut Session,
        node_id: &str,
        transition: &Transition,
    ) -> Result<Step> {
        if let Some(classification) = transition.classification() {
            let outcome_id = match classification {
                Classification::Deferred => self.classifiers.classify(&tree.id, &session.answers)?,
                Classification::Outcome(id) => id.to_string(),
            };
            self.finish(tree, session, outcome_id)?;
            return Ok(Step::Terminal);
        }

        if let Some(next_node_id) = transition.next_node() {
            session.current_node_id = next_node_id.to_string();
            return Ok(Step::Advanced);
        }

        tracing::warn!(
            "Node '{}' of tree '{}' is a dead end; completing session {} without an outcome",
            node_id,
            tree.id,
            session.id
        );
        session.status = SessionStatus::Completed;
        Ok(Step::Terminal)
    }

    /// Attach an outcome and set the terminal status
    fn finish(&self, tree: &Tree, session: &mut Session, outcome_id: String) -> Result<()> {
        let outcome = tree
            .outcome(&outcome_id)
            .ok_or_else(|| RuntimeError::OutcomeNotFound {
                tree_id: tree.id.clone(),
                outcome_id: outcome_id.clone(),
            })?;

        session.status = if outcome.is_emergency {
            SessionStatus::Emergency
        } else {
            SessionStatus::Completed
        };
        session.outcome = Some(outcome.clone());
        session.outcome_id = Some(outcome_id);
        Ok(())
    }

    fn record_terminal(&self, session: &Session) {
        match session.status {
            SessionStatus::InProgress => return,
            SessionStatus::Completed => self.metrics.counter(names::SESSIONS_COMPLETED).inc(),
            SessionStatus::Emergency => self.metrics.counter(names::EMERGENCIES).inc(),
        }
        tracing::info!(
            "Session {} on tree '{}' finished as {} with outcome {}",
            session.id,
            session.tree_id,
            session.status.as_str(),
            session.outcome_id.as_deref().unwrap_or("<none>")
        );
    }

    /// The question the session is waiting on; `None` once terminal
    pub fn current_question(&self, session: &Session) -> Result<Option<Question>> {
        if session.is_terminal() {
            return Ok(None);
        }

        let tree = self.registry.get(&session.tree_id)?;
        let node = tree
            .node(&session.current_node_id)
            .ok_or_else(|| RuntimeError::QuestionNotFound {
                tree_id: tree.id.clone(),
                node_id: session.current_node_id.clone(),
            })?;
        Ok(Some(Question::from_node(node, &session.answers)))
    }

    /// Every node of the session's tree whose visibility predicate holds, in
    /// tree order
    pub fn visible_questions(&self, session: &Session) -> Result<Vec<Question>> {
        let tree = self.registry.get(&session.tree_id)?;
        Ok(tree
            .nodes
            .iter()
            .filter(|node| is_visible(node, &session.answers))
            .map(|node| Question::from_node(node, &session.answers))
            .collect())
    }
}
