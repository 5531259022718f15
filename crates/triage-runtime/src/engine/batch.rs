//! Batch evaluation of pre-collected answer sets

use super::{Step, TraversalEngine};
use crate::error::{Result, RuntimeError};
use crate::evaluator::{normalize_answer, route};
use crate::observability::{names, Metrics};
use std::collections::HashSet;
use triage_core::{Answers, Session, SubjectProfile, Tree};

impl TraversalEngine {
    /// Evaluate a complete answer set in one call.
    ///
    /// With a classifier registered for the tree, the classifier decides the
    /// outcome exactly as an `AUTO` transition would, and the session is left at
    /// the last node in tree order that has an answer. Otherwise the answers are
    /// replayed from the start node along the tree's transitions until an
    /// outcome, a dead end, an unanswered node or a revisited node; the last two
    /// leave the session `in_progress` at that node.
    pub fn process_batch(
        &self,
        subject_reference: &str,
        tree_id: &str,
        answers: Answers,
    ) -> Result<Session> {
        self.process_batch_with_profile(&SubjectProfile::new(subject_reference), tree_id, answers)
    }

    /// Batch evaluation with the subject's age available to thresholds
    pub fn process_batch_with_profile(
        &self,
        profile: &SubjectProfile,
        tree_id: &str,
        answers: Answers,
    ) -> Result<Session> {
        self.metrics.counter(names::BATCH_EVALUATIONS).inc();

        let result = self.evaluate_batch(profile, tree_id, answers);
        match &result {
            Ok(session) => self.record_terminal(session),
            Err(e) => {
                self.metrics.record_error(e.kind());
                tracing::debug!("Batch evaluation on tree '{}' failed: {}", tree_id, e);
            }
        }
        result
    }

    fn evaluate_batch(
        &self,
        profile: &SubjectProfile,
        tree_id: &str,
        answers: Answers,
    ) -> Result<Session> {
        let tree = self.registry.get(tree_id)?;
        let mut session = Session::new(&profile.subject_reference, &tree.id, &tree.start_node_id)
            .with_age_months(profile.age_months);

        session.answers = normalize_all(&tree, answers)?;
        self.projector
            .project_all(&mut session.findings, &tree, &session.answers);

        if self.classifiers.contains(&tree.id) {
            let outcome_id = self.classifiers.classify(&tree.id, &session.answers)?;
            if let Some(last) = last_answered(&tree, &session.answers) {
                session.current_node_id = last.to_string();
            }
            self.finish(&tree, &mut session, outcome_id)?;
        } else {
            self.replay(&tree, &mut session)?;
        }

        tracing::debug!(
            "Batch evaluation of {} answers on tree '{}' ended {}",
            session.answers.len(),
            tree.id,
            session.status.as_str()
        );
        Ok(session)
    }

    /// Follow stored answers from the session's current node
    fn replay(&self, tree: &Tree, session: &mut Session) -> Result<()> {
        let mut visited = HashSet::new();

        loop {
            let node_id = session.current_node_id.clone();
            let node = tree
                .node(&node_id)
                .ok_or_else(|| RuntimeError::QuestionNotFound {
                    tree_id: tree.id.clone(),
                    node_id: node_id.clone(),
                })?;
            visited.insert(node_id.clone());

            let Some(answer) = session.answers.get(&node_id) else {
                tracing::debug!("Replay stopped at unanswered node '{}'", node_id);
                return Ok(());
            };
            let transition = route(node, answer)?;

            match self.follow(tree, session, &node_id, transition)? {
                Step::Terminal => return Ok(()),
                Step::Advanced if visited.contains(&session.current_node_id) => {
                    tracing::debug!(
                        "Replay stopped at revisited node '{}'",
                        session.current_node_id
                    );
                    return Ok(());
                }
                Step::Advanced => {}
            }
        }
    }
}

/// Id of the last node, in tree order, with a recorded answer
fn last_answered<'a>(tree: &'a Tree, answers: &Answers) -> Option<&'a str> {
    tree.nodes
        .iter()
        .rev()
        .find(|node| answers.contains_key(&node.id))
        .map(|node| node.id.as_str())
}

/// Normalize answers for the tree's nodes, in node order; other answers are kept as given
fn normalize_all(tree: &Tree, answers: Answers) -> Result<Answers> {
    let mut remaining = answers;
    let mut normalized = Answers::with_capacity(remaining.len());

    for node in &tree.nodes {
        if let Some(value) = remaining.remove(&node.id) {
            normalized.insert(node.id.clone(), normalize_answer(node, value)?);
        }
    }
    normalized.extend(remaining);

    Ok(normalized)
}
