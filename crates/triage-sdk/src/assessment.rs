//! Assessment workflow
//!
//! Ties the engine to its collaborators: sessions are loaded from and saved to
//! the session store around every answer, subject metadata picks the tree when
//! the caller does not, and finished assessments go to the outcome sink.

use crate::config::StoreConfig;
use crate::engine::TriageEngine;
use crate::error::{Result, SdkError};
use std::collections::HashMap;
use std::sync::Arc;
use triage_core::{AgeCategory, AnswerValue, Answers, Session, SubjectProfile};
use triage_repository::{
    AssessmentRecord, FileSystemSessionStore, InMemoryOutcomeSink, InMemorySessionStore,
    InMemorySubjectDirectory, OutcomeSink, SessionStore, SubjectDirectory,
};
use triage_runtime::{Question, SubmitResult};

/// Stateless workflow over injected stores
#[derive(Clone)]
pub struct AssessmentService {
    engine: TriageEngine,
    sessions: Arc<dyn SessionStore>,
    subjects: Arc<dyn SubjectDirectory>,
    outcomes: Arc<dyn OutcomeSink>,
}

impl AssessmentService {
    pub fn new(
        engine: TriageEngine,
        sessions: Arc<dyn SessionStore>,
        subjects: Arc<dyn SubjectDirectory>,
        outcomes: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            engine,
            sessions,
            subjects,
            outcomes,
        }
    }

    /// Build with the session store named in the engine configuration and
    /// in-memory subject directory and outcome sink
    pub fn from_config(engine: TriageEngine) -> Result<Self> {
        let sessions: Arc<dyn SessionStore> = match &engine.config().session_store {
            StoreConfig::Memory => Arc::new(InMemorySessionStore::new()),
            StoreConfig::FileSystem { path } => Arc::new(FileSystemSessionStore::new(path)?),
        };

        Ok(Self::new(
            engine,
            sessions,
            Arc::new(InMemorySubjectDirectory::new()),
            Arc::new(InMemoryOutcomeSink::new()),
        ))
    }

    pub fn with_subject_directory(mut self, subjects: Arc<dyn SubjectDirectory>) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn with_outcome_sink(mut self, outcomes: Arc<dyn OutcomeSink>) -> Self {
        self.outcomes = outcomes;
        self
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }

    /// Start (or restart) the subject's assessment.
    ///
    /// Without `tree_id` the tree is chosen by the subject's age category.
    /// Any session already stored for the subject is replaced.
    pub async fn begin(&self, subject_reference: &str, tree_id: Option<&str>) -> Result<SubmitResult> {
        let profile = self
            .subjects
            .profile(subject_reference)
            .await?
            .unwrap_or_else(|| SubjectProfile::new(subject_reference));

        let tree_id = match tree_id {
            Some(id) => id.to_string(),
            None => self.tree_for(&profile)?,
        };

        let session = self.engine.start_with_profile(&profile, &tree_id)?;
        self.sessions.save(&session).await?;

        let next_question = self.engine.current_question(&session)?;
        Ok(SubmitResult {
            session,
            next_question,
        })
    }

    /// Submit one JSON answer for the subject's stored session.
    ///
    /// A terminal session goes to the outcome sink before it is stored; if the
    /// sink fails, the stored session is unchanged and the answer can be
    /// submitted again.
    pub async fn answer(
        &self,
        subject_reference: &str,
        node_id: &str,
        value: &serde_json::Value,
    ) -> Result<SubmitResult> {
        let session = self.load(subject_reference).await?;

        let result = self.engine.submit_json(&session, node_id, value)?;
        // Record before storing: once stored terminal, the answer cannot be retried
        self.emit(&result.session).await?;
        self.sessions.save(&result.session).await?;

        Ok(result)
    }

    /// Evaluate a complete set of JSON answers and store the resulting session
    pub async fn submit_batch(
        &self,
        subject_reference: &str,
        tree_id: &str,
        answers: HashMap<String, serde_json::Value>,
    ) -> Result<Session> {
        let answers = answers
            .iter()
            .map(|(node_id, value)| Ok((node_id.clone(), AnswerValue::from_json(value)?)))
            .collect::<Result<Answers>>()?;

        let profile = self
            .subjects
            .profile(subject_reference)
            .await?
            .unwrap_or_else(|| SubjectProfile::new(subject_reference));

        let session = self
            .engine
            .process_batch_with_profile(&profile, tree_id, answers)?;
        self.emit(&session).await?;
        self.sessions.save(&session).await?;

        Ok(session)
    }

    /// The question the subject's session is waiting on
    pub async fn current(&self, subject_reference: &str) -> Result<Option<Question>> {
        let session = self.load(subject_reference).await?;
        self.engine.current_question(&session)
    }

    /// The subject's stored session
    pub async fn session(&self, subject_reference: &str) -> Result<Session> {
        self.load(subject_reference).await
    }

    /// Drop the subject's stored session
    pub async fn discard(&self, subject_reference: &str) -> Result<()> {
        self.sessions.delete(subject_reference).await?;
        tracing::info!("Discarded session for subject '{}'", subject_reference);
        Ok(())
    }

    fn tree_for(&self, profile: &SubjectProfile) -> Result<String> {
        let config = self.engine.config();
        match profile.category() {
            Some(AgeCategory::YoungInfant) => Ok(config.young_infant_tree.clone()),
            Some(AgeCategory::Child) => Ok(config.child_tree.clone()),
            None => Err(SdkError::NoTreeForSubject(profile.subject_reference.clone())),
        }
    }

    async fn load(&self, subject_reference: &str) -> Result<Session> {
        self.sessions
            .load(subject_reference)
            .await?
            .ok_or_else(|| SdkError::SessionNotFound(subject_reference.to_string()))
    }

    /// Hand a terminal session to the outcome sink
    async fn emit(&self, session: &Session) -> Result<()> {
        if let Some(record) = AssessmentRecord::from_session(session) {
            tracing::info!(
                "Assessment {} for subject '{}' finished: {}",
                record.session_id,
                record.subject_reference,
                record.outcome_id.as_deref().unwrap_or("<none>")
            );
            self.outcomes.record(record).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AssessmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriageEngineBuilder;

    async fn service() -> (AssessmentService, Arc<InMemoryOutcomeSink>) {
        let engine = TriageEngineBuilder::new().build().await.unwrap();
        let sink = Arc::new(InMemoryOutcomeSink::new());
        let directory = Arc::new(InMemorySubjectDirectory::with_profiles([
            SubjectProfile::new("infant").with_age_months(1),
            SubjectProfile::new("toddler").with_age_months(24),
        ]));

        let service = AssessmentService::from_config(engine)
            .unwrap()
            .with_subject_directory(directory)
            .with_outcome_sink(sink.clone());
        (service, sink)
    }

    #[tokio::test]
    async fn test_begin_picks_tree_by_category() {
        let (service, _) = service().await;

        let infant = service.begin("infant", None).await.unwrap();
        assert_eq!(infant.session.tree_id, "young_infant_jaundice");
        assert_eq!(infant.session.findings.age_months, Some(1));
        assert_eq!(
            infant.next_question.map(|q| q.node_id),
            Some("age_days".to_string())
        );

        let toddler = service.begin("toddler", None).await.unwrap();
        assert_eq!(toddler.session.tree_id, "cough_difficult_breathing");
    }

    #[tokio::test]
    async fn test_begin_unknown_subject_needs_tree() {
        let (service, _) = service().await;

        assert!(matches!(
            service.begin("stranger", None).await,
            Err(SdkError::NoTreeForSubject(ref s)) if s == "stranger"
        ));

        let started = service
            .begin("stranger", Some("birth_asphyxia_check"))
            .await
            .unwrap();
        assert_eq!(started.session.current_node_id, "check_birth_asphyxia");
    }

    #[tokio::test]
    async fn test_answer_without_session() {
        let (service, _) = service().await;

        assert!(matches!(
            service
                .answer("nobody", "cough_present", &serde_json::json!("yes"))
                .await,
            Err(SdkError::SessionNotFound(_))
        ));
        assert!(matches!(
            service.current("nobody").await,
            Err(SdkError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_answer_flow_records_outcome() {
        let (service, sink) = service().await;
        service.begin("infant", None).await.unwrap();

        service
            .answer("infant", "age_days", &serde_json::json!(3))
            .await
            .unwrap();
        service
            .answer("infant", "jaundice_present", &serde_json::json!(true))
            .await
            .unwrap();
        assert!(sink.records().await.is_empty());

        let done = service
            .answer("infant", "palms_soles_yellow", &serde_json::json!("yes"))
            .await
            .unwrap();
        assert!(done.is_terminal());
        assert_eq!(done.session.outcome_id.as_deref(), Some("SEVERE_JAUNDICE"));

        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].is_emergency());
        assert_eq!(records[0].treatment_plan.len(), 4);

        assert!(service.current("infant").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_answer_keeps_stored_session() {
        let (service, _) = service().await;
        let started = service.begin("toddler", None).await.unwrap();

        let result = service
            .answer("toddler", "age_months", &serde_json::json!(200))
            .await;
        assert!(matches!(
            result.as_ref().map_err(|e| e.runtime()),
            Err(Some(triage_runtime::RuntimeError::InvalidAnswer { .. }))
        ));

        let stored = service.session("toddler").await.unwrap();
        assert_eq!(stored, started.session);
    }

    #[tokio::test]
    async fn test_null_answer_is_rejected() {
        let (service, _) = service().await;
        service.begin("toddler", None).await.unwrap();

        assert!(matches!(
            service
                .answer("toddler", "age_months", &serde_json::Value::Null)
                .await,
            Err(SdkError::InvalidAnswer(_))
        ));
    }

    #[tokio::test]
    async fn test_discard() {
        let (service, _) = service().await;
        service.begin("toddler", None).await.unwrap();

        service.discard("toddler").await.unwrap();
        assert!(matches!(
            service.session("toddler").await,
            Err(SdkError::SessionNotFound(_))
        ));
    }
}
