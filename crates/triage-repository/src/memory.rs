//! In-memory collaborator implementations

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use triage_core::{Session, SubjectProfile};

use crate::{
    AssessmentRecord, OutcomeSink, RepositoryResult, SessionStore, SubjectDirectory,
};

/// Session store backed by a map keyed by subject reference
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, subject_reference: &str) -> RepositoryResult<Option<Session>> {
        Ok(self.sessions.read().await.get(subject_reference).cloned())
    }

    async fn save(&self, session: &Session) -> RepositoryResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.subject_reference.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, subject_reference: &str) -> RepositoryResult<()> {
        self.sessions.write().await.remove(subject_reference);
        Ok(())
    }
}

/// Subject directory seeded up front
#[derive(Debug, Clone, Default)]
pub struct InMemorySubjectDirectory {
    profiles: Arc<RwLock<HashMap<String, SubjectProfile>>>,
}

impl InMemorySubjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed profiles at construction
    pub fn with_profiles(profiles: impl IntoIterator<Item = SubjectProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.subject_reference.clone(), p))
            .collect();
        Self {
            profiles: Arc::new(RwLock::new(profiles)),
        }
    }

    /// Add or replace a profile
    pub async fn insert(&self, profile: SubjectProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.subject_reference.clone(), profile);
    }
}

#[async_trait]
impl SubjectDirectory for InMemorySubjectDirectory {
    async fn profile(&self, subject_reference: &str) -> RepositoryResult<Option<SubjectProfile>> {
        Ok(self.profiles.read().await.get(subject_reference).cloned())
    }
}

/// Outcome sink that keeps every record in arrival order
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutcomeSink {
    records: Arc<RwLock<Vec<AssessmentRecord>>>,
}

impl InMemoryOutcomeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub async fn records(&self) -> Vec<AssessmentRecord> {
        self.records.read().await.clone()
    }

    /// Records for one subject
    pub async fn records_for(&self, subject_reference: &str) -> Vec<AssessmentRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.subject_reference == subject_reference)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OutcomeSink for InMemoryOutcomeSink {
    async fn record(&self, record: AssessmentRecord) -> RepositoryResult<()> {
        tracing::debug!(
            "Recording outcome {:?} for subject '{}'",
            record.outcome_id,
            record.subject_reference
        );
        self.records.write().await.push(record);
        Ok(())
    }
}
