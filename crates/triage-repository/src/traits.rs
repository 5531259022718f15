//! Collaborator traits injected into the assessment workflow
//!
//! - [`SessionStore`]: persist the in-progress session of each subject
//! - [`SubjectDirectory`]: look up a subject's age and category
//! - [`OutcomeSink`]: receive finished assessments
//! - [`TreeRepository`]: supply raw tree documents at startup
//!
//! # Examples
//!
//! ```no_run
//! use triage_repository::{InMemorySessionStore, SessionStore};
//! use triage_core::Session;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = InMemorySessionStore::new();
//! store.save(&Session::new("p-1", "cough_difficult_breathing", "cough_present")).await?;
//!
//! let session = store.load("p-1").await?;
//! assert!(session.is_some());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use triage_core::{Session, SubjectProfile};

use crate::{AssessmentRecord, RepositoryResult};

/// Storage of one current session per subject
///
/// Saving replaces whatever was stored for the subject; there is no version
/// check, so concurrent writers race and the last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the subject's session, if any
    async fn load(&self, subject_reference: &str) -> RepositoryResult<Option<Session>>;

    /// Store the session under its subject reference
    async fn save(&self, session: &Session) -> RepositoryResult<()>;

    /// Remove the subject's session; removing nothing is not an error
    async fn delete(&self, subject_reference: &str) -> RepositoryResult<()>;
}

/// Source of subject demographics
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    async fn profile(&self, subject_reference: &str) -> RepositoryResult<Option<SubjectProfile>>;
}

/// Receiver of finished assessments
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn record(&self, record: AssessmentRecord) -> RepositoryResult<()>;
}

/// Source of tree documents
#[async_trait]
pub trait TreeRepository: Send + Sync {
    /// Load every document as `(identifier, content)`, ordered by identifier
    async fn load_all(&self) -> RepositoryResult<Vec<(String, String)>>;
}
