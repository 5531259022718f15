//! Assessment sessions
//!
//! A `Session` is one in-progress or finished traversal of a tree for one
//! subject. It is a plain value: the runtime returns new sessions rather than
//! mutating shared state, and persistence belongs to the caller.

use super::findings::ClinicalFindings;
use super::value::Answers;
use crate::tree::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Emergency,
}

impl SessionStatus {
    /// Whether the status is final
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Emergency => "emergency",
        }
    }
}

/// One traversal of a tree for a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session id (uuid v4)
    pub id: String,

    /// Opaque reference to the assessed subject (patient, encounter)
    pub subject_reference: String,

    /// Tree being traversed
    pub tree_id: String,

    /// Node awaiting an answer (last asked node once terminal)
    pub current_node_id: String,

    pub status: SessionStatus,

    /// Accepted answers keyed by node id
    #[serde(default)]
    pub answers: Answers,

    /// Structured projection of `answers`
    #[serde(default)]
    pub findings: ClinicalFindings,

    /// Resolved outcome id, once terminal with a classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_id: Option<String>,

    /// Resolved outcome, once terminal with a classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new in-progress session positioned at `start_node_id`
    pub fn new(
        subject_reference: impl Into<String>,
        tree_id: impl Into<String>,
        start_node_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject_reference: subject_reference.into(),
            tree_id: tree_id.into(),
            current_node_id: start_node_id.into(),
            status: SessionStatus::InProgress,
            answers: Answers::new(),
            findings: ClinicalFindings::new(),
            outcome_id: None,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the subject's age for age-dependent thresholds
    pub fn with_age_months(mut self, age_months: Option<u32>) -> Self {
        self.findings.age_months = age_months;
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Age category used to pick the applicable protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    /// Birth up to 2 months
    YoungInfant,
    /// 2 months up to 5 years
    Child,
}

impl AgeCategory {
    pub fn from_age_months(age_months: u32) -> Self {
        if age_months < 2 {
            AgeCategory::YoungInfant
        } else {
            AgeCategory::Child
        }
    }
}

/// Subject metadata supplied by the subject directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub subject_reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_months: Option<u32>,

    /// Explicit category; derived from age when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AgeCategory>,
}

impl SubjectProfile {
    pub fn new(subject_reference: impl Into<String>) -> Self {
        Self {
            subject_reference: subject_reference.into(),
            age_months: None,
            category: None,
        }
    }

    pub fn with_age_months(mut self, age_months: u32) -> Self {
        self.age_months = Some(age_months);
        self
    }

    pub fn with_category(mut self, category: AgeCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// The explicit category, or the one implied by age
    pub fn category(&self) -> Option<AgeCategory> {
        self.category
            .or_else(|| self.age_months.map(AgeCategory::from_age_months))
    }
}
