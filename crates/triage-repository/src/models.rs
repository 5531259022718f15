//! Data models for the repository layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_core::{Outcome, Session, SessionStatus, SeverityColor};

/// One line of a treatment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentItem {
    /// Position in the plan, starting at 1
    pub sequence: u32,
    pub description: String,
}

/// Downstream record of a finished assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub subject_reference: String,
    pub session_id: String,
    pub tree_id: String,
    pub status: SessionStatus,

    /// `None` when the session ended at a dead end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// Outcome actions followed by the treatment summary
    #[serde(default)]
    pub treatment_plan: Vec<TreatmentItem>,

    #[serde(default)]
    pub follow_up: Vec<String>,

    #[serde(default)]
    pub caregiver_advice: String,

    pub recorded_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// Build a record from a terminal session; `None` while it is in progress
    pub fn from_session(session: &Session) -> Option<Self> {
        if !session.is_terminal() {
            return None;
        }

        let outcome = session.outcome.as_ref();
        Some(Self {
            subject_reference: session.subject_reference.clone(),
            session_id: session.id.clone(),
            tree_id: session.tree_id.clone(),
            status: session.status,
            outcome_id: session.outcome_id.clone(),
            outcome: session.outcome.clone(),
            treatment_plan: outcome.map(treatment_plan).unwrap_or_default(),
            follow_up: outcome.map(|o| o.follow_up.clone()).unwrap_or_default(),
            caregiver_advice: outcome
                .map(|o| o.caregiver_advice.clone())
                .unwrap_or_default(),
            recorded_at: Utc::now(),
        })
    }

    pub fn is_emergency(&self) -> bool {
        self.status == SessionStatus::Emergency
    }

    pub fn severity_color(&self) -> Option<SeverityColor> {
        self.outcome.as_ref().map(|o| o.severity_color)
    }
}

fn treatment_plan(outcome: &Outcome) -> Vec<TreatmentItem> {
    let summary = Some(outcome.treatment_summary.trim()).filter(|s| !s.is_empty());

    outcome
        .actions
        .iter()
        .map(String::as_str)
        .chain(summary)
        .zip(1..)
        .map(|(description, sequence)| TreatmentItem {
            sequence,
            description: description.to_string(),
        })
        .collect()
}
