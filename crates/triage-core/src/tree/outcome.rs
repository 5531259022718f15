//! Outcome (classification) definitions

use serde::{Deserialize, Serialize};

/// IMCI triage colour of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    /// Urgent pre-referral treatment and referral
    Pink,
    /// Specific treatment at the facility
    Yellow,
    /// Home management
    Green,
}

/// A terminal classification with its treatment and advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,

    pub severity_color: SeverityColor,

    #[serde(default)]
    pub is_emergency: bool,

    /// Ordered actions for the health worker
    #[serde(default)]
    pub actions: Vec<String>,

    #[serde(default)]
    pub treatment_summary: String,

    #[serde(default)]
    pub follow_up: Vec<String>,

    #[serde(default)]
    pub caregiver_advice: String,

    #[serde(default)]
    pub notes: String,
}

impl Outcome {
    pub fn new(label: impl Into<String>, severity_color: SeverityColor) -> Self {
        Self {
            label: label.into(),
            severity_color,
            is_emergency: false,
            actions: Vec::new(),
            treatment_summary: String::new(),
            follow_up: Vec::new(),
            caregiver_advice: String::new(),
            notes: String::new(),
        }
    }

    pub fn emergency(mut self) -> Self {
        self.is_emergency = true;
        self
    }

    pub fn with_actions(mut self, actions: &[&str]) -> Self {
        self.actions = actions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_treatment(mut self, treatment_summary: impl Into<String>) -> Self {
        self.treatment_summary = treatment_summary.into();
        self
    }

    pub fn with_follow_up(mut self, follow_up: &[&str]) -> Self {
        self.follow_up = follow_up.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_advice(mut self, caregiver_advice: impl Into<String>) -> Self {
        self.caregiver_advice = caregiver_advice.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_builder() {
        let outcome = Outcome::new("Severe pneumonia", SeverityColor::Pink)
            .emergency()
            .with_actions(&["Give first dose of antibiotic", "Refer urgently"])
            .with_follow_up(&["Follow up in 2 days"]);

        assert!(outcome.is_emergency);
        assert_eq!(outcome.actions.len(), 2);
        assert_eq!(outcome.follow_up[0], "Follow up in 2 days");
        assert!(outcome.caregiver_advice.is_empty());
    }

    #[test]
    fn test_outcome_minimal_document() {
        let outcome: Outcome =
            serde_json::from_str(r#"{"label": "No pneumonia", "severity_color": "green"}"#).unwrap();
        assert_eq!(outcome.severity_color, SeverityColor::Green);
        assert!(!outcome.is_emergency);
        assert!(outcome.actions.is_empty());
    }
}
