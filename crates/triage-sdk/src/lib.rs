//! Triage SDK
//!
//! High-level API for building a triage engine and running assessments:
//! the [`TriageEngine`] facade and its builder, configuration loading, the
//! built-in IMCI catalogue and the [`AssessmentService`] workflow.

pub mod assessment;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;

// Re-export main types
pub use assessment::AssessmentService;
pub use builder::TriageEngineBuilder;
pub use config::{EngineConfig, StoreConfig};
pub use engine::TriageEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use triage_core::{
    AgeCategory, AnswerValue, Answers, ClinicalFindings, Outcome, Session, SessionStatus,
    SubjectProfile, Tree,
};
pub use triage_repository::AssessmentRecord;
pub use triage_runtime::{MetricsCollector, MetricsSnapshot, Question, SubmitResult};
