//! Runtime data types
//!
//! This module contains the mutable side of the model:
//! - Answer values submitted by operators
//! - Assessment sessions and subject profiles
//! - The structured clinical findings record

pub mod findings;
pub mod session;
pub mod value;

pub use findings::ClinicalFindings;
pub use session::{AgeCategory, Session, SessionStatus, SubjectProfile};
pub use value::{AnswerValue, Answers, AnswersExt};
