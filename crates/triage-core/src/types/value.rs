//! Answer values
//!
//! `AnswerValue` is the closed set of shapes an operator answer can take.
//! Values are converted once at ingress (from JSON or native types) so rule
//! evaluation never has to guess at types.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Accumulated answers of a session, keyed by node id
pub type Answers = HashMap<String, AnswerValue>;

/// A submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Boolean answer (rendered as "yes" / "no")
    Bool(bool),
    /// Numeric measurement (counts, temperatures, saturations)
    Number(f64),
    /// Literal answer key ("yes", "no", a choice id)
    Text(String),
    /// Multi-choice selection, in the order submitted
    List(Vec<String>),
}

impl AnswerValue {
    /// Convert a JSON value into an answer.
    ///
    /// Accepts strings, numbers, booleans and arrays of scalars. Null, objects
    /// and nested arrays are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(AnswerValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(AnswerValue::Number)
                .ok_or_else(|| CoreError::InvalidAnswer(format!("unrepresentable number {}", n))),
            serde_json::Value::String(s) => Ok(AnswerValue::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => Ok(s.clone()),
                    serde_json::Value::Bool(b) => Ok(yes_no(*b).to_string()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    other => Err(CoreError::InvalidAnswer(format!(
                        "unsupported list element {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(AnswerValue::List),
            serde_json::Value::Null => Err(CoreError::InvalidAnswer("null answer".to_string())),
            serde_json::Value::Object(_) => {
                Err(CoreError::InvalidAnswer("object answers are not supported".to_string()))
            }
        }
    }

    /// Get the literal text of a single answer
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s.as_str()),
            AnswerValue::Bool(b) => Some(yes_no(*b)),
            _ => None,
        }
    }

    /// Get the numeric value, parsing numeric text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// View the answer as a multi-choice selection.
    ///
    /// Single answers become a one-element selection.
    pub fn selection(&self) -> Vec<String> {
        match self {
            AnswerValue::List(items) => items.clone(),
            AnswerValue::Text(s) => vec![s.clone()],
            AnswerValue::Bool(b) => vec![yes_no(*b).to_string()],
            AnswerValue::Number(_) => vec![self.render()],
        }
    }

    /// Whether the answer is an affirmative "yes"
    pub fn is_yes(&self) -> bool {
        matches!(self, AnswerValue::Bool(true)) || matches!(self, AnswerValue::Text(s) if s == "yes")
    }

    /// Render the answer the way visibility clauses compare it
    pub fn render(&self) -> String {
        match self {
            AnswerValue::Bool(b) => yes_no(*b).to_string(),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::List(items) => items.join(","),
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AnswerValue::Bool(_) => "bool",
            AnswerValue::Number(_) => "number",
            AnswerValue::Text(_) => "text",
            AnswerValue::List(_) => "list",
        }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::List(items) => write!(f, "[{}]", items.join(", ")),
            other => f.write_str(&other.render()),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Number(value as f64)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(value: Vec<&str>) -> Self {
        AnswerValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl TryFrom<serde_json::Value> for AnswerValue {
    type Error = CoreError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        AnswerValue::from_json(&value)
    }
}

/// Typed lookups over an answer map, used by classifiers and projections
pub trait AnswersExt {
    /// Whether the answer for `key` is "yes"
    fn is_yes(&self, key: &str) -> bool;

    /// Numeric answer for `key`
    fn number(&self, key: &str) -> Option<f64>;

    /// Literal answer for `key`
    fn text(&self, key: &str) -> Option<&str>;

    /// Whether the selection stored under `key` contains `option`
    fn has_selected(&self, key: &str, option: &str) -> bool;

    /// Whether the selection under `key` contains anything other than the
    /// given "none" marker
    fn has_any_selected_except(&self, key: &str, none_marker: &str) -> bool;
}

impl AnswersExt for Answers {
    fn is_yes(&self, key: &str) -> bool {
        self.get(key).map_or(false, AnswerValue::is_yes)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AnswerValue::as_number)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AnswerValue::as_text)
    }

    fn has_selected(&self, key: &str, option: &str) -> bool {
        self.get(key)
            .map_or(false, |value| value.selection().iter().any(|s| s == option))
    }

    fn has_any_selected_except(&self, key: &str, none_marker: &str) -> bool {
        self.get(key).map_or(false, |value| {
            value.selection().iter().any(|s| s != none_marker)
        })
    }
}
