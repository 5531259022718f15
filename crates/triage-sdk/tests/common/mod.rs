//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use triage_sdk::{AnswerValue, Answers, TriageEngine, TriageEngineBuilder};

/// Small rule-dialect tree used where the catalogue is not wanted
pub const FEVER_TREE: &str = r#"
tree:
  id: fever_check
  title: Check for fever
  start_node_id: temperature
  nodes:
    - id: temperature
      prompt: Axillary temperature
      type: numeric
      numeric_bounds: { min: 30, max: 43 }
      rules:
        - kind: above_threshold
          thresholds: { value: 37.4 }
          classification_id: FEVER
        - kind: below_threshold
          thresholds: { value: 37.5 }
          classification_id: NO_FEVER
  outcomes:
    FEVER:
      label: Fever
      severity_color: yellow
      actions:
        - Give paracetamol
    NO_FEVER:
      label: No fever
      severity_color: green
"#;

/// Engine with the built-in catalogue and default settings
pub async fn catalog_engine() -> TriageEngine {
    TriageEngineBuilder::new()
        .build()
        .await
        .expect("Failed to build engine")
}

/// Answer set from `(node_id, value)` pairs
pub fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
    pairs
        .iter()
        .map(|(node_id, value)| (node_id.to_string(), value.clone()))
        .collect()
}

/// JSON answer set from `(node_id, value)` pairs
pub fn json_answers(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(node_id, value)| (node_id.to_string(), value.clone()))
        .collect()
}

/// Write a file below `dir`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directory");
    }
    std::fs::write(path, content.trim_start()).expect("Failed to write file");
}
