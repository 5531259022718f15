//! YAML Parser
//!
//! Low-level helpers over `serde_yaml::Value` shared by the tree parser.

use crate::error::{ParseError, Result};
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Parse YAML string containing multiple documents.
    ///
    /// Documents are separated by explicit `---` lines, or by a `tree:` key at
    /// column 0 (a `---` is inserted before each one after the first).
    /// Empty documents are dropped.
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        use serde::Deserialize;

        let preprocessed = Self::preprocess_multi_document(yaml_str);

        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(&preprocessed) {
            let value = YamlValue::deserialize(document)?;
            if !value.is_null() {
                documents.push(value);
            }
        }

        Ok(documents)
    }

    /// Insert `---` before every column-0 `tree:` that follows earlier content
    fn preprocess_multi_document(yaml_str: &str) -> String {
        let mut result = String::with_capacity(yaml_str.len() + 16);
        let mut has_content = false;

        for line in yaml_str.lines() {
            let trimmed = line.trim();
            let is_tree_start = line.starts_with("tree:");

            if is_tree_start && has_content {
                result.push_str("---\n");
            }

            result.push_str(line);
            result.push('\n');

            if trimmed == "---" {
                has_content = false;
            } else if !trimmed.is_empty() && !trimmed.starts_with('#') {
                has_content = true;
            }
        }

        result
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field).and_then(|v| v.as_str()).map(|s| s.to_string())
    }

    /// Get a required array field from YAML object
    pub fn get_array<'a>(obj: &'a YamlValue, field: &str) -> Result<&'a Vec<YamlValue>> {
        obj.get(field)
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Render a scalar YAML value as text (`None` for collections and null)
    pub fn scalar_to_string(value: &YamlValue) -> Option<String> {
        match value {
            YamlValue::Bool(b) => Some(b.to_string()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Tagged(t) => Self::scalar_to_string(&t.value),
            YamlValue::Null | YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
        }
    }

    /// Check if a field exists in YAML object
    pub fn has_field(obj: &YamlValue, field: &str) -> bool {
        obj.get(field).is_some()
    }

    /// Validate YAML structure has required fields
    pub fn validate_required_fields(obj: &YamlValue, fields: &[&str], context: &str) -> Result<()> {
        for field in fields {
            if !Self::has_field(obj, field) {
                return Err(ParseError::MissingField {
                    field: format!("{}.{}", context, field),
                });
            }
        }
        Ok(())
    }

    /// Validate fields in a YAML object against a list of known fields.
    ///
    /// Returns one warning per unknown field, with a suggestion when a close
    /// match exists.
    pub fn validate_fields(obj: &YamlValue, known_fields: &[&str], context: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(mapping) = obj.as_mapping() {
            for (key, _) in mapping {
                let Some(field_name) = key.as_str() else {
                    continue;
                };
                if known_fields.contains(&field_name) {
                    continue;
                }

                let typo_correction = FIELD_CORRECTIONS
                    .iter()
                    .find(|(typo, _)| *typo == field_name)
                    .map(|(_, correct)| *correct)
                    .filter(|correct| known_fields.contains(correct));

                let suggestion = if let Some(correct) = typo_correction {
                    format!(" Did you mean '{}'?", correct)
                } else if let Some(similar) = Self::find_similar_field(field_name, known_fields) {
                    format!(" Did you mean '{}'?", similar)
                } else {
                    String::new()
                };

                warnings.push(format!(
                    "Unknown field '{}' in {}.{}",
                    field_name, context, suggestion
                ));
            }
        }

        warnings
    }

    /// Validate fields strictly - returns error if unknown fields found
    pub fn validate_fields_strict(obj: &YamlValue, known_fields: &[&str], context: &str) -> Result<()> {
        let errors = Self::validate_fields(obj, known_fields, context);

        if !errors.is_empty() {
            for error in &errors {
                tracing::error!("Field validation error: {}", error);
            }

            return Err(ParseError::InvalidValue {
                field: context.to_string(),
                message: errors.join("; "),
            });
        }

        Ok(())
    }

    /// Find similar field names using Levenshtein distance
    fn find_similar_field(field: &str, known_fields: &[&str]) -> Option<String> {
        known_fields
            .iter()
            .map(|known| (known, levenshtein_distance(field, known)))
            .filter(|(_, distance)| *distance <= 2)
            .min_by_key(|(_, distance)| *distance)
            .map(|(known, _)| known.to_string())
    }
}

/// Common field name mistakes in tree documents
const FIELD_CORRECTIONS: &[(&str, &str)] = &[
    ("start", "start_node_id"),
    ("start_node", "start_node_id"),
    ("question", "prompt"),
    ("text", "prompt"),
    ("node_type", "type"),
    ("next", "next_node_id"),
    ("next_node", "next_node_id"),
    ("classification", "classification_id"),
    ("outcome", "classification_id"),
    ("emergency", "is_emergency_path"),
    ("visibility", "visibility_predicate"),
    ("visible_when", "visibility_predicate"),
    ("bounds", "numeric_bounds"),
    ("transition", "transitions"),
    ("rule", "rules"),
    ("color", "severity_color"),
    ("advice", "caregiver_advice"),
    ("treatment", "treatment_summary"),
];

/// Levenshtein distance over chars
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
