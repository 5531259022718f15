//! Tree document parser
//!
//! Parses tree documents from YAML or JSON into `Tree` values.
//!
//! ```yaml
//! tree:
//!   id: birth_asphyxia_check
//!   title: Check for birth asphyxia
//!   start_node_id: check_birth_asphyxia
//!   nodes:
//!     - id: check_birth_asphyxia
//!       prompt: Assess the newborn for birth asphyxia now?
//!       type: boolean
//!       transitions:
//!         "yes": { next_node_id: not_breathing }
//!         "no":  { classification_id: NO_BIRTH_ASPHYXIA }
//!   outcomes:
//!     NO_BIRTH_ASPHYXIA:
//!       label: No birth asphyxia
//!       severity_color: green
//! ```
//!
//! Every parsed tree is structurally validated before it is returned.

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use serde_yaml::{Mapping, Value as YamlValue};
use triage_core::Tree;

const TREE_FIELDS: &[&str] = &[
    "id",
    "title",
    "instructions",
    "version",
    "start_node_id",
    "nodes",
    "outcomes",
];

const NODE_FIELDS: &[&str] = &[
    "id",
    "prompt",
    "type",
    "required",
    "depth",
    "parent_id",
    "visibility_predicate",
    "numeric_bounds",
    "options",
    "help",
    "transitions",
    "rules",
];

const OUTCOME_FIELDS: &[&str] = &[
    "label",
    "severity_color",
    "is_emergency",
    "actions",
    "treatment_summary",
    "follow_up",
    "caregiver_advice",
    "notes",
];

/// Tree document parser
pub struct TreeParser;

impl TreeParser {
    /// Parse a single tree from a YAML string
    pub fn parse(yaml_str: &str) -> Result<Tree> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse a single tree from a JSON string
    pub fn parse_json(json_str: &str) -> Result<Tree> {
        let json: serde_json::Value = serde_json::from_str(json_str)?;
        let yaml = serde_yaml::to_value(&json)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse every tree in a (possibly multi-document) YAML string
    pub fn parse_multi(yaml_str: &str) -> Result<Vec<Tree>> {
        YamlParser::parse_multi_document(yaml_str)?
            .iter()
            .map(Self::parse_from_yaml)
            .collect()
    }

    /// Parse a document whose format is detected from its first character.
    ///
    /// JSON documents start with `{` and hold one tree; anything else is
    /// treated as (multi-document) YAML.
    pub fn parse_document(content: &str) -> Result<Vec<Tree>> {
        if content.trim_start().starts_with('{') {
            Ok(vec![Self::parse_json(content)?])
        } else {
            Self::parse_multi(content)
        }
    }

    /// Parse a tree from an already-parsed YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<Tree> {
        let tree_obj = yaml.get("tree").ok_or_else(|| ParseError::MissingField {
            field: "tree".to_string(),
        })?;

        YamlParser::validate_required_fields(
            tree_obj,
            &["id", "title", "start_node_id", "nodes"],
            "tree",
        )?;
        let tree_id = YamlParser::get_string(tree_obj, "id")?;
        Self::warn_unknown_fields(tree_obj, TREE_FIELDS, &format!("tree '{}'", tree_id));

        let mut normalized = tree_obj.clone();

        // `version: 2` and `version: 1.1` are written as numbers surprisingly often
        if let Some(version) = normalized.get("version").and_then(YamlParser::scalar_to_string) {
            normalized["version"] = YamlValue::String(version);
        }

        let nodes = normalized
            .get_mut("nodes")
            .and_then(|v| v.as_sequence_mut())
            .ok_or_else(|| ParseError::InvalidValue {
                field: "tree.nodes".to_string(),
                message: "expected a list of nodes".to_string(),
            })?;
        for (index, node) in nodes.iter_mut().enumerate() {
            Self::normalize_node(node, &tree_id, index)?;
        }

        if let Some(outcomes) = tree_obj.get("outcomes").and_then(|v| v.as_mapping()) {
            for (key, outcome) in outcomes {
                let outcome_id = key.as_str().unwrap_or_default();
                Self::warn_unknown_fields(
                    outcome,
                    OUTCOME_FIELDS,
                    &format!("outcome '{}' of tree '{}'", outcome_id, tree_id),
                );
            }
        }

        let tree: Tree = serde_yaml::from_value(normalized)?;
        tree.ensure_valid()?;

        tracing::debug!(
            "Parsed tree '{}' with {} nodes and {} outcomes",
            tree.id,
            tree.nodes.len(),
            tree.outcomes.len()
        );

        Ok(tree)
    }

    /// Check one node mapping and bring its routing into canonical shape
    fn normalize_node(node: &mut YamlValue, tree_id: &str, index: usize) -> Result<()> {
        let context = format!("tree.nodes[{}]", index);
        YamlParser::validate_required_fields(node, &["id", "prompt", "type"], &context)?;

        let node_id = YamlParser::get_string(node, "id")?;
        Self::warn_unknown_fields(
            node,
            NODE_FIELDS,
            &format!("node '{}' of tree '{}'", node_id, tree_id),
        );

        let has_transitions = YamlParser::has_field(node, "transitions");
        let has_rules = YamlParser::has_field(node, "rules");

        match (has_transitions, has_rules) {
            (true, true) => {
                return Err(ParseError::InvalidValue {
                    field: format!("{}.rules", context),
                    message: format!(
                        "node '{}' declares both transitions and rules",
                        node_id
                    ),
                });
            }
            // A node without routing is a dead end
            (false, false) => {
                node["transitions"] = YamlValue::Mapping(Mapping::new());
            }
            (true, false) => {
                let transitions = &mut node["transitions"];
                if transitions.is_null() {
                    *transitions = YamlValue::Mapping(Mapping::new());
                } else {
                    let mapping = transitions.as_mapping().ok_or_else(|| ParseError::InvalidValue {
                        field: format!("{}.transitions", context),
                        message: "expected a mapping of answer keys".to_string(),
                    })?;
                    *transitions = YamlValue::Mapping(Self::stringify_keys(mapping, &context)?);
                }
            }
            (false, true) => {
                if !node["rules"].is_sequence() {
                    return Err(ParseError::InvalidValue {
                        field: format!("{}.rules", context),
                        message: "expected a list of rules".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Answer keys such as `55` or `true` arrive as non-string YAML scalars
    fn stringify_keys(mapping: &Mapping, context: &str) -> Result<Mapping> {
        let mut result = Mapping::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = YamlParser::scalar_to_string(key).ok_or_else(|| ParseError::InvalidValue {
                field: format!("{}.transitions", context),
                message: "answer keys must be scalars".to_string(),
            })?;
            result.insert(YamlValue::String(key), value.clone());
        }
        Ok(result)
    }

    fn warn_unknown_fields(obj: &YamlValue, known: &[&str], context: &str) {
        for warning in YamlParser::validate_fields(obj, known, context) {
            tracing::warn!("{}", warning);
        }
    }
}
