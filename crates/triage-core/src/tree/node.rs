//! Node, transition and predicate-rule definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transition key used by numeric and computed nodes.
///
/// The submitted number is stored under the node id for downstream rules;
/// routing itself always uses this key.
pub const VALUE_BASED_KEY: &str = "value_based";

/// Classification id that defers outcome selection to the tree's classifier
pub const AUTO_CLASSIFICATION: &str = "AUTO";

/// Kind of question a node asks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Boolean,
    SingleChoice,
    MultiChoice,
    Numeric,
    Computed,
}

impl NodeType {
    /// Whether routing for this node uses the `value_based` key
    pub fn is_value_based(&self) -> bool {
        matches!(self, NodeType::Numeric | NodeType::Computed)
    }
}

/// Accepted range for numeric answers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl NumericBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: None,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Check whether a value lies within the bounds (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        if self.min.map_or(false, |min| value < min) || self.max.map_or(false, |max| value > max) {
            return false;
        }
        match (self.step, self.min) {
            (Some(step), Some(min)) if step > 0.0 => {
                let remainder = (value - min) % step;
                // Allow floating point tolerance
                remainder < 1e-9 || (step - remainder) < 1e-9
            }
            _ => true,
        }
    }
}

/// Where an answer leads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Next node to ask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node_id: Option<String>,

    /// Outcome key, or `AUTO` to defer to the tree's classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_tag: Option<String>,

    #[serde(default)]
    pub is_emergency_path: bool,
}

/// How a transition resolves its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Deferred to the tree's classifier
    Deferred,
    /// A concrete outcome key
    Outcome(&'a str),
}

impl Transition {
    /// Transition to another node
    pub fn to_node(next_node_id: impl Into<String>) -> Self {
        Self {
            next_node_id: Some(next_node_id.into()),
            ..Self::default()
        }
    }

    /// Transition that terminates with an outcome
    pub fn to_outcome(classification_id: impl Into<String>) -> Self {
        Self {
            classification_id: Some(classification_id.into()),
            ..Self::default()
        }
    }

    /// Transition that defers to the tree's classifier
    pub fn deferred() -> Self {
        Self::to_outcome(AUTO_CLASSIFICATION)
    }

    pub fn with_severity(mut self, severity_tag: impl Into<String>) -> Self {
        self.severity_tag = Some(severity_tag.into());
        self
    }

    pub fn emergency(mut self) -> Self {
        self.is_emergency_path = true;
        self
    }

    /// Next node id, ignoring empty strings
    pub fn next_node(&self) -> Option<&str> {
        self.next_node_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Classification, ignoring empty strings
    pub fn classification(&self) -> Option<Classification<'_>> {
        match self.classification_id.as_deref() {
            None | Some("") => None,
            Some(AUTO_CLASSIFICATION) => Some(Classification::Deferred),
            Some(id) => Some(Classification::Outcome(id)),
        }
    }
}

/// Predicate kind of a dialect-B rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    AnySelected,
    AllSelected,
    NoneSelected,
    Yes,
    No,
    AboveThreshold,
    BelowThreshold,
    WithinRange,
}

/// Numeric thresholds used by threshold and range rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// An ordered predicate rule (dialect B)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_options: Vec<String>,

    #[serde(default)]
    pub thresholds: Thresholds,

    /// Where the rule leads when it holds
    #[serde(flatten)]
    pub transition: Transition,
}

impl Rule {
    pub fn new(kind: RuleKind, transition: Transition) -> Self {
        Self {
            kind,
            expected_options: Vec::new(),
            thresholds: Thresholds::default(),
            transition,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.expected_options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_threshold(mut self, value: f64) -> Self {
        self.thresholds.value = Some(value);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.thresholds.min = Some(min);
        self.thresholds.max = Some(max);
        self
    }
}

/// Routing strategy of a node: one of the two rule dialects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRouting {
    /// Dialect A: exact lookup by answer key
    Transitions(BTreeMap<String, Transition>),
    /// Dialect B: ordered predicate rules, first match wins
    Rules(Vec<Rule>),
}

impl NodeRouting {
    /// Every transition reachable from this node
    pub fn transitions(&self) -> Vec<&Transition> {
        match self {
            NodeRouting::Transitions(map) => map.values().collect(),
            NodeRouting::Rules(rules) => rules.iter().map(|r| &r.transition).collect(),
        }
    }
}

/// A question / decision point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    pub prompt: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default = "default_required")]
    pub required: bool,

    #[serde(default)]
    pub depth: u32,

    /// Informational only; routing never uses it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// `AND`-joined `node_id.expected_answer` clauses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_predicate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_bounds: Option<NumericBounds>,

    /// Choice labels offered to the operator
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(flatten)]
    pub routing: NodeRouting,
}

fn default_required() -> bool {
    true
}

impl Node {
    /// Create a node routed by a transition map
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            node_type,
            required: true,
            depth: 0,
            parent_id: None,
            visibility_predicate: None,
            numeric_bounds: None,
            options: Vec::new(),
            help: None,
            routing: NodeRouting::Transitions(BTreeMap::new()),
        }
    }

    /// Add a dialect-A transition.
    ///
    /// Switches the node to a transition map if it held rules.
    pub fn on(mut self, answer_key: impl Into<String>, transition: Transition) -> Self {
        match &mut self.routing {
            NodeRouting::Transitions(map) => {
                map.insert(answer_key.into(), transition);
            }
            NodeRouting::Rules(_) => {
                let mut map = BTreeMap::new();
                map.insert(answer_key.into(), transition);
                self.routing = NodeRouting::Transitions(map);
            }
        }
        self
    }

    /// Add the `value_based` transition of a numeric node
    pub fn on_value(self, transition: Transition) -> Self {
        self.on(VALUE_BASED_KEY, transition)
    }

    /// Append a dialect-B rule.
    ///
    /// Switches the node to predicate rules if it held a transition map.
    pub fn rule(mut self, rule: Rule) -> Self {
        match &mut self.routing {
            NodeRouting::Rules(rules) => rules.push(rule),
            NodeRouting::Transitions(_) => self.routing = NodeRouting::Rules(vec![rule]),
        }
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn at_depth(mut self, depth: u32, parent_id: impl Into<String>) -> Self {
        self.depth = depth;
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn visible_when(mut self, predicate: impl Into<String>) -> Self {
        self.visibility_predicate = Some(predicate.into());
        self
    }

    pub fn with_bounds(mut self, bounds: NumericBounds) -> Self {
        self.numeric_bounds = Some(bounds);
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Choices to present: declared options, else the transition keys
    pub fn choices(&self) -> Vec<String> {
        if !self.options.is_empty() {
            return self.options.clone();
        }
        match &self.routing {
            NodeRouting::Transitions(map) if !self.node_type.is_value_based() => {
                map.keys().cloned().collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_classification() {
        assert_eq!(Transition::deferred().classification(), Some(Classification::Deferred));
        assert_eq!(
            Transition::to_outcome("PNEUMONIA").classification(),
            Some(Classification::Outcome("PNEUMONIA"))
        );
        assert_eq!(Transition::to_node("next").classification(), None);

        let empty = Transition {
            next_node_id: Some(String::new()),
            classification_id: Some(String::new()),
            ..Transition::default()
        };
        assert_eq!(empty.next_node(), None);
        assert_eq!(empty.classification(), None);
    }

    #[test]
    fn test_numeric_bounds() {
        let bounds = NumericBounds::new(10.0, 120.0).with_step(1.0);
        assert!(bounds.contains(10.0));
        assert!(bounds.contains(120.0));
        assert!(bounds.contains(55.0));
        assert!(!bounds.contains(55.5));
        assert!(!bounds.contains(9.0));
        assert!(!bounds.contains(121.0));

        let temp = NumericBounds::new(30.0, 43.0).with_step(0.1);
        assert!(temp.contains(37.5));
    }

    #[test]
    fn test_node_builder_switches_dialect() {
        let node = Node::new("signs", "Danger signs?", NodeType::MultiChoice)
            .rule(Rule::new(RuleKind::AnySelected, Transition::to_outcome("SEVERE")).with_options(&["convulsions"]));
        assert!(matches!(node.routing, NodeRouting::Rules(ref rules) if rules.len() == 1));

        let node = node.on("none", Transition::to_node("next"));
        assert!(matches!(node.routing, NodeRouting::Transitions(ref map) if map.len() == 1));
    }

    #[test]
    fn test_node_yaml_with_transitions() {
        let yaml = r#"
id: not_breathing
prompt: Is the baby not breathing?
type: boolean
depth: 1
parent_id: check_birth_asphyxia
transitions:
  "yes":
    classification_id: BIRTH_ASPHYXIA
    severity_tag: severe
    is_emergency_path: true
  "no":
    next_node_id: gasping
"#;
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.node_type, NodeType::Boolean);
        assert!(node.required);
        match &node.routing {
            NodeRouting::Transitions(map) => {
                assert_eq!(map["yes"].classification_id.as_deref(), Some("BIRTH_ASPHYXIA"));
                assert!(map["yes"].is_emergency_path);
                assert_eq!(map["no"].next_node(), Some("gasping"));
            }
            other => panic!("Expected transitions, got {:?}", other),
        }
    }

    #[test]
    fn test_node_json_with_rules() {
        let json = r#"{
            "id": "rr",
            "prompt": "Breaths per minute",
            "type": "numeric",
            "numeric_bounds": {"min": 10, "max": 120},
            "rules": [
                {"kind": "above_threshold", "thresholds": {"value": 49}, "next_node_id": "fast"},
                {"kind": "within_range", "thresholds": {"min": 10, "max": 49}, "next_node_id": "normal"}
            ]
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        match &node.routing {
            NodeRouting::Rules(rules) => {
                assert_eq!(rules.len(), 2);
                assert_eq!(rules[0].kind, RuleKind::AboveThreshold);
                assert_eq!(rules[0].thresholds.value, Some(49.0));
                assert_eq!(rules[1].transition.next_node(), Some("normal"));
            }
            other => panic!("Expected rules, got {:?}", other),
        }
    }

    #[test]
    fn test_choices_fall_back_to_keys() {
        let node = Node::new("cough", "Cough?", NodeType::Boolean)
            .on("yes", Transition::to_node("a"))
            .on("no", Transition::to_node("b"));
        assert_eq!(node.choices(), vec!["no".to_string(), "yes".to_string()]);

        let numeric = Node::new("rr", "Rate", NodeType::Numeric).on_value(Transition::to_node("a"));
        assert!(numeric.choices().is_empty());
    }
}
