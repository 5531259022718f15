//! Transition selection for both routing dialects

use super::predicate::rule_holds;
use crate::error::{Result, RuntimeError};
use triage_core::{AnswerValue, Node, NodeRouting, NodeType, Transition, VALUE_BASED_KEY};

/// Transition of a node that declares no routing at all
static DEAD_END: Transition = Transition {
    next_node_id: None,
    classification_id: None,
    severity_tag: None,
    is_emergency_path: false,
};

/// Pick the transition a (normalized) answer leads to.
///
/// Transition maps:
/// - numeric and computed nodes always use the `value_based` key
/// - multi-choice nodes treat each key as "any selected", in key order
/// - other nodes look up the literal answer
///
/// A miss is `InvalidAnswer`.
///
/// Rule lists: rules are tried in declared order and the first that holds
/// wins. A miss is `NoMatchingRule`.
///
/// A node with an empty transition map or rule list is a dead end and
/// accepts any answer.
pub fn route<'a>(node: &'a Node, answer: &AnswerValue) -> Result<&'a Transition> {
    match &node.routing {
        NodeRouting::Transitions(map) if map.is_empty() => Ok(&DEAD_END),
        NodeRouting::Rules(rules) if rules.is_empty() => Ok(&DEAD_END),

        NodeRouting::Transitions(map) => {
            if node.node_type.is_value_based() {
                return map.get(VALUE_BASED_KEY).ok_or_else(|| {
                    RuntimeError::invalid_answer(&node.id, "node has no value_based transition")
                });
            }

            if node.node_type == NodeType::MultiChoice {
                let selection = answer.selection();
                return map
                    .iter()
                    .find(|(key, _)| selection.contains(*key))
                    .map(|(_, transition)| transition)
                    .ok_or_else(|| {
                        RuntimeError::invalid_answer(
                            &node.id,
                            format!(
                                "selection {} matches none of: {}",
                                answer,
                                keys(map.keys())
                            ),
                        )
                    });
            }

            let key = answer.as_text().map(str::to_string).unwrap_or_else(|| answer.render());
            map.get(&key).ok_or_else(|| {
                RuntimeError::invalid_answer(
                    &node.id,
                    format!("answer '{}' is not one of: {}", key, keys(map.keys())),
                )
            })
        }

        NodeRouting::Rules(rules) => {
            let matched = rules.iter().position(|rule| rule_holds(rule, answer));
            match matched {
                Some(index) => {
                    tracing::debug!("Node '{}': rule #{} ({:?}) matched", node.id, index, rules[index].kind);
                    Ok(&rules[index].transition)
                }
                None => Err(RuntimeError::NoMatchingRule {
                    node_id: node.id.clone(),
                }),
            }
        }
    }
}

fn keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Rule, RuleKind};

    fn boolean_node() -> Node {
        Node::new("cough", "Cough?", NodeType::Boolean)
            .on("yes", Transition::to_node("rr"))
            .on("no", Transition::to_outcome("NO_COUGH"))
    }

    #[test]
    fn test_exact_key_lookup() {
        let node = boolean_node();
        let t = route(&node, &AnswerValue::from("yes")).unwrap();
        assert_eq!(t.next_node(), Some("rr"));

        let t = route(&node, &AnswerValue::Bool(false)).unwrap();
        assert_eq!(t.classification_id.as_deref(), Some("NO_COUGH"));
    }

    #[test]
    fn test_unknown_key_is_invalid_answer() {
        let node = boolean_node();
        match route(&node, &AnswerValue::from("maybe")) {
            Err(RuntimeError::InvalidAnswer { node_id, message }) => {
                assert_eq!(node_id, "cough");
                assert!(message.contains("no, yes"));
            }
            other => panic!("Expected InvalidAnswer, got {:?}", other),
        }
    }

    #[test]
    fn test_value_based_ignores_the_number() {
        let node = Node::new("rr", "Rate", NodeType::Numeric).on_value(Transition::to_node("next"));
        assert_eq!(route(&node, &AnswerValue::Number(12.0)).unwrap().next_node(), Some("next"));
        assert_eq!(route(&node, &AnswerValue::Number(99.0)).unwrap().next_node(), Some("next"));
    }

    #[test]
    fn test_multi_choice_transition_map() {
        let node = Node::new("signs", "Signs", NodeType::MultiChoice)
            .on("stridor", Transition::to_outcome("SEVERE"))
            .on("chest_indrawing", Transition::to_outcome("PNEUMONIA"));

        // Keys are tried in sorted order: chest_indrawing before stridor
        let both = AnswerValue::from(vec!["stridor", "chest_indrawing"]);
        assert_eq!(
            route(&node, &both).unwrap().classification_id.as_deref(),
            Some("PNEUMONIA")
        );
        assert!(route(&node, &AnswerValue::from(vec!["wheezing"])).is_err());
    }

    #[test]
    fn test_rules_first_match_wins() {
        let node = Node::new("rr", "Rate", NodeType::Numeric)
            .rule(Rule::new(RuleKind::AboveThreshold, Transition::to_outcome("FAST")).with_threshold(49.0))
            .rule(Rule::new(RuleKind::AboveThreshold, Transition::to_outcome("VERY_FAST")).with_threshold(69.0))
            .rule(Rule::new(RuleKind::WithinRange, Transition::to_outcome("NORMAL")).with_range(10.0, 49.0));

        let t = route(&node, &AnswerValue::Number(80.0)).unwrap();
        assert_eq!(t.classification_id.as_deref(), Some("FAST"));

        let t = route(&node, &AnswerValue::Number(30.0)).unwrap();
        assert_eq!(t.classification_id.as_deref(), Some("NORMAL"));

        assert_eq!(
            route(&node, &AnswerValue::Number(5.0)).unwrap_err(),
            RuntimeError::NoMatchingRule {
                node_id: "rr".to_string()
            }
        );
    }

    #[test]
    fn test_node_without_routing_is_dead_end() {
        let node = Node::new("end", "Done", NodeType::Boolean);
        let t = route(&node, &AnswerValue::from("anything")).unwrap();
        assert_eq!(t.next_node(), None);
        assert_eq!(t.classification(), None);
    }
}
