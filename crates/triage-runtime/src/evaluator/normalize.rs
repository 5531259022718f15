//! Answer normalization by node type

use crate::error::{Result, RuntimeError};
use triage_core::{AnswerValue, Node, NodeType};

/// Coerce a raw answer to the shape the node expects.
///
/// - boolean: `true`/`false` become `"yes"`/`"no"`; text is kept
/// - single choice: text, booleans as `"yes"`/`"no"`, numbers rendered
/// - multi choice: a list, or a single text promoted to a one-element list
/// - numeric: a number or numeric text, within `numeric_bounds` when declared
/// - computed: anything
///
/// The normalized value is what gets stored in the session.
pub fn normalize_answer(node: &Node, answer: AnswerValue) -> Result<AnswerValue> {
    let mismatch = |expected: &str, answer: &AnswerValue| {
        RuntimeError::invalid_answer(
            &node.id,
            format!("expected {}, got {} '{}'", expected, answer.type_name(), answer),
        )
    };

    match node.node_type {
        NodeType::Boolean => match answer {
            AnswerValue::Bool(_) | AnswerValue::Text(_) => Ok(text_of(&answer)),
            other => Err(mismatch("yes or no", &other)),
        },
        NodeType::SingleChoice => match answer {
            AnswerValue::List(_) => Err(mismatch("a single choice", &answer)),
            other => Ok(text_of(&other)),
        },
        NodeType::MultiChoice => match answer {
            AnswerValue::List(items) => Ok(AnswerValue::List(items)),
            AnswerValue::Text(item) => Ok(AnswerValue::List(vec![item])),
            other => Err(mismatch("a list of choices", &other)),
        },
        NodeType::Numeric => {
            let value = answer
                .as_number()
                .filter(|n| n.is_finite())
                .ok_or_else(|| mismatch("a number", &answer))?;

            if let Some(bounds) = &node.numeric_bounds {
                if !bounds.contains(value) {
                    return Err(RuntimeError::invalid_answer(
                        &node.id,
                        format!("{} is outside the accepted range {}", value, describe_bounds(bounds)),
                    ));
                }
            }
            Ok(AnswerValue::Number(value))
        }
        NodeType::Computed => Ok(answer),
    }
}

fn text_of(answer: &AnswerValue) -> AnswerValue {
    match answer.as_text() {
        Some(text) => AnswerValue::Text(text.to_string()),
        None => AnswerValue::Text(answer.render()),
    }
}

fn describe_bounds(bounds: &triage_core::NumericBounds) -> String {
    let min = bounds.min.map_or("-inf".to_string(), |v| v.to_string());
    let max = bounds.max.map_or("+inf".to_string(), |v| v.to_string());
    match bounds.step {
        Some(step) => format!("[{}, {}] in steps of {}", min, max, step),
        None => format!("[{}, {}]", min, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::NumericBounds;

    #[test]
    fn test_boolean_normalization() {
        let node = Node::new("cough", "Cough?", NodeType::Boolean);
        assert_eq!(
            normalize_answer(&node, AnswerValue::Bool(true)).unwrap(),
            AnswerValue::from("yes")
        );
        assert_eq!(
            normalize_answer(&node, AnswerValue::from("maybe")).unwrap(),
            AnswerValue::from("maybe")
        );
        assert!(normalize_answer(&node, AnswerValue::Number(1.0)).is_err());
    }

    #[test]
    fn test_single_choice_normalization() {
        let node = Node::new("stage", "Stage", NodeType::SingleChoice);
        assert_eq!(
            normalize_answer(&node, AnswerValue::Number(2.0)).unwrap(),
            AnswerValue::from("2")
        );
        assert!(normalize_answer(&node, AnswerValue::from(vec!["a"])).is_err());
    }

    #[test]
    fn test_multi_choice_promotes_text() {
        let node = Node::new("signs", "Signs", NodeType::MultiChoice);
        assert_eq!(
            normalize_answer(&node, AnswerValue::from("stridor")).unwrap(),
            AnswerValue::from(vec!["stridor"])
        );
        assert!(normalize_answer(&node, AnswerValue::Bool(true)).is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        let node = Node::new("rr", "Rate", NodeType::Numeric)
            .with_bounds(NumericBounds::new(10.0, 120.0).with_step(1.0));

        assert_eq!(
            normalize_answer(&node, AnswerValue::from("55")).unwrap(),
            AnswerValue::Number(55.0)
        );
        assert!(normalize_answer(&node, AnswerValue::Number(130.0)).is_err());
        assert!(normalize_answer(&node, AnswerValue::Number(55.5)).is_err());
        assert!(normalize_answer(&node, AnswerValue::from("fast")).is_err());
        assert!(normalize_answer(&node, AnswerValue::Number(f64::NAN)).is_err());
    }

    #[test]
    fn test_numeric_without_bounds() {
        let node = Node::new("z", "Z-score", NodeType::Numeric);
        assert_eq!(
            normalize_answer(&node, AnswerValue::Number(-3.5)).unwrap(),
            AnswerValue::Number(-3.5)
        );
    }
}
