//! Predicate rule evaluation

use triage_core::{AnswerValue, Rule, RuleKind};

/// Check whether a rule holds for a submitted answer.
///
/// Numeric kinds never hold for non-numeric answers, and a rule missing the
/// threshold it needs never holds.
pub fn rule_holds(rule: &Rule, answer: &AnswerValue) -> bool {
    let expected = &rule.expected_options;

    match rule.kind {
        RuleKind::AnySelected => {
            let selection = answer.selection();
            selection.iter().any(|item| expected.contains(item))
        }
        RuleKind::AllSelected => {
            let selection = answer.selection();
            expected.iter().all(|option| selection.contains(option))
        }
        // Element-for-element, in order
        RuleKind::NoneSelected => answer.selection() == *expected,
        RuleKind::Yes => answer.as_text() == Some("yes"),
        RuleKind::No => answer.as_text() == Some("no"),
        RuleKind::AboveThreshold => match (answer.as_number(), rule.thresholds.value) {
            (Some(value), Some(threshold)) => value > threshold,
            _ => false,
        },
        RuleKind::BelowThreshold => match (answer.as_number(), rule.thresholds.value) {
            (Some(value), Some(threshold)) => value < threshold,
            _ => false,
        },
        RuleKind::WithinRange => match (answer.as_number(), rule.thresholds.min, rule.thresholds.max) {
            (Some(value), Some(min), Some(max)) if min > 0.0 && max > 0.0 => {
                min <= value && value <= max
            }
            _ => false,
        },
    }
}
