//! Test modules for the traversal engine



use crate::classifier::{imci, ClassifierRegistry};
use crate::engine::TraversalEngine;
use crate::registry::TreeRegistry;
use triage_core::{
    AnswerValue, Answers, Node, NodeType, NumericBounds, Outcome, Rule, RuleKind, SeverityColor,
    Transition, Tree,
};

/// Dialect A: exact answer keys
pub(crate) fn birth_asphyxia_tree() -> Tree {
    let yes_no = |node: Node, yes: Transition, no: Transition| node.on("yes", yes).on("no", no);

    Tree::new("birth_asphyxia_check", "Check for birth asphyxia", "check_birth_asphyxia")
        .with_node(yes_no(
            Node::new("check_birth_asphyxia", "Assess for birth asphyxia now?", NodeType::Boolean),
            Transition::to_node("not_breathing"),
            Transition::to_outcome("NO_BIRTH_ASPHYXIA"),
        ))
        .with_node(yes_no(
            Node::new("not_breathing", "Not breathing at all?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia"),
            Transition::to_outcome("BIRTH_ASPHYXIA").with_severity("severe").emergency(),
            Transition::to_node("gasping"),
        ))
        .with_node(yes_no(
            Node::new("gasping", "Gasping?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia")
                .visible_when("not_breathing.no"),
            Transition::to_outcome("BIRTH_ASPHYXIA").emergency(),
            Transition::to_node("breathing_poorly"),
        ))
        .with_node(yes_no(
            Node::new("breathing_poorly", "Breathing poorly (< 30/min)?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia")
                .visible_when("not_breathing.no AND gasping.no"),
            Transition::to_outcome("BIRTH_ASPHYXIA").emergency(),
            Transition::to_node("breathing_normally"),
        ))
        .with_node(yes_no(
            Node::new("breathing_normally", "Breathing normally and crying?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia"),
            Transition::to_outcome("NO_BIRTH_ASPHYXIA"),
            Transition::to_outcome("BIRTH_ASPHYXIA").emergency(),
        ))
        .with_outcome(
            "BIRTH_ASPHYXIA",
            Outcome::new("Birth asphyxia", SeverityColor::Pink)
                .emergency()
                .with_actions(&["Clear the airway", "Ventilate with bag and mask", "Refer urgently"]),
        )
        .with_outcome(
            "NO_BIRTH_ASPHYXIA",
            Outcome::new("No birth asphyxia", SeverityColor::Green),
        )
}

/// Dialect B with a self-looping gate
pub(crate) fn danger_signs_tree() -> Tree {
    Tree::new("general_danger_signs", "General danger signs", "child_calm")
        .with_node(
            Node::new("child_calm", "Is the child calm?", NodeType::Boolean)
                .on("no", Transition::to_node("child_calm"))
                .on("yes", Transition::to_node("danger_signs")),
        )
        .with_node(
            Node::new("danger_signs", "Which danger signs are present?", NodeType::MultiChoice)
                .with_options(&["unable_to_drink", "vomits_everything", "convulsions", "none"])
                .rule(
                    Rule::new(
                        RuleKind::AnySelected,
                        Transition::to_outcome("VERY_SEVERE_DISEASE").emergency(),
                    )
                    .with_options(&["unable_to_drink", "vomits_everything", "convulsions"]),
                )
                .rule(
                    Rule::new(RuleKind::NoneSelected, Transition::to_node("temperature"))
                        .with_options(&["none"]),
                ),
        )
        .with_node(
            Node::new("temperature", "Axillary temperature", NodeType::Numeric)
                .with_bounds(NumericBounds::new(30.0, 43.0).with_step(0.1))
                .rule(
                    Rule::new(RuleKind::BelowThreshold, Transition::to_outcome("LOW_BODY_TEMPERATURE"))
                        .with_threshold(35.5),
                )
                .rule(
                    Rule::new(RuleKind::WithinRange, Transition::to_outcome("NO_DANGER_SIGNS"))
                        .with_range(35.5, 37.4),
                )
                .rule(
                    Rule::new(RuleKind::AboveThreshold, Transition::to_outcome("FEVER"))
                        .with_threshold(37.4),
                ),
        )
        .with_outcome(
            "VERY_SEVERE_DISEASE",
            Outcome::new("Very severe disease", SeverityColor::Pink).emergency(),
        )
        .with_outcome(
            "LOW_BODY_TEMPERATURE",
            Outcome::new("Low body temperature", SeverityColor::Yellow),
        )
        .with_outcome("FEVER", Outcome::new("Fever", SeverityColor::Yellow))
        .with_outcome(
            "NO_DANGER_SIGNS",
            Outcome::new("No general danger signs", SeverityColor::Green),
        )
}

/// Every path defers to the malnutrition classifier
pub(crate) fn malnutrition_tree() -> Tree {
    Tree::new(imci::MALNUTRITION_TREE, "Acute malnutrition", "edema")
        .with_node(
            Node::new("edema", "Oedema of both feet?", NodeType::Boolean)
                .on("yes", Transition::to_node("muac_mm"))
                .on("no", Transition::to_node("muac_mm")),
        )
        .with_node(
            Node::new("muac_mm", "MUAC (mm)", NodeType::Numeric)
                .with_bounds(NumericBounds::new(50.0, 250.0))
                .on_value(Transition::to_node("medical_complication")),
        )
        .with_node(
            Node::new("medical_complication", "Any medical complication?", NodeType::Boolean)
                .on("yes", Transition::deferred())
                .on("no", Transition::deferred()),
        )
        .with_outcome(
            imci::COMPLICATED_SAM,
            Outcome::new("Complicated severe acute malnutrition", SeverityColor::Pink).emergency(),
        )
        .with_outcome(
            imci::UNCOMPLICATED_SAM,
            Outcome::new("Uncomplicated severe acute malnutrition", SeverityColor::Yellow),
        )
        .with_outcome(
            imci::MAM,
            Outcome::new("Moderate acute malnutrition", SeverityColor::Yellow),
        )
        .with_outcome(
            imci::NO_ACUTE_MALNUTRITION,
            Outcome::new("No acute malnutrition", SeverityColor::Green),
        )
}

/// Second node routes nowhere
pub(crate) fn dead_end_tree() -> Tree {
    Tree::new("dead_end", "Dead end", "first")
        .with_node(
            Node::new("first", "First?", NodeType::Boolean)
                .on("yes", Transition::to_node("second"))
                .on("no", Transition::to_node("second")),
        )
        .with_node(
            Node::new("second", "Second?", NodeType::Boolean)
                .on("yes", Transition::default())
                .on("no", Transition::default()),
        )
}

pub(crate) fn engine() -> TraversalEngine {
    let mut registry = TreeRegistry::new();
    registry
        .register_all([
            birth_asphyxia_tree(),
            danger_signs_tree(),
            malnutrition_tree(),
            dead_end_tree(),
        ])
        .expect("fixture trees are valid");

    TraversalEngine::new(registry).with_classifiers(ClassifierRegistry::imci())
}

pub(crate) fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
