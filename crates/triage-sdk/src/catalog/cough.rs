//! Cough or difficult breathing (child 2-59 months)

use triage_core::{
    Node, NodeType, NumericBounds, Outcome, Rule, RuleKind, SeverityColor, Transition, Tree,
};
use triage_runtime::classifier::imci::{
    COUGH_TREE, NONE_OPTION, NO_PNEUMONIA, PNEUMONIA, SEVERE_PNEUMONIA,
};

const DANGER_SIGNS: &[&str] = &[
    "unable_to_drink",
    "vomits_everything",
    "convulsions",
    "lethargic_or_unconscious",
];

const CHEST_SIGNS: &[&str] = &["chest_indrawing", "stridor", "wheezing"];

pub fn tree() -> Tree {
    let mut danger_options = DANGER_SIGNS.to_vec();
    danger_options.push(NONE_OPTION);

    let mut chest_options = CHEST_SIGNS.to_vec();
    chest_options.push(NONE_OPTION);

    let chest_signs = chest_options.iter().fold(
        Node::new(
            "chest_signs",
            "Look and listen: which chest signs are present?",
            NodeType::MultiChoice,
        )
        .with_options(&chest_options)
        .with_help("Look for indrawing when the child breathes in; listen for stridor when calm."),
        |node, option| node.on(*option, Transition::deferred()),
    );

    Tree::new(COUGH_TREE, "Cough or difficult breathing", "age_months")
        .with_instructions("Count breaths for one full minute while the child is calm.")
        .with_node(
            Node::new("age_months", "Age in completed months", NodeType::Numeric)
                .with_bounds(NumericBounds::new(2.0, 59.0).with_step(1.0))
                .on_value(Transition::to_node("cough_present")),
        )
        .with_node(
            Node::new(
                "cough_present",
                "Does the child have cough or difficult breathing?",
                NodeType::Boolean,
            )
            .on("yes", Transition::to_node("cough_duration_days"))
            .on("no", Transition::deferred()),
        )
        .with_node(
            Node::new("cough_duration_days", "For how many days?", NodeType::Numeric)
                .with_bounds(NumericBounds::new(0.0, 365.0).with_step(1.0))
                .at_depth(1, "cough_present")
                .visible_when("cough_present.yes")
                .on_value(Transition::to_node("danger_signs")),
        )
        .with_node(
            Node::new(
                "danger_signs",
                "Any general danger sign?",
                NodeType::MultiChoice,
            )
            .with_options(&danger_options)
            .at_depth(1, "cough_present")
            .visible_when("cough_present.yes")
            .rule(
                Rule::new(RuleKind::AnySelected, Transition::deferred().emergency())
                    .with_options(DANGER_SIGNS),
            )
            .rule(
                Rule::new(RuleKind::NoneSelected, Transition::to_node("respiratory_rate"))
                    .with_options(&[NONE_OPTION]),
            ),
        )
        .with_node(
            Node::new("respiratory_rate", "Breaths in one minute", NodeType::Numeric)
                .with_bounds(NumericBounds::new(5.0, 150.0).with_step(1.0))
                .at_depth(1, "cough_present")
                .on_value(Transition::to_node("oxygen_saturation")),
        )
        .with_node(
            Node::new("oxygen_saturation", "Pulse oximetry SpO2 (%)", NodeType::Numeric)
                .with_bounds(NumericBounds::new(50.0, 100.0))
                .with_help("Leave at 100 if no pulse oximeter is available.")
                .at_depth(1, "cough_present")
                .optional()
                .on_value(Transition::to_node("chest_signs")),
        )
        .with_node(chest_signs.at_depth(1, "cough_present"))
        .with_outcome(
            SEVERE_PNEUMONIA,
            Outcome::new("Severe pneumonia or very severe disease", SeverityColor::Pink)
                .emergency()
                .with_actions(&[
                    "Give oxygen if SpO2 is below 90%",
                    "Give first dose of an appropriate antibiotic",
                    "Refer urgently to hospital",
                ])
                .with_treatment("Pre-referral antibiotic and urgent referral"),
        )
        .with_outcome(
            PNEUMONIA,
            Outcome::new("Pneumonia", SeverityColor::Yellow)
                .with_actions(&["Give oral amoxicillin for 5 days", "Soothe the throat"])
                .with_treatment("Oral amoxicillin")
                .with_follow_up(&["Follow up in 3 days"])
                .with_advice("Return immediately if breathing becomes difficult or fast."),
        )
        .with_outcome(
            NO_PNEUMONIA,
            Outcome::new("No pneumonia: cough or cold", SeverityColor::Green)
                .with_actions(&["Soothe the throat with a safe remedy"])
                .with_follow_up(&["Follow up in 5 days if not improving"])
                .with_advice("Continue feeding; return if the child gets worse."),
        )
}
