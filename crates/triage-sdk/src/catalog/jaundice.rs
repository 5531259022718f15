//! Jaundice (young infant up to 2 months)

use triage_core::{Node, NodeType, NumericBounds, Outcome, SeverityColor, Transition, Tree};
use triage_runtime::classifier::imci::{
    JAUNDICE, NO_JAUNDICE, SEVERE_JAUNDICE, YOUNG_INFANT_JAUNDICE_TREE,
};

pub fn tree() -> Tree {
    Tree::new(YOUNG_INFANT_JAUNDICE_TREE, "Check for jaundice", "age_days")
        .with_instructions("Look for yellow skin and eyes in daylight.")
        .with_node(
            Node::new("age_days", "Age of the infant in days", NodeType::Numeric)
                .with_bounds(NumericBounds::new(0.0, 59.0).with_step(1.0))
                .with_help("Enter 0 for a baby born today.")
                .on_value(Transition::to_node("jaundice_present")),
        )
        .with_node(
            Node::new("jaundice_present", "Is there jaundice?", NodeType::Boolean)
                .on("yes", Transition::to_node("palms_soles_yellow"))
                .on("no", Transition::deferred()),
        )
        .with_node(
            Node::new("palms_soles_yellow", "Are the palms and soles yellow?", NodeType::Boolean)
                .at_depth(1, "jaundice_present")
                .visible_when("jaundice_present.yes")
                .on("yes", Transition::deferred().emergency())
                .on("no", Transition::deferred()),
        )
        .with_outcome(
            SEVERE_JAUNDICE,
            Outcome::new("Severe jaundice", SeverityColor::Pink)
                .emergency()
                .with_actions(&[
                    "Treat to prevent low blood sugar",
                    "Keep the infant warm",
                    "Refer urgently to hospital",
                ])
                .with_treatment("Urgent referral for phototherapy"),
        )
        .with_outcome(
            JAUNDICE,
            Outcome::new("Jaundice", SeverityColor::Yellow)
                .with_actions(&["Advise the mother to give home care"])
                .with_follow_up(&["Follow up in 1 day"])
                .with_advice("Breastfeed frequently; return if palms or soles turn yellow."),
        )
        .with_outcome(
            NO_JAUNDICE,
            Outcome::new("No jaundice", SeverityColor::Green)
                .with_advice("Continue exclusive breastfeeding."),
        )
}
