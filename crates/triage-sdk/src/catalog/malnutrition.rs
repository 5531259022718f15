//! Acute malnutrition (child 6-59 months)
//!
//! Every path ends in a deferred classification; the outcome comes from the
//! malnutrition decision table over all measurements.

use triage_core::{Node, NodeType, NumericBounds, Outcome, SeverityColor, Transition, Tree};
use triage_runtime::classifier::imci::{
    COMPLICATED_SAM, MALNUTRITION_TREE, MAM, NO_ACUTE_MALNUTRITION, UNCOMPLICATED_SAM,
};

pub fn tree() -> Tree {
    Tree::new(MALNUTRITION_TREE, "Check for acute malnutrition", "edema")
        .with_instructions("Measure MUAC on the left arm; weigh and measure the child.")
        .with_node(
            Node::new("edema", "Is there pitting oedema of both feet?", NodeType::Boolean)
                .on("yes", Transition::to_node("muac_mm"))
                .on("no", Transition::to_node("muac_mm")),
        )
        .with_node(
            Node::new("muac_mm", "Mid-upper arm circumference (mm)", NodeType::Numeric)
                .with_bounds(NumericBounds::new(50.0, 250.0).with_step(1.0))
                .on_value(Transition::to_node("wfh_z")),
        )
        .with_node(
            Node::new("wfh_z", "Weight-for-height z-score", NodeType::Numeric)
                .with_bounds(NumericBounds::new(-6.0, 6.0).with_step(0.1))
                .with_help("Read from the WHO weight-for-height chart.")
                .optional()
                .on_value(Transition::to_node("medical_complication")),
        )
        .with_node(
            Node::new(
                "medical_complication",
                "Is there any medical complication (danger sign, pneumonia, dehydration)?",
                NodeType::Boolean,
            )
            .on("yes", Transition::deferred())
            .on("no", Transition::to_node("failed_appetite_test")),
        )
        .with_node(
            Node::new(
                "failed_appetite_test",
                "Did the child fail the RUTF appetite test?",
                NodeType::Boolean,
            )
            .visible_when("medical_complication.no")
            .on("yes", Transition::deferred())
            .on("no", Transition::deferred()),
        )
        .with_outcome(
            COMPLICATED_SAM,
            Outcome::new("Complicated severe acute malnutrition", SeverityColor::Pink)
                .emergency()
                .with_actions(&[
                    "Give first dose of an appropriate antibiotic",
                    "Treat to prevent low blood sugar",
                    "Keep the child warm",
                    "Refer urgently to hospital",
                ])
                .with_treatment("Inpatient stabilisation"),
        )
        .with_outcome(
            UNCOMPLICATED_SAM,
            Outcome::new("Uncomplicated severe acute malnutrition", SeverityColor::Yellow)
                .with_actions(&[
                    "Give ready-to-use therapeutic food",
                    "Give oral antibiotics for 5 days",
                ])
                .with_treatment("Outpatient therapeutic feeding")
                .with_follow_up(&["Follow up in 7 days"])
                .with_advice("Feed RUTF before other foods and continue breastfeeding."),
        )
        .with_outcome(
            MAM,
            Outcome::new("Moderate acute malnutrition", SeverityColor::Yellow)
                .with_actions(&["Assess feeding and counsel the caregiver"])
                .with_treatment("Supplementary feeding")
                .with_follow_up(&["Follow up in 30 days"])
                .with_advice("Give an extra meal each day."),
        )
        .with_outcome(
            NO_ACUTE_MALNUTRITION,
            Outcome::new("No acute malnutrition", SeverityColor::Green)
                .with_advice("Praise the caregiver and continue age-appropriate feeding."),
        )
}
