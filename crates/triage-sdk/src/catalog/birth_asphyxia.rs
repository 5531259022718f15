//! Birth asphyxia check (newborn, first minutes of life)

use triage_core::{Node, NodeType, Outcome, SeverityColor, Transition, Tree};

pub const TREE_ID: &str = "birth_asphyxia_check";

pub const BIRTH_ASPHYXIA: &str = "BIRTH_ASPHYXIA";
pub const NO_BIRTH_ASPHYXIA: &str = "NO_BIRTH_ASPHYXIA";

fn yes_no(node: Node, yes: Transition, no: Transition) -> Node {
    node.on("yes", yes).on("no", no)
}

fn asphyxia() -> Transition {
    Transition::to_outcome(BIRTH_ASPHYXIA)
        .with_severity("severe")
        .emergency()
}

pub fn tree() -> Tree {
    Tree::new(TREE_ID, "Check for birth asphyxia", "check_birth_asphyxia")
        .with_instructions("Assess immediately after birth, while drying the baby.")
        .with_node(yes_no(
            Node::new(
                "check_birth_asphyxia",
                "Is the newborn being assessed right after delivery?",
                NodeType::Boolean,
            ),
            Transition::to_node("not_breathing"),
            Transition::to_outcome(NO_BIRTH_ASPHYXIA),
        ))
        .with_node(yes_no(
            Node::new("not_breathing", "Is the baby not breathing at all?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia"),
            asphyxia(),
            Transition::to_node("gasping"),
        ))
        .with_node(yes_no(
            Node::new("gasping", "Is the baby gasping?", NodeType::Boolean)
                .at_depth(1, "check_birth_asphyxia")
                .visible_when("not_breathing.no"),
            asphyxia(),
            Transition::to_node("breathing_poorly"),
        ))
        .with_node(yes_no(
            Node::new(
                "breathing_poorly",
                "Is breathing poor (less than 30 breaths per minute)?",
                NodeType::Boolean,
            )
            .at_depth(1, "check_birth_asphyxia")
            .visible_when("not_breathing.no AND gasping.no"),
            asphyxia(),
            Transition::to_node("breathing_normally"),
        ))
        .with_node(yes_no(
            Node::new(
                "breathing_normally",
                "Is the baby breathing normally and crying?",
                NodeType::Boolean,
            )
            .at_depth(1, "check_birth_asphyxia")
            .visible_when("not_breathing.no AND gasping.no AND breathing_poorly.no"),
            Transition::to_outcome(NO_BIRTH_ASPHYXIA),
            asphyxia(),
        ))
        .with_outcome(
            BIRTH_ASPHYXIA,
            Outcome::new("Birth asphyxia", SeverityColor::Pink)
                .emergency()
                .with_actions(&[
                    "Call for help",
                    "Position the head and clear the airway",
                    "Ventilate with bag and mask",
                    "Refer urgently after resuscitation",
                ])
                .with_treatment("Neonatal resuscitation")
                .with_follow_up(&["Monitor breathing and temperature every 15 minutes"])
                .with_advice("Keep the baby warm and skin-to-skin once breathing."),
        )
        .with_outcome(
            NO_BIRTH_ASPHYXIA,
            Outcome::new("No birth asphyxia", SeverityColor::Green)
                .with_actions(&["Keep warm", "Initiate breastfeeding within one hour"])
                .with_advice("Breastfeed exclusively and keep the baby warm."),
        )
}
