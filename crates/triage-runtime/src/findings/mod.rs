//! Clinical findings projection
//!
//! After each accepted answer the projector writes the answer into the
//! session's `ClinicalFindings` according to a per-node rule, then recomputes
//! every derived flag (fast breathing, low saturation, fever, low temperature)
//! from the stored measurements. Writes overwrite; re-submitting a node
//! replaces whatever that node set before.

mod thresholds;

pub use thresholds::{
    completed_units, fast_breathing_threshold, is_fast_breathing, FEVER_TEMPERATURE_C,
    LOW_SPO2_PERCENT, LOW_TEMPERATURE_C,
};

use std::collections::HashMap;
use triage_core::{AnswerValue, Answers, ClinicalFindings, Tree};

/// Boolean fields of `ClinicalFindings` a rule may write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolField {
    UnableToDrinkOrBreastfeed,
    VomitsEverything,
    Convulsions,
    LethargicOrUnconscious,
    ConvulsingNow,
    NotBreathing,
    Gasping,
    BreathingPoorly,
    CoughPresent,
    ChestIndrawing,
    Stridor,
    Wheezing,
    BilateralPittingEdema,
    MedicalComplication,
    FailedAppetiteTest,
    JaundicePresent,
    JaundicePalmsSoles,
    DiarrhoeaPresent,
    BloodInStool,
    SunkenEyes,
    SkinPinchSlow,
}

impl BoolField {
    fn slot(self, findings: &mut ClinicalFindings) -> &mut bool {
        match self {
            BoolField::UnableToDrinkOrBreastfeed => &mut findings.unable_to_drink_or_breastfeed,
            BoolField::VomitsEverything => &mut findings.vomits_everything,
            BoolField::Convulsions => &mut findings.convulsions,
            BoolField::LethargicOrUnconscious => &mut findings.lethargic_or_unconscious,
            BoolField::ConvulsingNow => &mut findings.convulsing_now,
            BoolField::NotBreathing => &mut findings.not_breathing,
            BoolField::Gasping => &mut findings.gasping,
            BoolField::BreathingPoorly => &mut findings.breathing_poorly,
            BoolField::CoughPresent => &mut findings.cough_present,
            BoolField::ChestIndrawing => &mut findings.chest_indrawing,
            BoolField::Stridor => &mut findings.stridor,
            BoolField::Wheezing => &mut findings.wheezing,
            BoolField::BilateralPittingEdema => &mut findings.bilateral_pitting_edema,
            BoolField::MedicalComplication => &mut findings.medical_complication,
            BoolField::FailedAppetiteTest => &mut findings.failed_appetite_test,
            BoolField::JaundicePresent => &mut findings.jaundice_present,
            BoolField::JaundicePalmsSoles => &mut findings.jaundice_palms_soles,
            BoolField::DiarrhoeaPresent => &mut findings.diarrhoea_present,
            BoolField::BloodInStool => &mut findings.blood_in_stool,
            BoolField::SunkenEyes => &mut findings.sunken_eyes,
            BoolField::SkinPinchSlow => &mut findings.skin_pinch_slow,
        }
    }
}

/// Measurements stored verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    MuacMm,
    WeightForHeightZ,
}

impl NumberField {
    fn slot(self, findings: &mut ClinicalFindings) -> &mut Option<f64> {
        match self {
            NumberField::MuacMm => &mut findings.muac_mm,
            NumberField::WeightForHeightZ => &mut findings.weight_for_height_z,
        }
    }
}

/// Whole-number counts (days)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    CoughDurationDays,
    DiarrhoeaDays,
}

impl CountField {
    fn slot(self, findings: &mut ClinicalFindings) -> &mut Option<u32> {
        match self {
            CountField::CoughDurationDays => &mut findings.cough_duration_days,
            CountField::DiarrhoeaDays => &mut findings.diarrhoea_days,
        }
    }
}

/// How one node's answer is written into the findings
#[derive(Debug, Clone, PartialEq)]
pub enum FindingRule {
    /// Multi-choice: each mapped option sets its field; unselected options clear theirs.
    /// With `record_danger_signs` the selection is also kept in `danger_signs`.
    Flags {
        options: Vec<(String, BoolField)>,
        record_danger_signs: bool,
    },
    /// Yes/no answer into one field
    Flag(BoolField),
    /// Breaths per minute; drives `fast_breathing`
    RespiratoryRate,
    /// SpO2 percent; drives `low_oxygen_saturation` and `fast_breathing`
    OxygenSaturation,
    /// Axillary °C; drives `fever_present` and `low_temperature`
    Temperature,
    Measurement(NumberField),
    Count(CountField),
    /// Age in months; changes the fast-breathing threshold
    Age,
    /// Free text kept in `other_findings` as `node_id: answer`
    Text,
}

impl FindingRule {
    /// Multi-choice flags from `(option, field)` pairs
    pub fn flags(options: &[(&str, BoolField)]) -> Self {
        FindingRule::Flags {
            options: options
                .iter()
                .map(|(option, field)| (option.to_string(), *field))
                .collect(),
            record_danger_signs: false,
        }
    }
}

/// Maps node ids to finding rules
#[derive(Debug, Clone, Default)]
pub struct FindingsProjector {
    rules: HashMap<String, FindingRule>,
}

impl FindingsProjector {
    /// Create a projector with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Projector for the node ids used by the built-in IMCI catalogue
    pub fn imci() -> Self {
        use BoolField::*;

        let danger_signs = FindingRule::Flags {
            options: vec![
                ("unable_to_drink".to_string(), UnableToDrinkOrBreastfeed),
                ("vomits_everything".to_string(), VomitsEverything),
                ("convulsions".to_string(), Convulsions),
                ("lethargic_or_unconscious".to_string(), LethargicOrUnconscious),
                ("convulsing_now".to_string(), ConvulsingNow),
            ],
            record_danger_signs: true,
        };

        Self::new()
            .with_rule("age_months", FindingRule::Age)
            .with_rule("danger_signs", danger_signs)
            .with_rule("not_breathing", FindingRule::Flag(NotBreathing))
            .with_rule("gasping", FindingRule::Flag(Gasping))
            .with_rule("breathing_poorly", FindingRule::Flag(BreathingPoorly))
            .with_rule("cough_present", FindingRule::Flag(CoughPresent))
            .with_rule(
                "cough_duration_days",
                FindingRule::Count(CountField::CoughDurationDays),
            )
            .with_rule("respiratory_rate", FindingRule::RespiratoryRate)
            .with_rule("oxygen_saturation", FindingRule::OxygenSaturation)
            .with_rule(
                "chest_signs",
                FindingRule::flags(&[
                    ("chest_indrawing", ChestIndrawing),
                    ("stridor", Stridor),
                    ("wheezing", Wheezing),
                ]),
            )
            .with_rule("temperature", FindingRule::Temperature)
            .with_rule("muac_mm", FindingRule::Measurement(NumberField::MuacMm))
            .with_rule("wfh_z", FindingRule::Measurement(NumberField::WeightForHeightZ))
            .with_rule("edema", FindingRule::Flag(BilateralPittingEdema))
            .with_rule("medical_complication", FindingRule::Flag(MedicalComplication))
            .with_rule("failed_appetite_test", FindingRule::Flag(FailedAppetiteTest))
            .with_rule("jaundice_present", FindingRule::Flag(JaundicePresent))
            .with_rule("palms_soles_yellow", FindingRule::Flag(JaundicePalmsSoles))
            .with_rule("diarrhoea_present", FindingRule::Flag(DiarrhoeaPresent))
            .with_rule("diarrhoea_days", FindingRule::Count(CountField::DiarrhoeaDays))
            .with_rule("blood_in_stool", FindingRule::Flag(BloodInStool))
            .with_rule("sunken_eyes", FindingRule::Flag(SunkenEyes))
            .with_rule("skin_pinch_slow", FindingRule::Flag(SkinPinchSlow))
            .with_rule("notes", FindingRule::Text)
    }

    /// Add or replace the rule for a node
    pub fn with_rule(mut self, node_id: impl Into<String>, rule: FindingRule) -> Self {
        self.rules.insert(node_id.into(), rule);
        self
    }

    pub fn rule(&self, node_id: &str) -> Option<&FindingRule> {
        self.rules.get(node_id)
    }

    /// Write one accepted answer into the findings
    pub fn project(&self, findings: &mut ClinicalFindings, node_id: &str, answer: &AnswerValue) {
        let Some(rule) = self.rules.get(node_id) else {
            tracing::trace!("No finding rule for node '{}'", node_id);
            return;
        };

        match rule {
            FindingRule::Flags {
                options,
                record_danger_signs,
            } => {
                let selection = answer.selection();
                for (option, field) in options {
                    *field.slot(findings) = selection.contains(option);
                }
                if *record_danger_signs {
                    findings.danger_signs = selection;
                }
            }
            FindingRule::Flag(field) => *field.slot(findings) = answer.is_yes(),
            FindingRule::RespiratoryRate => {
                findings.respiratory_rate = answer.as_number().map(completed_units)
            }
            FindingRule::OxygenSaturation => findings.oxygen_saturation = answer.as_number(),
            FindingRule::Temperature => findings.temperature = answer.as_number(),
            FindingRule::Measurement(field) => *field.slot(findings) = answer.as_number(),
            FindingRule::Count(field) => {
                *field.slot(findings) = answer.as_number().map(completed_units)
            }
            FindingRule::Age => findings.age_months = answer.as_number().map(completed_units),
            FindingRule::Text => {
                let prefix = format!("{}: ", node_id);
                findings.other_findings.retain(|entry| !entry.starts_with(&prefix));
                findings
                    .other_findings
                    .push(format!("{}{}", prefix, answer.render()));
            }
        }

        thresholds::recompute_derived(findings);
    }

    /// Project a full answer set in tree node order.
    ///
    /// Answers for nodes outside the tree follow, sorted by node id.
    pub fn project_all(&self, findings: &mut ClinicalFindings, tree: &Tree, answers: &Answers) {
        for node in &tree.nodes {
            if let Some(answer) = answers.get(&node.id) {
                self.project(findings, &node.id, answer);
            }
        }

        let mut extra: Vec<&String> = answers
            .keys()
            .filter(|node_id| tree.node(node_id).is_none())
            .collect();
        extra.sort();
        for node_id in extra {
            self.project(findings, node_id, &answers[node_id]);
        }
    }
}
