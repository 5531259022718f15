//! Built-in IMCI decision tables
//!
//! Each table is an ordered if/else chain; the first matching row wins.
//! Node ids referenced here are the answer keys used by the built-in
//! catalogue trees.

use crate::findings::{completed_units, is_fast_breathing};
use triage_core::{Answers, AnswersExt};

pub const MALNUTRITION_TREE: &str = "malnutrition";
pub const COUGH_TREE: &str = "cough_difficult_breathing";
pub const YOUNG_INFANT_JAUNDICE_TREE: &str = "young_infant_jaundice";

/// Marker option meaning "nothing selected" in multi-choice nodes
pub const NONE_OPTION: &str = "none";

// Malnutrition (child 6-59 months)
pub const COMPLICATED_SAM: &str = "COMPLICATED_SAM";
pub const UNCOMPLICATED_SAM: &str = "UNCOMPLICATED_SAM";
pub const MAM: &str = "MAM";
pub const NO_ACUTE_MALNUTRITION: &str = "NO_ACUTE_MALNUTRITION";

// Cough or difficult breathing (child 2-59 months)
pub const SEVERE_PNEUMONIA: &str = "SEVERE_PNEUMONIA";
pub const PNEUMONIA: &str = "PNEUMONIA";
pub const NO_PNEUMONIA: &str = "NO_PNEUMONIA";

// Jaundice (young infant)
pub const SEVERE_JAUNDICE: &str = "SEVERE_JAUNDICE";
pub const JAUNDICE: &str = "JAUNDICE";
pub const NO_JAUNDICE: &str = "NO_JAUNDICE";

/// MUAC below this (mm) is severe wasting
const MUAC_SEVERE_MM: f64 = 115.0;
/// MUAC below this (mm) is moderate wasting
const MUAC_MODERATE_MM: f64 = 125.0;
/// Weight-for-height z-score below this is severe wasting
const WFH_SEVERE_Z: f64 = -3.0;
/// Weight-for-height z-score below this is moderate wasting
const WFH_MODERATE_Z: f64 = -2.0;
/// Oxygen saturation below this (%) is hypoxaemia
pub const HYPOXAEMIA_SPO2: f64 = 90.0;

/// Complicated SAM > uncomplicated SAM > MAM > no acute malnutrition
pub fn classify_malnutrition(answers: &Answers) -> String {
    let muac = answers.number("muac_mm");
    let wfh = answers.number("wfh_z");

    let severe = answers.is_yes("edema")
        || muac.map_or(false, |m| m < MUAC_SEVERE_MM)
        || wfh.map_or(false, |z| z < WFH_SEVERE_Z);

    let complicated = answers.is_yes("medical_complication")
        || answers.is_yes("failed_appetite_test")
        || answers.has_any_selected_except("danger_signs", NONE_OPTION);

    let moderate = muac.map_or(false, |m| m < MUAC_MODERATE_MM)
        || wfh.map_or(false, |z| z < WFH_MODERATE_Z);

    let outcome = if severe && complicated {
        COMPLICATED_SAM
    } else if severe {
        UNCOMPLICATED_SAM
    } else if moderate {
        MAM
    } else {
        NO_ACUTE_MALNUTRITION
    };
    outcome.to_string()
}

/// Severe pneumonia > pneumonia > no pneumonia
///
/// Fast breathing uses the age-dependent threshold with the `age_months`
/// answer; an unknown age uses the 12-59 month threshold.
pub fn classify_cough(answers: &Answers) -> String {
    if !answers.is_yes("cough_present") {
        return NO_PNEUMONIA.to_string();
    }

    let age_months = answers.number("age_months").map(completed_units);
    let hypoxaemia = answers
        .number("oxygen_saturation")
        .map_or(false, |spo2| spo2 < HYPOXAEMIA_SPO2);
    let fast_breathing = answers
        .number("respiratory_rate")
        .map_or(false, |rate| is_fast_breathing(age_months, rate));

    let outcome = if answers.has_any_selected_except("danger_signs", NONE_OPTION)
        || answers.has_selected("chest_signs", "stridor")
        || hypoxaemia
    {
        SEVERE_PNEUMONIA
    } else if answers.has_selected("chest_signs", "chest_indrawing") || fast_breathing {
        PNEUMONIA
    } else {
        NO_PNEUMONIA
    };
    outcome.to_string()
}

/// Severe jaundice > jaundice > no jaundice
///
/// Any jaundice in the first day of life, or yellow palms and soles, is severe.
pub fn classify_young_infant_jaundice(answers: &Answers) -> String {
    if !answers.is_yes("jaundice_present") {
        return NO_JAUNDICE.to_string();
    }

    let first_day = answers.number("age_days").map_or(false, |days| days < 1.0);
    let outcome = if first_day || answers.is_yes("palms_soles_yellow") {
        SEVERE_JAUNDICE
    } else {
        JAUNDICE
    };
    outcome.to_string()
}
