//! Structured clinical findings
//!
//! `ClinicalFindings` is a typed projection of a session's raw answers. It is
//! maintained incrementally by the runtime's findings projector but is always
//! recomputable from the answers alone.

use serde::{Deserialize, Serialize};

/// Structured observation record derived from answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalFindings {
    // ========== Subject ==========
    /// Age in completed months, used by age-dependent thresholds
    pub age_months: Option<u32>,

    // ========== General danger signs ==========
    pub unable_to_drink_or_breastfeed: bool,
    pub vomits_everything: bool,
    pub convulsions: bool,
    pub lethargic_or_unconscious: bool,
    pub convulsing_now: bool,
    /// Every danger sign selected, as submitted
    pub danger_signs: Vec<String>,

    // ========== Birth asphyxia ==========
    pub not_breathing: bool,
    pub gasping: bool,
    pub breathing_poorly: bool,

    // ========== Cough / difficult breathing ==========
    pub cough_present: bool,
    pub cough_duration_days: Option<u32>,
    pub respiratory_rate: Option<u32>,
    pub fast_breathing: bool,
    pub chest_indrawing: bool,
    pub stridor: bool,
    pub wheezing: bool,
    pub oxygen_saturation: Option<f64>,
    pub low_oxygen_saturation: bool,

    // ========== Temperature ==========
    pub temperature: Option<f64>,
    pub fever_present: bool,
    pub low_temperature: bool,

    // ========== Nutrition ==========
    pub muac_mm: Option<f64>,
    pub weight_for_height_z: Option<f64>,
    pub bilateral_pitting_edema: bool,
    pub medical_complication: bool,
    pub failed_appetite_test: bool,

    // ========== Jaundice ==========
    pub jaundice_present: bool,
    pub jaundice_palms_soles: bool,

    // ========== Diarrhoea ==========
    pub diarrhoea_present: bool,
    pub diarrhoea_days: Option<u32>,
    pub blood_in_stool: bool,
    pub sunken_eyes: bool,
    pub skin_pinch_slow: bool,

    /// Free-form findings that have no dedicated field
    pub other_findings: Vec<String>,
}

impl ClinicalFindings {
    /// Create an empty findings record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for a subject of known age
    pub fn for_age(age_months: Option<u32>) -> Self {
        Self {
            age_months,
            ..Self::default()
        }
    }

    /// Whether any IMCI general danger sign is present
    pub fn has_general_danger_sign(&self) -> bool {
        self.unable_to_drink_or_breastfeed
            || self.vomits_everything
            || self.convulsions
            || self.lethargic_or_unconscious
            || self.convulsing_now
    }
}
