//! Age- and measurement-dependent thresholds

use triage_core::ClinicalFindings;

/// SpO2 below this (%) is low saturation and forces the fast-breathing flag
pub const LOW_SPO2_PERCENT: f64 = 90.0;

/// Axillary temperature below this (°C) is low body temperature
pub const LOW_TEMPERATURE_C: f64 = 35.5;

/// Axillary temperature at or above this (°C) is fever
pub const FEVER_TEMPERATURE_C: f64 = 37.5;

/// Breaths per minute at or above which breathing is fast.
///
/// | age            | threshold |
/// |----------------|-----------|
/// | < 2 months     | 60        |
/// | 2 to 12 months | 50        |
/// | 12 months +    | 40        |
///
/// An unknown age uses the 12-59 month threshold.
pub fn fast_breathing_threshold(age_months: Option<u32>) -> u32 {
    match age_months {
        Some(age) if age < 2 => 60,
        Some(age) if age < 12 => 50,
        _ => 40,
    }
}

/// Whether `rate` breaths per minute counts as fast breathing at this age
pub fn is_fast_breathing(age_months: Option<u32>, rate: f64) -> bool {
    rate >= f64::from(fast_breathing_threshold(age_months))
}

/// Whole units completed so far: 1.6 months of age is 1 completed month.
///
/// Flooring keeps `completed_units(x) >= t` equivalent to `x >= t` for any
/// whole threshold `t`.
pub fn completed_units(value: f64) -> u32 {
    value.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Recompute every derived flag from the stored measurements
pub(crate) fn recompute_derived(findings: &mut ClinicalFindings) {
    findings.low_oxygen_saturation = findings
        .oxygen_saturation
        .map_or(false, |spo2| spo2 < LOW_SPO2_PERCENT);

    let rate_is_fast = findings
        .respiratory_rate
        .map_or(false, |rate| is_fast_breathing(findings.age_months, f64::from(rate)));
    findings.fast_breathing = rate_is_fast || findings.low_oxygen_saturation;

    findings.low_temperature = findings
        .temperature
        .map_or(false, |t| t < LOW_TEMPERATURE_C);
    findings.fever_present = findings
        .temperature
        .map_or(false, |t| t >= FEVER_TEMPERATURE_C);
}
