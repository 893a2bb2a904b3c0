//! Unit systems and conversion constants
//!
//! Heights and weights arrive either metric (cm, kg) or US customary
//! (inches, pounds). Everything downstream works in metric.

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Kilograms per avoirdupois pound
pub const KG_PER_LB: f64 = 0.45359237;

/// Measurement system of a BMI request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    /// Centimeters and kilograms
    Metric,
    /// Inches and pounds
    Us,
}

impl UnitSystem {
    /// Parse a caller-supplied label
    ///
    /// Only "us" (any case) selects US units. Every other label, including
    /// ones we do not recognise, is metric.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("us") {
            UnitSystem::Us
        } else {
            UnitSystem::Metric
        }
    }
}

/// Height and weight converted to metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricMeasurements {
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Convert raw measurements to centimeters and kilograms
pub fn normalize(height: f64, weight: f64, system: UnitSystem) -> MetricMeasurements {
    match system {
        UnitSystem::Metric => MetricMeasurements {
            height_cm: height,
            weight_kg: weight,
        },
        UnitSystem::Us => MetricMeasurements {
            height_cm: height * CM_PER_INCH,
            weight_kg: weight * KG_PER_LB,
        },
    }
}
