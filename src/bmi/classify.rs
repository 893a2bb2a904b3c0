//! BMI arithmetic and weight-category classification

use crate::models::CategoryTag;

/// Weight category for a BMI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    UnderWeight,
    Normal,
    OverWeight,
    Obese,
}

/// Ordered bands of (exclusive upper bound, category). Values at or above
/// the last bound are `Obese`.
const BANDS: [(f64, BmiCategory); 3] = [
    (18.5, BmiCategory::UnderWeight),
    (25.0, BmiCategory::Normal),
    (30.0, BmiCategory::OverWeight),
];

impl BmiCategory {
    /// Classify a (rounded) BMI value
    pub fn classify(bmi: f64) -> Self {
        BANDS
            .iter()
            .find(|(upper, _)| bmi < *upper)
            .map(|(_, category)| *category)
            .unwrap_or(BmiCategory::Obese)
    }

    /// Display label, also what gets stored with the calculation
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::UnderWeight => "Under Weight",
            BmiCategory::Normal => "Normal",
            BmiCategory::OverWeight => "Over Weight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Product tag used for suggestions
    pub fn tag(&self) -> CategoryTag {
        match self {
            BmiCategory::UnderWeight => CategoryTag::Gain,
            BmiCategory::Normal => CategoryTag::Maintain,
            BmiCategory::OverWeight | BmiCategory::Obese => CategoryTag::Loss,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BmiCategory::UnderWeight => "#00A6AA",
            BmiCategory::Normal => "#2E7D32",
            BmiCategory::OverWeight => "#F57C00",
            BmiCategory::Obese => "#C62828",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            BmiCategory::UnderWeight => "rgba(0, 166, 170, 0.15)",
            BmiCategory::Normal => "rgba(46, 125, 50, 0.15)",
            BmiCategory::OverWeight => "rgba(245, 124, 0, 0.15)",
            BmiCategory::Obese => "rgba(198, 40, 40, 0.15)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::UnderWeight => {
                "Based on your BMI, we recommend nutrient-dense meals with increased calorie intake for healthy weight gain."
            }
            BmiCategory::Normal => {
                "Great range. We recommend balanced meals to maintain stamina, strength, and hydration on your treks."
            }
            BmiCategory::OverWeight => {
                "We recommend lower-calorie, high-fiber meals with good protein to support gradual fat loss and endurance."
            }
            BmiCategory::Obese => {
                "We recommend portion-controlled, high-protein options and consistent activity. Consider medical guidance as needed."
            }
        }
    }
}

/// Round to one decimal place, halves away from zero
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// BMI from metric measurements, rounded to one decimal
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_one_decimal(weight_kg / (height_m * height_m))
}
