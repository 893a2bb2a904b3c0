//! BMI request intake
//!
//! Payloads come from a browser form, so numbers may arrive as numbers,
//! numeric strings or not at all. Coercion is deliberately loose and
//! validation happens afterwards on the coerced values.

use serde_json::Value;

use super::error::EvaluateError;

pub const DEFAULT_GENDER: &str = "Unknown";
pub const DEFAULT_UNIT: &str = "Metric";
pub const DEFAULT_EXERCISE_INDEX: i64 = 2;

/// A coerced BMI request, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct BmiRequest {
    pub age: i64,
    pub height: f64,
    pub weight: f64,
    pub gender: String,
    pub unit: String,
    pub exercise_index: i64,
}

impl Default for BmiRequest {
    fn default() -> Self {
        Self {
            age: 0,
            height: 0.0,
            weight: 0.0,
            gender: DEFAULT_GENDER.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            exercise_index: DEFAULT_EXERCISE_INDEX,
        }
    }
}

impl BmiRequest {
    /// Coerce an arbitrary JSON payload
    ///
    /// Anything that is not an object behaves like an empty object.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| payload.get(name).filter(|v| !v.is_null());

        Self {
            age: field("age").map(coerce_int).unwrap_or(0),
            height: field("height").map(coerce_float).unwrap_or(0.0),
            weight: field("weight").map(coerce_float).unwrap_or(0.0),
            gender: field("gender")
                .map(coerce_string)
                .unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            unit: field("unit")
                .map(coerce_string)
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            exercise_index: field("exerciseIndex")
                .map(coerce_int)
                .unwrap_or(DEFAULT_EXERCISE_INDEX),
        }
    }

    /// Reject non-positive age, height or weight
    pub fn validate(&self) -> Result<(), EvaluateError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if self.age <= 0 || !positive(self.height) || !positive(self.weight) {
            return Err(EvaluateError::Validation("Invalid BMI input.".to_string()));
        }
        Ok(())
    }
}

/// Numeric value of a JSON scalar
///
/// Strings use their leading numeric prefix ("70.5cm" is 70.5). Non-numeric
/// strings, arrays and objects are 0.
pub fn coerce_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Integer value of a JSON scalar, truncated toward zero
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().map(saturating_trunc).unwrap_or(0)),
        other => saturating_trunc(coerce_float(other)),
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

fn saturating_trunc(v: f64) -> i64 {
    if v.is_finite() {
        // `as` saturates at the i64 bounds
        v.trunc() as i64
    } else {
        0
    }
}

/// Parse the longest leading `[+-]digits[.digits][e[+-]digits]` prefix
fn numeric_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
