//! BMI evaluation module
//!
//! Request coercion, unit handling, classification and the evaluator.

pub mod classify;
pub mod error;
pub mod evaluator;
pub mod request;
pub mod units;

pub use classify::{compute_bmi, round_one_decimal, BmiCategory};
pub use error::EvaluateError;
pub use evaluator::{
    assess, evaluate, BmiOutcome, BmiResponse, CalculationStore, ProductCatalog, ProductSummary,
    SUGGESTION_LIMIT,
};
pub use request::BmiRequest;
pub use units::{normalize, MetricMeasurements, UnitSystem};
