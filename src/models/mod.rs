//! Data models
//!
//! Rust structs representing database entities.

mod bmi_calculation;
pub(crate) mod product;
mod review;

pub use bmi_calculation::{BmiCalculation, BmiCalculationCreate};
pub use product::{CategoryTag, Product, ProductCreate};
pub use review::{created_label, Review, ReviewCreate};
