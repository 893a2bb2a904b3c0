//! Nomad Spoon Library
//!
//! BMI evaluation and product catalog for the Nomad Spoon storefront.

pub mod bmi;
pub mod build_info;
pub mod config;
pub mod db;
pub mod http;
pub mod mcp;
pub mod models;
pub mod tools;
