//! Service Status Tool
//!
//! Provides runtime status information about the service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::{BmiCalculation, Product};

/// Usage notes for AI assistants driving the BMI tools
pub const BMI_INSTRUCTIONS: &str = r#"
# Nomad Spoon BMI Instructions

## calculate_bmi

Required: `age` (years, > 0), `height` (> 0), `weight` (> 0).
Optional: `gender` (free text, default "Unknown"), `unit` (default "Metric"),
`exerciseIndex` (activity level 0-4, default 2, informational only).

| unit      | height      | weight       |
|-----------|-------------|--------------|
| "Metric"  | centimeters | kilograms    |
| "US"      | inches      | pounds       |

Only "US" (any letter case) switches to inches/pounds. Any other value is
treated as metric, so do not send "imperial" or "lbs".

Every successful call is stored. Do not call it just to preview a number.

## Reading the result

- `bmi` is rounded to one decimal.
- `category` is one of: Under Weight (< 18.5), Normal (18.5 - 24.9),
  Over Weight (25 - 29.9), Obese (>= 30). Boundary values belong to the
  higher category.
- `suggestions` lists up to 6 top-rated products for the category.
- If `suggestions_error` is present the BMI is still valid; only the product
  lookup failed.

## Products

- `get_product_page` with a `slug` returns the product, similar products,
  recent reviews and same-category suggestions.
- `list_products` returns the whole catalog.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub product_count: Option<i64>,
    pub calculation_count: Option<i64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    ///
    /// Row counts are `None` when the database cannot be queried.
    pub fn get_status(&self, db: &Database) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let product_count = db.with_conn(|conn| Product::count(conn)).ok();
        let calculation_count = db.with_conn(|conn| BmiCalculation::count(conn)).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            product_count,
            calculation_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
