//! BMI Tools
//!
//! Entry points shared by the MCP and HTTP surfaces.

use serde_json::Value;

use crate::bmi::{evaluate, BmiRequest, BmiResponse, EvaluateError};
use crate::db::Database;

/// Evaluate a raw JSON payload as submitted by the BMI form
pub fn calculate_bmi_from_payload(db: &Database, payload: &Value) -> Result<BmiResponse, EvaluateError> {
    calculate_bmi(db, &BmiRequest::from_payload(payload))
}

/// Evaluate an already-coerced request
pub fn calculate_bmi(db: &Database, request: &BmiRequest) -> Result<BmiResponse, EvaluateError> {
    evaluate(db, db, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::models::BmiCalculation;
    use serde_json::json;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db
    }

    #[test]
    fn test_payload_round_trip_through_store() {
        let db = setup();
        let response = calculate_bmi_from_payload(
            &db,
            &json!({"age": 30, "height": "70", "weight": 180, "unit": "US", "gender": "Male", "exerciseIndex": 1}),
        )
        .unwrap();

        assert_eq!(response.bmi, 25.8);
        assert_eq!(response.category, "Over Weight");

        let stored = db.with_conn(|conn| BmiCalculation::get_by_id(conn, 1)).unwrap().unwrap();
        assert_eq!(stored.gender, "Male");
        assert_eq!(stored.exercise_index, 1);
        assert_eq!(stored.unit_system, "US");
    }

    #[test]
    fn test_missing_fields_are_rejected_without_writes() {
        let db = setup();
        let err = calculate_bmi_from_payload(&db, &json!({"height": 170, "weight": 70})).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid BMI input.");
        assert_eq!(db.with_conn(|conn| BmiCalculation::count(conn)).unwrap(), 0);
    }

    #[test]
    fn test_unmigrated_store_is_a_server_error() {
        let db = Database::in_memory().unwrap();
        let err = calculate_bmi_from_payload(&db, &json!({"age": 23, "height": 159, "weight": 55})).unwrap_err();
        assert!(matches!(err, EvaluateError::Store(_)));
    }
}
