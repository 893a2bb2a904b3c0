//! BMI calculation model
//!
//! Append-only log of every evaluation. Rows are written once and never
//! updated or deleted.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A stored BMI evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiCalculation {
    pub id: i64,
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: String,
    /// Unit label exactly as submitted
    pub unit_system: String,
    pub exercise_index: i64,
    pub bmi_value: f64,
    pub bmi_category: String,
    pub created_at: String,
}

/// Data for recording a new evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiCalculationCreate {
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: String,
    pub unit_system: String,
    pub exercise_index: i64,
    pub bmi_value: f64,
    pub bmi_category: String,
}

impl BmiCalculation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            age: row.get("age")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            gender: row.get("gender")?,
            unit_system: row.get("unit_system")?,
            exercise_index: row.get("exercise_index")?,
            bmi_value: row.get("bmi_value")?,
            bmi_category: row.get("bmi_category")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a calculation, returning its id
    pub fn insert(conn: &Connection, data: &BmiCalculationCreate) -> DbResult<i64> {
        conn.execute(
            r#"
            INSERT INTO bmi_calculations (age, height_cm, weight_kg, gender, unit_system,
                                          exercise_index, bmi_value, bmi_category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.age,
                data.height_cm,
                data.weight_kg,
                data.gender,
                data.unit_system,
                data.exercise_index,
                data.bmi_value,
                data.bmi_category,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM bmi_calculations WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(calc) => Ok(Some(calc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM bmi_calculations", [], |row| row.get(0))?)
    }
}
