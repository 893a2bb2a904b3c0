//! Review model
//!
//! Customer reviews attached to a product.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Timestamp format written by SQLite's `datetime('now')`
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A product review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_name: String,
    pub review_text: String,
    pub rating: f64,
    pub created_at: String,
}

/// Data for creating a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub product_id: i64,
    pub user_name: String,
    pub review_text: String,
    pub rating: f64,
    /// Defaults to now
    pub created_at: Option<String>,
}

impl Review {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            user_name: row.get("user_name")?,
            review_text: row.get("review_text")?,
            rating: row.get("rating")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new review
    pub fn create(conn: &Connection, data: &ReviewCreate) -> DbResult<Self> {
        let created_at = data
            .created_at
            .clone()
            .unwrap_or_else(|| Utc::now().format(SQLITE_DATETIME_FORMAT).to_string());

        conn.execute(
            r#"
            INSERT INTO reviews (product_id, user_name, review_text, rating, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.product_id,
                data.user_name.trim(),
                data.review_text.trim(),
                data.rating,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM reviews WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// Newest reviews for a product
    pub fn list_for_product(conn: &Connection, product_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM reviews WHERE product_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let reviews = stmt
            .query_map(params![product_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    /// Relative age of the review, e.g. "3 days ago"
    pub fn created_label(&self, now: NaiveDateTime) -> String {
        created_label(&self.created_at, now)
    }
}

/// Whole days between `created_at` and `now`, never less than one
///
/// Anything that does not parse as a SQLite or RFC 3339 timestamp counts as
/// one day old.
pub fn created_label(created_at: &str, now: NaiveDateTime) -> String {
    let created = NaiveDateTime::parse_from_str(created_at, SQLITE_DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(created_at)
                .ok()
                .map(|dt| dt.naive_utc())
        });

    let days = created
        .map(|c| (now - c).num_days().abs())
        .unwrap_or(1)
        .max(1);

    if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", days)
    }
}
