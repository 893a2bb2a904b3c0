//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PRODUCTS
        -- Catalog entries, tagged for BMI suggestions
        -- ============================================
        CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            weight_g INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            mrp REAL NOT NULL DEFAULT 0,         -- list price before discount
            rating REAL NOT NULL DEFAULT 0,      -- 0.0 - 5.0
            review_count INTEGER NOT NULL DEFAULT 0,
            value_proposition TEXT NOT NULL DEFAULT '',
            category_tag TEXT NOT NULL CHECK(category_tag IN ('gain', 'maintain', 'loss')),
            image_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_products_tag_rating ON products(category_tag, rating DESC);

        -- ============================================
        -- REVIEWS
        -- ============================================
        CREATE TABLE reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            user_name TEXT NOT NULL,
            review_text TEXT NOT NULL,
            rating REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_reviews_product ON reviews(product_id, created_at DESC);

        -- ============================================
        -- BMI CALCULATIONS
        -- Append-only log of evaluations
        -- ============================================
        CREATE TABLE bmi_calculations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            age INTEGER NOT NULL,
            height_cm REAL NOT NULL,             -- post-normalization
            weight_kg REAL NOT NULL,             -- post-normalization
            gender TEXT NOT NULL,
            unit_system TEXT NOT NULL,           -- as submitted, for audit
            exercise_index INTEGER NOT NULL,
            bmi_value REAL NOT NULL,
            bmi_category TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            run_migrations(conn)?;
            assert_eq!(get_schema_version(conn)?, SCHEMA_VERSION);
            assert!(!needs_migration(conn)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_schema_version_errors_without_migrations_table() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            assert!(get_schema_version(conn).is_err());
            assert!(needs_migration(conn).is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_category_tag_is_constrained() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            let result = conn.execute(
                "INSERT INTO products (slug, name, category_tag) VALUES ('x', 'X', 'bulk')",
                [],
            );
            assert!(result.is_err());
            Ok(())
        })
        .unwrap();
    }
}
