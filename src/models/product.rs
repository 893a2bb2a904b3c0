//! Product model
//!
//! Catalog entries. Each product carries a category tag that ties it to the
//! BMI bands it is suggested for.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Suggestion tag shared by products and BMI categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    Gain,
    Maintain,
    Loss,
}

impl CategoryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Gain => "gain",
            CategoryTag::Maintain => "maintain",
            CategoryTag::Loss => "loss",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gain" => Some(CategoryTag::Gain),
            "maintain" => Some(CategoryTag::Maintain),
            "loss" => Some(CategoryTag::Loss),
            _ => None,
        }
    }
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub weight_g: i64,
    pub price: f64,
    pub mrp: f64,
    pub rating: f64,
    pub review_count: i64,
    pub value_proposition: String,
    pub category_tag: CategoryTag,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Data for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub weight_g: i64,
    pub price: f64,
    pub mrp: f64,
    pub rating: f64,
    pub review_count: i64,
    pub value_proposition: String,
    pub category_tag: CategoryTag,
    pub image_url: Option<String>,
}

impl Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tag_str: String = row.get("category_tag")?;
        let category_tag = CategoryTag::from_str(&tag_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("unknown category_tag '{}'", tag_str).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            slug: row.get("slug")?,
            name: row.get("name")?,
            description: row.get("description")?,
            weight_g: row.get("weight_g")?,
            price: row.get("price")?,
            mrp: row.get("mrp")?,
            rating: row.get("rating")?,
            review_count: row.get("review_count")?,
            value_proposition: row.get("value_proposition")?,
            category_tag,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new product
    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO products (slug, name, description, weight_g, price, mrp, rating,
                                  review_count, value_proposition, category_tag, image_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                data.slug.trim(),
                data.name.trim(),
                data.description.trim(),
                data.weight_g,
                data.price,
                data.mrp,
                data.rating,
                data.review_count,
                data.value_proposition.trim(),
                data.category_tag.as_str(),
                data.image_url,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a product by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a product by its URL slug
    pub fn get_by_slug(conn: &Connection, slug: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products WHERE slug = ?1 LIMIT 1")?;

        match stmt.query_row([slug], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The product with the lowest id, used when a slug matches nothing
    pub fn first(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products ORDER BY id ASC LIMIT 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List every product, ordered by id
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products ORDER BY id ASC")?;
        let products = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Top-rated products carrying a tag, best first
    pub fn list_by_tag(conn: &Connection, tag: CategoryTag, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM products WHERE category_tag = ?1 ORDER BY rating DESC, id ASC LIMIT ?2",
        )?;
        let products = stmt
            .query_map(params![tag.as_str(), limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Top-rated products other than the given one
    pub fn list_similar(conn: &Connection, exclude_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM products WHERE id <> ?1 ORDER BY rating DESC, id ASC LIMIT ?2",
        )?;
        let products = stmt
            .query_map(params![exclude_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?)
    }
}
