//! Product Tools
//!
//! Read-only catalog views for the product page.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Product, Review};

/// Slug shown when the caller does not ask for one
pub const DEFAULT_SLUG: &str = "berry-nut-energy-bar";

const SIMILAR_LIMIT: i64 = 6;
const SUGGESTION_LIMIT: i64 = 6;
const REVIEW_LIMIT: i64 = 20;

/// Review as displayed on the product page
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub user_name: String,
    pub review_text: String,
    pub rating: f64,
    pub created_at: String,
    pub created_label: String,
}

impl ReviewView {
    fn new(review: Review, now: NaiveDateTime) -> Self {
        let created_label = review.created_label(now);
        Self {
            user_name: review.user_name,
            review_text: review.review_text,
            rating: review.rating,
            created_at: review.created_at,
            created_label,
        }
    }
}

/// Response for get_product_page
#[derive(Debug, Serialize)]
pub struct ProductPageResponse {
    pub product: Product,
    pub similar: Vec<Product>,
    pub reviews: Vec<ReviewView>,
    pub suggestions: Vec<Product>,
}

/// Response for list_products
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<Product>,
}

/// Message returned when the catalog is empty
pub const EMPTY_CATALOG_MESSAGE: &str = "No product data found. Please seed the database first.";

/// Everything the product page needs for one product
///
/// A blank slug means [`DEFAULT_SLUG`]; an unknown slug falls back to the
/// first product. `Ok(None)` only when the catalog is empty.
pub fn get_product_page(db: &Database, slug: Option<&str>) -> Result<Option<ProductPageResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let slug = slug.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SLUG);

    let product = match Product::get_by_slug(&conn, slug).map_err(|e| format!("Failed to get product: {}", e))? {
        Some(p) => p,
        None => match Product::first(&conn).map_err(|e| format!("Failed to get product: {}", e))? {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let similar = Product::list_similar(&conn, product.id, SIMILAR_LIMIT)
        .map_err(|e| format!("Failed to list similar products: {}", e))?;

    let now = Utc::now().naive_utc();
    let reviews = Review::list_for_product(&conn, product.id, REVIEW_LIMIT)
        .map_err(|e| format!("Failed to list reviews: {}", e))?
        .into_iter()
        .map(|r| ReviewView::new(r, now))
        .collect();

    let suggestions = Product::list_by_tag(&conn, product.category_tag, SUGGESTION_LIMIT)
        .map_err(|e| format!("Failed to list suggestions: {}", e))?;

    Ok(Some(ProductPageResponse {
        product,
        similar,
        reviews,
        suggestions,
    }))
}

/// Every product, ordered by id
pub fn list_products(db: &Database) -> Result<ListProductsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let products = Product::list_all(&conn).map_err(|e| format!("Failed to list products: {}", e))?;

    Ok(ListProductsResponse { products })
}
