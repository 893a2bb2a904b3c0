//! BMI evaluation
//!
//! validate → normalize → calculate → classify → persist → suggest.
//! Storage and catalog access go through the [`CalculationStore`] and
//! [`ProductCatalog`] traits so callers hand in whatever store they hold.

use serde::Serialize;
use tracing::{debug, warn};

use super::classify::{compute_bmi, BmiCategory};
use super::error::EvaluateError;
use super::request::BmiRequest;
use super::units::{normalize, UnitSystem};
use crate::db::{Database, DbResult};
use crate::models::{BmiCalculation, BmiCalculationCreate, CategoryTag, Product};

/// Maximum number of suggested products per evaluation
pub const SUGGESTION_LIMIT: i64 = 6;

/// Where evaluations are recorded
pub trait CalculationStore {
    fn insert_bmi_calculation(&self, record: &BmiCalculationCreate) -> DbResult<i64>;
}

/// Where suggestions come from
pub trait ProductCatalog {
    /// Up to `limit` products with `tag`, highest rating first
    fn find_products_by_tag(&self, tag: CategoryTag, limit: i64) -> DbResult<Vec<Product>>;
}

impl CalculationStore for Database {
    fn insert_bmi_calculation(&self, record: &BmiCalculationCreate) -> DbResult<i64> {
        self.with_conn(|conn| BmiCalculation::insert(conn, record))
    }
}

impl ProductCatalog for Database {
    fn find_products_by_tag(&self, tag: CategoryTag, limit: i64) -> DbResult<Vec<Product>> {
        self.with_conn(|conn| Product::list_by_tag(conn, tag, limit))
    }
}

/// Product fields shown alongside a BMI result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub weight_g: i64,
    pub price: f64,
    pub mrp: f64,
    pub rating: f64,
    pub review_count: i64,
    pub value_proposition: String,
    pub category_tag: CategoryTag,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            weight_g: product.weight_g,
            price: product.price,
            mrp: product.mrp,
            rating: product.rating,
            review_count: product.review_count,
            value_proposition: product.value_proposition.clone(),
            category_tag: product.category_tag,
            image_url: product.image_url.clone(),
        }
    }
}

/// Result of a successful evaluation
#[derive(Debug, Clone, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub category: &'static str,
    pub color: &'static str,
    pub background: &'static str,
    pub description: &'static str,
    pub suggestions: Vec<ProductSummary>,
    /// Set when the catalog lookup failed; `suggestions` is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions_error: Option<String>,
}

/// Pure part of an evaluation: the numbers and the band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiOutcome {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Validate, normalize and classify without touching any store
pub fn assess(request: &BmiRequest) -> Result<BmiOutcome, EvaluateError> {
    request.validate()?;

    let metric = normalize(request.height, request.weight, UnitSystem::from_label(&request.unit));
    let bmi = compute_bmi(metric.height_cm, metric.weight_kg);

    // Extreme inputs can overflow in conversion or division
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(metric.height_cm) || !positive(metric.weight_kg) || !positive(bmi) {
        return Err(EvaluateError::Validation("Invalid BMI input.".to_string()));
    }

    Ok(BmiOutcome {
        height_cm: metric.height_cm,
        weight_kg: metric.weight_kg,
        bmi,
        category: BmiCategory::classify(bmi),
    })
}

/// Run a full evaluation
///
/// A failed insert fails the evaluation. A failed suggestion lookup does not:
/// the result comes back with no suggestions and `suggestions_error` set.
pub fn evaluate<S, C>(store: &S, catalog: &C, request: &BmiRequest) -> Result<BmiResponse, EvaluateError>
where
    S: CalculationStore + ?Sized,
    C: ProductCatalog + ?Sized,
{
    let outcome = assess(request)?;
    let category = outcome.category;

    let record = BmiCalculationCreate {
        age: request.age,
        height_cm: outcome.height_cm,
        weight_kg: outcome.weight_kg,
        gender: request.gender.clone(),
        unit_system: request.unit.clone(),
        exercise_index: request.exercise_index,
        bmi_value: outcome.bmi,
        bmi_category: category.label().to_string(),
    };
    let id = store.insert_bmi_calculation(&record)?;
    debug!(id, bmi = outcome.bmi, category = category.label(), "recorded BMI calculation");

    let (suggestions, suggestions_error) =
        match catalog.find_products_by_tag(category.tag(), SUGGESTION_LIMIT) {
            Ok(products) => (
                products
                    .iter()
                    .take(SUGGESTION_LIMIT as usize)
                    .map(ProductSummary::from)
                    .collect(),
                None,
            ),
            Err(e) => {
                warn!(tag = category.tag().as_str(), error = %e, "suggestion lookup failed");
                (Vec::new(), Some(e.to_string()))
            }
        };

    Ok(BmiResponse {
        bmi: outcome.bmi,
        category: category.label(),
        color: category.color(),
        background: category.background(),
        description: category.description(),
        suggestions,
        suggestions_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, DbError};
    use crate::models::product::test_support::product;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeStore {
        fail: bool,
        inserted: RefCell<Vec<BmiCalculationCreate>>,
    }

    impl CalculationStore for FakeStore {
        fn insert_bmi_calculation(&self, record: &BmiCalculationCreate) -> DbResult<i64> {
            if self.fail {
                return Err(DbError::NotInitialized);
            }
            self.inserted.borrow_mut().push(record.clone());
            Ok(self.inserted.borrow().len() as i64)
        }
    }

    #[derive(Default)]
    struct FakeCatalog {
        fail: bool,
        products: Vec<Product>,
        calls: Cell<usize>,
        last_tag: Cell<Option<CategoryTag>>,
    }

    impl ProductCatalog for FakeCatalog {
        fn find_products_by_tag(&self, tag: CategoryTag, limit: i64) -> DbResult<Vec<Product>> {
            self.calls.set(self.calls.get() + 1);
            self.last_tag.set(Some(tag));
            if self.fail {
                return Err(DbError::NotInitialized);
            }
            let mut found: Vec<Product> =
                self.products.iter().filter(|p| p.category_tag == tag).cloned().collect();
            found.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            found.truncate(limit as usize);
            Ok(found)
        }
    }

    fn fake_product(id: i64, tag: CategoryTag, rating: f64) -> Product {
        Product {
            id,
            slug: format!("p-{}", id),
            name: format!("Product {}", id),
            description: String::new(),
            weight_g: 50,
            price: 80.0,
            mrp: 100.0,
            rating,
            review_count: 3,
            value_proposition: "Clean energy".to_string(),
            category_tag: tag,
            image_url: None,
            created_at: "2025-01-01 00:00:00".to_string(),
        }
    }

    fn request(age: i64, height: f64, weight: f64, unit: &str) -> BmiRequest {
        BmiRequest {
            age,
            height,
            weight,
            unit: unit.to_string(),
            ..BmiRequest::default()
        }
    }

    #[test]
    fn test_metric_scenario() {
        let store = FakeStore::default();
        let catalog = FakeCatalog::default();

        let response = evaluate(&store, &catalog, &request(23, 159.0, 55.0, "Metric")).unwrap();
        assert_eq!(response.bmi, 21.8);
        assert_eq!(response.category, "Normal");
        assert_eq!(response.color, "#2E7D32");
        assert_eq!(catalog.last_tag.get(), Some(CategoryTag::Maintain));

        let inserted = store.inserted.borrow();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].bmi_category, "Normal");
        assert_eq!(inserted[0].gender, "Unknown");
        assert_eq!(inserted[0].exercise_index, 2);
    }

    #[test]
    fn test_us_scenario_stores_normalized_values_and_raw_unit() {
        let store = FakeStore::default();
        let catalog = FakeCatalog::default();

        let response = evaluate(&store, &catalog, &request(30, 70.0, 180.0, "US")).unwrap();
        assert_eq!(response.bmi, 25.8);
        assert_eq!(response.category, "Over Weight");
        assert_eq!(catalog.last_tag.get(), Some(CategoryTag::Loss));

        let inserted = store.inserted.borrow();
        assert!((inserted[0].height_cm - 177.8).abs() < 1e-9);
        assert!((inserted[0].weight_kg - 81.6466266).abs() < 1e-6);
        assert_eq!(inserted[0].unit_system, "US");
    }

    #[test]
    fn test_invalid_input_never_reaches_store() {
        let store = FakeStore::default();
        let catalog = FakeCatalog::default();

        let err = evaluate(&store, &catalog, &request(0, 159.0, 55.0, "Metric")).unwrap_err();
        assert!(err.is_client_error());
        assert!(store.inserted.borrow().is_empty());
        assert_eq!(catalog.calls.get(), 0);
    }

    #[test]
    fn test_out_of_range_measurements_never_reach_store() {
        let store = FakeStore::default();
        let catalog = FakeCatalog::default();

        // bmi overflows to inf
        let tiny_height = evaluate(&store, &catalog, &request(30, 1e-200, 70.0, "Metric")).unwrap_err();
        // height_cm overflows to inf, bmi collapses to 0
        let huge_height = evaluate(&store, &catalog, &request(30, 1e308, 70.0, "us")).unwrap_err();
        // rounds to 0.0
        let tiny_bmi = evaluate(&store, &catalog, &request(30, 1000.0, 0.001, "Metric")).unwrap_err();

        for err in [tiny_height, huge_height, tiny_bmi] {
            assert!(err.is_client_error());
            assert_eq!(err.to_string(), "Invalid BMI input.");
        }
        assert!(store.inserted.borrow().is_empty());
        assert_eq!(catalog.calls.get(), 0);
    }

    #[test]
    fn test_insert_failure_is_fatal() {
        let store = FakeStore { fail: true, ..FakeStore::default() };
        let catalog = FakeCatalog::default();

        let err = evaluate(&store, &catalog, &request(23, 159.0, 55.0, "Metric")).unwrap_err();
        assert!(matches!(err, EvaluateError::Store(_)));
        assert!(!err.is_client_error());
        assert_eq!(catalog.calls.get(), 0);
    }

    #[test]
    fn test_suggestion_failure_keeps_result() {
        let store = FakeStore::default();
        let catalog = FakeCatalog { fail: true, ..FakeCatalog::default() };

        let response = evaluate(&store, &catalog, &request(23, 159.0, 55.0, "Metric")).unwrap();
        assert_eq!(response.bmi, 21.8);
        assert!(response.suggestions.is_empty());
        assert_eq!(response.suggestions_error.as_deref(), Some("Database not initialized"));
        assert_eq!(store.inserted.borrow().len(), 1);
    }

    #[test]
    fn test_suggestions_capped_and_sorted() {
        let store = FakeStore::default();
        let catalog = FakeCatalog {
            products: (1..=9)
                .map(|i| fake_product(i, CategoryTag::Gain, 3.0 + (i % 5) as f64 * 0.4))
                .chain([fake_product(50, CategoryTag::Loss, 5.0)])
                .collect(),
            ..FakeCatalog::default()
        };

        // 45 / 1.8^2 = 13.9 → Under Weight → gain
        let response = evaluate(&store, &catalog, &request(25, 180.0, 45.0, "Metric")).unwrap();
        assert_eq!(response.category, "Under Weight");
        assert_eq!(response.suggestions.len(), 6);
        assert!(response.suggestions.iter().all(|s| s.category_tag == CategoryTag::Gain));
        assert!(response.suggestions.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn test_response_omits_suggestions_error_when_ok() {
        let store = FakeStore::default();
        let catalog = FakeCatalog::default();

        let response = evaluate(&store, &catalog, &request(40, 165.0, 90.0, "Metric")).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["category"], "Obese");
        assert_eq!(json["background"], "rgba(198, 40, 40, 0.15)");
        assert!(json.get("suggestions_error").is_none());
        assert!(json["suggestions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_evaluate_against_sqlite() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            for i in 0..8 {
                Product::create(conn, &product(&format!("m-{}", i), CategoryTag::Maintain, 4.0 + i as f64 * 0.1))?;
            }
            Ok(())
        })
        .unwrap();

        let response = evaluate(&db, &db, &request(23, 159.0, 55.0, "metric")).unwrap();
        assert_eq!(response.suggestions.len(), 6);
        assert_eq!(response.suggestions[0].slug, "m-7");

        let stored = db
            .with_conn(|conn| BmiCalculation::get_by_id(conn, 1))
            .unwrap()
            .unwrap();
        assert_eq!(stored.bmi_value, 21.8);
        assert_eq!(stored.unit_system, "metric");
    }

    #[test]
    fn test_assess_is_pure() {
        let outcome = assess(&request(30, 60.0, 150.0, "us")).unwrap();
        assert!((outcome.height_cm - 152.4).abs() < 1e-9);
        assert_eq!(outcome.bmi, 29.3);
        assert_eq!(outcome.category, BmiCategory::OverWeight);
    }
}
