//! HTTP JSON API
//!
//! The endpoints the storefront calls:
//!
//! * `POST /api/bmi` - evaluate the BMI form
//! * `GET /api/product?slug=..` - product page data (`all=1` lists the catalog)
//! * `GET /api/health` - liveness

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::db::Database;
use crate::tools::{bmi, products};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub slug: Option<String>,
    pub all: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::build_info::VERSION,
    })
}

/// POST /api/bmi
///
/// The body is read raw: malformed JSON is treated as an empty form and
/// fails validation instead of being rejected by the extractor.
async fn calculate_bmi(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match bmi::calculate_bmi_from_payload(&state.db, &payload) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) if e.is_client_error() => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "BMI evaluation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/product
async fn get_product(State(state): State<AppState>, Query(query): Query<ProductQuery>) -> Response {
    if query.all.as_deref() == Some("1") {
        return match products::list_products(&state.db) {
            Ok(listed) => (StatusCode::OK, Json(listed)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "listing products failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
            }
        };
    }

    match products::get_product_page(&state.db, query.slug.as_deref()) {
        Ok(Some(page)) => (StatusCode::OK, Json(page)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, products::EMPTY_CATALOG_MESSAGE),
        Err(e) => {
            tracing::error!(error = %e, "loading product page failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// Build the API router
pub fn router(db: Database) -> Router {
    let state = AppState { db };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/bmi", post(calculate_bmi))
        .route("/product", get(get_product))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::models::product::test_support::product;
    use crate::models::{BmiCalculation, CategoryTag, Product};
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn post_bmi(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/bmi")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_bmi_success() {
        let db = setup();
        db.with_conn(|conn| {
            Product::create(conn, &product("trail-oats", CategoryTag::Maintain, 4.7))?;
            Ok(())
        })
        .unwrap();

        let (status, json) = send(
            router(db.clone()),
            post_bmi(r#"{"age": 23, "height": 159, "weight": 55, "gender": "Female", "unit": "Metric", "exerciseIndex": 3}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["bmi"], 21.8);
        assert_eq!(json["category"], "Normal");
        assert_eq!(json["suggestions"][0]["slug"], "trail-oats");
        assert_eq!(json["suggestions"][0]["category_tag"], "maintain");
        assert_eq!(db.with_conn(|conn| BmiCalculation::count(conn)).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bmi_validation_is_422_without_writes() {
        let db = setup();
        let (status, json) = send(router(db.clone()), post_bmi(r#"{"age": 0, "height": 159, "weight": 55}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "Invalid BMI input.");
        assert_eq!(db.with_conn(|conn| BmiCalculation::count(conn)).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bmi_overflowing_measurements_are_422() {
        let db = setup();
        for body in [
            r#"{"age": 30, "height": 1e-200, "weight": 70}"#,
            r#"{"age": 30, "height": 1e308, "weight": 70, "unit": "us"}"#,
        ] {
            let (status, json) = send(router(db.clone()), post_bmi(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(json["error"], "Invalid BMI input.");
        }
        assert_eq!(db.with_conn(|conn| BmiCalculation::count(conn)).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bmi_malformed_body_is_422() {
        let (status, _) = send(router(setup()), post_bmi("not json")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bmi_store_failure_is_500() {
        // No migrations: the insert fails
        let db = Database::in_memory().unwrap();
        let (status, json) = send(router(db), post_bmi(r#"{"age": 23, "height": 159, "weight": 55}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("no such table"));
    }

    #[tokio::test]
    async fn test_product_endpoints() {
        let db = setup();

        let (status, json) = send(router(db.clone()), get_request("/api/product?slug=x")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], products::EMPTY_CATALOG_MESSAGE);

        db.with_conn(|conn| {
            Product::create(conn, &product("berry-nut-energy-bar", CategoryTag::Maintain, 4.4))?;
            Product::create(conn, &product("peanut-fuel", CategoryTag::Gain, 4.9))?;
            Ok(())
        })
        .unwrap();

        let (status, json) = send(router(db.clone()), get_request("/api/product")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["product"]["slug"], "berry-nut-energy-bar");
        assert_eq!(json["similar"][0]["slug"], "peanut-fuel");

        let (status, json) = send(router(db), get_request("/api/product?all=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["products"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(router(setup()), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}
