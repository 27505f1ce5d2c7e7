//! Catalog JSON API.
//!
//! Endpoints:
//! - `GET    /products`       — list the full catalog
//! - `GET    /products/{id}`  — fetch one product
//! - `POST   /products`       — create a product (server assigns id/createdAt)
//! - `PUT    /products/{id}`  — replace name, description, and price
//! - `DELETE /products/{id}`  — remove a product

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use shelf_core::domain::product::{Product, ProductDraft, ProductId};
use shelf_core::errors::DomainError;
use shelf_store::{CatalogError, CatalogStore};

#[derive(Clone)]
pub struct ApiState {
    catalog: Arc<dyn CatalogStore>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("product `{0}` not found")]
    NotFound(ProductId),
    #[error("{0}")]
    Validation(String),
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Absent ids surface as a bare 404 with no body.
            Self::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            Self::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiErrorBody { error: message })).into_response()
            }
        }
    }
}

pub fn router(catalog: Arc<dyn CatalogStore>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).put(update_product).delete(delete_product))
        .with_state(ApiState { catalog })
}

pub async fn list_products(State(state): State<ApiState>) -> Json<Vec<Product>> {
    let products = state.catalog.list().await;
    info!(event_name = "catalog.product.list", count = products.len(), "listing all products");
    Json(products)
}

pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<ApiState>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId(id);
    info!(event_name = "catalog.product.get", product_id = %id, "fetching product");

    let product = state.catalog.find_by_id(id).await.ok_or(ApiError::NotFound(id))?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<ApiState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Product>), ApiError> {
    draft.validate()?;

    let product = state.catalog.insert(draft).await;
    info!(event_name = "catalog.product.created", product_id = %product.id, "product created");

    let location = format!("/products/{}", product.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)))
}

pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<ApiState>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId(id);
    info!(event_name = "catalog.product.updated", product_id = %id, "updating product");

    draft.validate()?;
    let product = state.catalog.update_fields(id, draft).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let id = ProductId(id);
    info!(event_name = "catalog.product.deleted", product_id = %id, "deleting product");

    state.catalog.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::extract::{Path, State};
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use shelf_core::domain::product::{ProductDraft, ProductId};
    use shelf_store::{demo_products, InMemoryCatalog};

    use super::*;

    fn seeded_state() -> State<ApiState> {
        let catalog = Arc::new(InMemoryCatalog::with_products(demo_products(Utc::now())));
        State(ApiState { catalog })
    }

    fn draft(name: &str, description: &str, price: Decimal) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn list_returns_seed_in_insertion_order() {
        let Json(products) = list_products(seeded_state()).await;

        let ids: Vec<i64> = products.iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn get_absent_id_is_not_found() {
        let error = get_product(Path(99), seeded_state()).await.expect_err("absent id");
        assert_eq!(error, ApiError::NotFound(ProductId(99)));
    }

    #[tokio::test]
    async fn create_get_delete_round_trip() {
        let state = seeded_state();

        let (status, [(location_name, location)], Json(created)) = create_product(
            state.clone(),
            Json(draft("Webcam", "HD", Decimal::new(4999, 2))),
        )
        .await
        .expect("create succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(location_name, header::LOCATION);
        assert_eq!(location, "/products/5");
        assert_eq!(created.id, ProductId(5));

        let Json(fetched) = get_product(Path(5), state.clone()).await.expect("fetch created");
        assert_eq!(fetched, created);

        let status = delete_product(Path(5), state.clone()).await.expect("delete succeeds");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let error = get_product(Path(5), state).await.expect_err("deleted product is gone");
        assert_eq!(error, ApiError::NotFound(ProductId(5)));
    }

    #[tokio::test]
    async fn update_keeps_id_and_created_at() {
        let state = seeded_state();
        let Json(before) = get_product(Path(2), state.clone()).await.expect("seed product 2");

        let Json(updated) = update_product(
            Path(2),
            state.clone(),
            Json(draft("Wireless Mouse Pro", "Wireless mouse", Decimal::new(3499, 2))),
        )
        .await
        .expect("update succeeds");

        assert_eq!(updated.id, ProductId(2));
        assert_eq!(updated.name, "Wireless Mouse Pro");
        assert_eq!(updated.price, Decimal::new(3499, 2));
        assert_eq!(updated.created_at, before.created_at);

        let Json(after) = get_product(Path(2), state).await.expect("still present");
        assert_eq!(after, updated);
    }

    #[tokio::test]
    async fn update_absent_id_is_not_found() {
        let error = update_product(
            Path(42),
            seeded_state(),
            Json(draft("Webcam", "HD", Decimal::new(4999, 2))),
        )
        .await
        .expect_err("absent id");

        assert_eq!(error, ApiError::NotFound(ProductId(42)));
    }

    #[tokio::test]
    async fn delete_absent_id_is_not_found() {
        let error = delete_product(Path(42), seeded_state()).await.expect_err("absent id");
        assert_eq!(error, ApiError::NotFound(ProductId(42)));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_touching_the_store() {
        let state = seeded_state();

        let error = create_product(state.clone(), Json(draft("  ", "HD", Decimal::new(4999, 2))))
            .await
            .expect_err("blank name");
        assert!(matches!(error, ApiError::Validation(_)));

        let Json(products) = list_products(state).await;
        assert_eq!(products.len(), 4, "failed create must not grow the catalog");
    }

    #[tokio::test]
    async fn router_maps_routes_and_statuses() {
        let catalog = Arc::new(InMemoryCatalog::with_products(demo_products(Utc::now())));
        let app = router(catalog);

        let response = app
            .clone()
            .oneshot(Request::get("/products").body(Body::empty()).expect("request"))
            .await
            .expect("list response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(Request::get("/products/99").body(Body::empty()).expect("request"))
            .await
            .expect("get response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(
                Request::post("/products")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Webcam","description":"HD","price":49.99}"#))
                    .expect("request"),
            )
            .await
            .expect("create response");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|value| value.to_str().ok()),
            Some("/products/5"),
        );

        let response = app
            .clone()
            .oneshot(Request::delete("/products/5").body(Body::empty()).expect("request"))
            .await
            .expect("delete response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Malformed payloads are left to the framework's deserialization
        // failure, not a handled error.
        let response = app
            .oneshot(
                Request::post("/products")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Webcam","description":"HD","price":"cheap"}"#))
                    .expect("request"),
            )
            .await
            .expect("malformed response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
