//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use clinic_ims_db::ProductRepository;
use clinic_ims_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::error::{app_error_response, internal_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the product routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/stock", get(get_product_stock))
}

/// Request body for creating or renaming a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    /// Product name.
    pub product_name: String,
}

/// GET /products - List products.
async fn list_products(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match ProductRepository::new((*state.db).clone()).list().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => internal_error("Failed to list products", &e),
    }
}

/// POST /products - Create a product.
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProductRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    match ProductRepository::new((*state.db).clone())
        .create(&payload.product_name)
        .await
    {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

/// GET /products/{id} - Get a product.
async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match ProductRepository::new((*state.db).clone()).find_by_id(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => app_error_response(&AppError::NotFound("Product not found".to_string())),
        Err(e) => internal_error("Failed to get product", &e),
    }
}

/// PUT /products/{id} - Rename a product.
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ProductRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    match ProductRepository::new((*state.db).clone())
        .update(id, &payload.product_name)
        .await
    {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

/// DELETE /products/{id} - Delete an unused product.
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    match ProductRepository::new((*state.db).clone()).delete(id).await {
        Ok(()) => {
            info!(product_id = id, user_id = auth.user_id(), "Product removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

/// GET /products/{id}/stock - Available quantity and batches.
async fn get_product_stock(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match ProductRepository::new((*state.db).clone())
        .stock_summary(id)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}
