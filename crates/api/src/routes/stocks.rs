//! Stock batch routes. Read-only: batches change only through transactions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use clinic_ims_db::StockRepository;
use clinic_ims_shared::AppError;

use crate::error::{app_error_response, internal_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the stock routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stocks/{id}", get(get_stock))
}

/// GET /stocks - All batches, earliest expiry first.
async fn list_stocks(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match StockRepository::new((*state.db).clone()).list().await {
        Ok(stocks) => (StatusCode::OK, Json(stocks)).into_response(),
        Err(e) => internal_error("Failed to list stocks", &e),
    }
}

/// GET /stocks/{id} - One batch.
async fn get_stock(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match StockRepository::new((*state.db).clone()).find_by_id(id).await {
        Ok(Some(stock)) => (StatusCode::OK, Json(stock)).into_response(),
        Ok(None) => app_error_response(&AppError::NotFound("Stock not found".to_string())),
        Err(e) => internal_error("Failed to get stock", &e),
    }
}
