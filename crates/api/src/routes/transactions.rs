//! Stock transaction routes: receipts (incoming) and issues (outgoing).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use clinic_ims_core::stock::{IncomingInput, OutgoingInput};
use clinic_ims_db::TransactionRepository;
use serde::Deserialize;

use crate::error::transaction_error_response;
use crate::{AppState, middleware::AuthUser};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions/incoming",
            get(list_incoming).post(create_incoming),
        )
        .route("/transactions/incoming/{id}", get(get_incoming))
        .route(
            "/transactions/outgoing",
            get(list_outgoing).post(create_outgoing),
        )
        .route("/transactions/outgoing/{id}", get(get_outgoing))
}

/// Request body for an incoming transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    /// Product name.
    pub product_name: String,
    /// Units received.
    pub quantity: i64,
    /// ISO-8601 expiration date.
    pub expiration_date: String,
}

/// Request body for an outgoing transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequest {
    /// Product name.
    pub product_name: String,
    /// Units issued.
    pub quantity: i64,
    /// Receiving employee name.
    pub employee_name: String,
    /// Receiving employee phone.
    pub employee_phone: String,
}

/// POST /transactions/incoming - Receive stock.
async fn create_incoming(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<IncomingRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_transaction_poster() {
        return response;
    }

    let input = IncomingInput {
        product_name: payload.product_name,
        quantity: payload.quantity,
        expiration_date: payload.expiration_date,
    };

    match TransactionRepository::new((*state.db).clone())
        .record_incoming(input)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// POST /transactions/outgoing - Issue stock, earliest expiry first.
async fn create_outgoing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<OutgoingRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_transaction_poster() {
        return response;
    }

    let input = OutgoingInput {
        product_name: payload.product_name,
        quantity: payload.quantity,
        employee_name: payload.employee_name,
        employee_phone: payload.employee_phone,
    };

    match TransactionRepository::new((*state.db).clone())
        .record_outgoing(input)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET /transactions/incoming - Receipts, newest first.
async fn list_incoming(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match TransactionRepository::new((*state.db).clone())
        .list_incoming()
        .await
    {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET /transactions/incoming/{id} - One receipt.
async fn get_incoming(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match TransactionRepository::new((*state.db).clone())
        .get_incoming(id)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET /transactions/outgoing - Issues, newest first.
async fn list_outgoing(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match TransactionRepository::new((*state.db).clone())
        .list_outgoing()
        .await
    {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET /transactions/outgoing/{id} - One issue.
async fn get_outgoing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match TransactionRepository::new((*state.db).clone())
        .get_outgoing(id)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}
