//! JSON error responses.
//!
//! Every failure is returned as `{ "error": <snake_case code>, "message": <text> }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_ims_core::stock::StockError;
use clinic_ims_db::repositories::TransactionError;
use clinic_ims_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Builds an error response.
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.into()
        })),
    )
        .into_response()
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Converts an application error into a response, logging server-side failures.
pub fn app_error_response(err: &AppError) -> Response {
    let status = status(err.status_code());
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }

    error_response(
        status,
        &err.error_code().to_ascii_lowercase(),
        err.message(),
    )
}

/// Converts a ledger error into a response.
pub fn stock_error_response(err: &StockError) -> Response {
    let status = status(err.http_status_code());
    if status.is_server_error() {
        error!(error = %err, retryable = err.is_retryable(), "Stock ledger operation failed");
    } else {
        warn!(error = %err, "Stock ledger operation rejected");
    }

    error_response(
        status,
        &err.error_code().to_ascii_lowercase(),
        err.client_message(),
    )
}

/// Converts a transaction repository error into a response.
pub fn transaction_error_response(err: &TransactionError) -> Response {
    match (err, err.as_stock_error()) {
        (TransactionError::NotFound(_), _) | (_, None) => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Transaction not found")
        }
        (_, Some(stock)) => stock_error_response(&stock),
    }
}

/// Converts any server-side failure into a generic 500, logging the cause.
pub fn internal_error(context: &str, err: &dyn std::fmt::Display) -> Response {
    error!(error = %err, "{context}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Server error",
    )
}
