//! Request validation for the stock ledger.
//!
//! Quantities must be positive and storable; expiration dates are reduced to
//! a UTC calendar date so that equal expiries always compare equal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::StockError;
use super::types::{IncomingInput, Issue, OutgoingInput, Receipt};

/// Validates a requested quantity.
///
/// # Errors
///
/// Returns `StockError::InvalidQuantity` for zero, negative, or out-of-range values.
pub fn validate_quantity(quantity: i64) -> Result<i32, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity(quantity));
    }
    i32::try_from(quantity).map_err(|_| StockError::InvalidQuantity(quantity))
}

/// Normalizes an ISO-8601 expiration date to a UTC calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times (converted to UTC first), and
/// date-times without an offset (taken as UTC).
///
/// # Errors
///
/// Returns `StockError::InvalidExpirationDate` if none of the forms match.
pub fn normalize_expiration_date(raw: &str) -> Result<NaiveDate, StockError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc).date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }

    Err(StockError::InvalidExpirationDate(raw.to_string()))
}

/// Validates an incoming request into a receipt.
///
/// # Errors
///
/// Returns a validation `StockError` if the quantity or date is invalid.
pub fn validate_incoming(input: &IncomingInput) -> Result<Receipt, StockError> {
    let quantity = validate_quantity(input.quantity)?;
    let expiration_date = normalize_expiration_date(&input.expiration_date)?;

    Ok(Receipt {
        product_name: input.product_name.trim().to_string(),
        quantity,
        expiration_date,
    })
}

/// Validates an outgoing request into an issue.
///
/// # Errors
///
/// Returns `StockError::InvalidQuantity` if the quantity is invalid.
pub fn validate_outgoing(input: &OutgoingInput) -> Result<Issue, StockError> {
    let quantity = validate_quantity(input.quantity)?;

    Ok(Issue {
        product_name: input.product_name.trim().to_string(),
        quantity,
        employee_name: input.employee_name.trim().to_string(),
        employee_phone: input.employee_phone.trim().to_string(),
    })
}
