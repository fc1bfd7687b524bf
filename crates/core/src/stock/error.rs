//! Stock ledger error types.
//!
//! Every failure of a receipt or issue maps to one of four kinds:
//! validation, missing reference, insufficient stock, or store failure.

use thiserror::Error;

/// Errors that can occur during stock ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    // ========== Validation Errors ==========
    /// Quantity must be a positive whole number within the storable range.
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    /// Expiration date could not be parsed as an ISO-8601 date.
    #[error("Invalid expiration date: {0}")]
    InvalidExpirationDate(String),

    /// Merging a receipt into an existing batch would overflow the batch quantity.
    #[error("Batch {batch_id} cannot hold {current} + {incoming} units")]
    QuantityOverflow {
        /// The batch receiving the units.
        batch_id: i32,
        /// Quantity already in the batch.
        current: i32,
        /// Quantity being received.
        incoming: i32,
    },

    // ========== Reference Errors ==========
    /// Product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Employee does not exist.
    #[error("Employee not found: {name} ({phone})")]
    EmployeeNotFound {
        /// Employee name as given in the request.
        name: String,
        /// Employee phone as given in the request.
        phone: String,
    },

    // ========== Stock Errors ==========
    /// Requested quantity exceeds the total across all batches.
    #[error("Not enough stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product name.
        product: String,
        /// Requested quantity.
        requested: i32,
        /// Total available quantity.
        available: i64,
    },

    // ========== Store Errors ==========
    /// Underlying data store failed or the transaction conflicted.
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidExpirationDate(_) => "INVALID_EXPIRATION_DATE",
            Self::QuantityOverflow { .. } => "QUANTITY_OVERFLOW",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::StoreFailure(_) => "STORE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Missing references are client errors (400), not 404s: the resource
    /// being created is the transaction, not the product or employee.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidQuantity(_)
            | Self::InvalidExpirationDate(_)
            | Self::QuantityOverflow { .. }
            | Self::ProductNotFound(_)
            | Self::EmployeeNotFound { .. }
            | Self::InsufficientStock { .. } => 400,

            Self::StoreFailure(_) => 500,
        }
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::ProductNotFound(_) => "Product not found".to_string(),
            Self::EmployeeNotFound { .. } => "Employee not found".to_string(),
            Self::InsufficientStock { .. } => "Not enough stock available".to_string(),
            Self::StoreFailure(_) => "Server error".to_string(),
            Self::InvalidQuantity(_)
            | Self::InvalidExpirationDate(_)
            | Self::QuantityOverflow { .. } => self.to_string(),
        }
    }

    /// Returns true if this error is a validation failure of the request itself.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_) | Self::InvalidExpirationDate(_) | Self::QuantityOverflow { .. }
        )
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreFailure(_))
    }
}
