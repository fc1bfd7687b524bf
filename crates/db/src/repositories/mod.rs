//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod employee;
pub mod product;
pub mod stock;
pub mod transaction;
pub mod user;

pub use employee::{CreateEmployeeInput, EmployeeError, EmployeeRepository, UpdateEmployeeInput};
pub use product::{ProductError, ProductRepository, ProductStock};
pub use stock::{StockRepository, StockView};
pub use transaction::{IncomingView, OutgoingView, TransactionError, TransactionRepository};
pub use user::{CreateUserInput, UserRepository};

use sea_orm::{DbErr, SqlErr};

/// Returns true if `err` is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns true if `err` is a foreign key violation.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
