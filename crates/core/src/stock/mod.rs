//! Stock ledger.
//!
//! Receipts merge into the batch with the same expiration date or open a new
//! one. Issues deplete batches earliest expiry first and either succeed in
//! full or change nothing.
//!
//! Planning is pure; the database crate applies plans inside a transaction.

mod error;
mod service;
mod types;
mod validation;

#[cfg(test)]
mod service_props;

pub use error::StockError;
pub use service::StockLedger;
pub use types::{
    BatchChange, IncomingInput, Issue, IssuePlan, OutgoingInput, Receipt, ReceiptPlan, StockBatch,
};
pub use validation::{
    normalize_expiration_date, validate_incoming, validate_outgoing, validate_quantity,
};
