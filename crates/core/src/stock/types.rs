//! Stock ledger domain types.
//!
//! Requests arrive as raw inputs, are validated into receipts and issues,
//! and are planned into batch mutations that the persistence layer applies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A batch of one product sharing one expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBatch {
    /// Batch ID.
    pub id: i32,
    /// Units currently held.
    pub quantity: i32,
    /// Expiration date of every unit in the batch.
    pub expiration_date: NaiveDate,
}

/// Raw incoming request, before validation.
#[derive(Debug, Clone)]
pub struct IncomingInput {
    /// Product name.
    pub product_name: String,
    /// Requested quantity.
    pub quantity: i64,
    /// Expiration date as sent by the client.
    pub expiration_date: String,
}

/// Raw outgoing request, before validation.
#[derive(Debug, Clone)]
pub struct OutgoingInput {
    /// Product name.
    pub product_name: String,
    /// Requested quantity.
    pub quantity: i64,
    /// Name of the receiving employee.
    pub employee_name: String,
    /// Phone of the receiving employee.
    pub employee_phone: String,
}

/// A validated stock receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Product name.
    pub product_name: String,
    /// Positive quantity.
    pub quantity: i32,
    /// Normalized expiration date.
    pub expiration_date: NaiveDate,
}

/// A validated stock issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Product name.
    pub product_name: String,
    /// Positive quantity.
    pub quantity: i32,
    /// Name of the receiving employee.
    pub employee_name: String,
    /// Phone of the receiving employee.
    pub employee_phone: String,
}

/// How a receipt lands in the batch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptPlan {
    /// Merge into the existing batch with the same expiry.
    Increment {
        /// The batch to update.
        batch_id: i32,
        /// Quantity after the merge.
        new_quantity: i32,
    },
    /// Open a new batch.
    Create {
        /// Quantity of the new batch.
        quantity: i32,
        /// Expiration date of the new batch.
        expiration_date: NaiveDate,
    },
}

/// A single batch mutation produced by an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchChange {
    /// The batch is fully consumed and must be deleted.
    Deplete {
        /// The batch to delete.
        batch_id: i32,
        /// Units taken from it.
        consumed: i32,
    },
    /// The batch is partially consumed.
    Decrement {
        /// The batch to update.
        batch_id: i32,
        /// Units taken from it.
        consumed: i32,
        /// Units left after the issue (always > 0).
        remaining: i32,
    },
}

impl BatchChange {
    /// Returns the batch this change applies to.
    #[must_use]
    pub const fn batch_id(&self) -> i32 {
        match self {
            Self::Deplete { batch_id, .. } | Self::Decrement { batch_id, .. } => *batch_id,
        }
    }

    /// Returns the units consumed from the batch.
    #[must_use]
    pub const fn consumed(&self) -> i32 {
        match self {
            Self::Deplete { consumed, .. } | Self::Decrement { consumed, .. } => *consumed,
        }
    }
}

/// Ordered batch mutations satisfying one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuePlan {
    /// Total quantity issued.
    pub quantity: i32,
    /// Changes in first-expiry-first-out order.
    pub changes: Vec<BatchChange>,
}

impl IssuePlan {
    /// Returns the total quantity consumed across all changes.
    #[must_use]
    pub fn total_consumed(&self) -> i64 {
        self.changes.iter().map(|c| i64::from(c.consumed())).sum()
    }
}
