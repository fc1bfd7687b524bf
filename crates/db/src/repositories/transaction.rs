//! Transaction repository: the stock ledger applied against the store.
//!
//! Every receipt and issue runs in one database transaction that first locks
//! the product row. Batches are read after the lock, so two ledger operations
//! on the same product never plan against the same state. Any error drops the
//! transaction uncommitted and leaves stock untouched.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use clinic_ims_core::stock::{
    BatchChange, IncomingInput, OutgoingInput, ReceiptPlan, StockBatch, StockError, StockLedger,
    validate_incoming, validate_outgoing,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use super::stock::batches_for_product;
use crate::entities::{
    employees, incoming_transactions, outgoing_transactions, products, stocks,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Transaction record not found.
    #[error("Transaction not found: {0}")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransactionError {
    /// Returns the ledger error for this failure. Database errors become
    /// `StockError::StoreFailure`.
    #[must_use]
    pub fn as_stock_error(&self) -> Option<StockError> {
        match self {
            Self::Stock(e) => Some(e.clone()),
            Self::Database(e) => Some(StockError::StoreFailure(e.to_string())),
            Self::NotFound(_) => None,
        }
    }

    /// Returns true if the operation may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Stock(e) => e.is_retryable(),
            Self::Database(_) => true,
            Self::NotFound(_) => false,
        }
    }
}

/// An incoming transaction joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingView {
    /// Transaction ID.
    pub id: i32,
    /// Product name.
    pub product_name: String,
    /// Units received.
    pub quantity: i32,
    /// Expiration date of the received units.
    pub expiration_date: NaiveDate,
    /// When the receipt was recorded.
    pub created_at: DateTime<Utc>,
}

/// An outgoing transaction joined with product and employee details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingView {
    /// Transaction ID.
    pub id: i32,
    /// Product name.
    pub product_name: String,
    /// Units issued.
    pub quantity: i32,
    /// Receiving employee name.
    pub employee_name: String,
    /// Receiving employee phone.
    pub employee_phone: String,
    /// When the issue was recorded.
    pub created_at: DateTime<Utc>,
}

/// Transaction repository for stock receipts and issues.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an incoming transaction.
    ///
    /// Merges into the batch with the same expiration date or opens a new one,
    /// and appends one incoming record, atomically.
    ///
    /// # Errors
    ///
    /// Returns `StockError` for invalid input or an unknown product, and
    /// `TransactionError::Database` if the store fails.
    pub async fn record_incoming(
        &self,
        input: IncomingInput,
    ) -> Result<IncomingView, TransactionError> {
        let receipt = validate_incoming(&input)?;

        let txn = self.db.begin().await?;
        let product = lock_product(&txn, &receipt.product_name).await?;

        let existing = stocks::Entity::find()
            .filter(stocks::Column::ProductId.eq(product.id))
            .filter(stocks::Column::ExpirationDate.eq(receipt.expiration_date))
            .one(&txn)
            .await?;

        let plan = StockLedger::plan_receipt(
            existing.as_ref().map(stocks::Model::as_batch).as_ref(),
            receipt.quantity,
            receipt.expiration_date,
        )?;
        let now = Utc::now();

        match (plan, existing) {
            (ReceiptPlan::Increment { new_quantity, .. }, Some(batch)) => {
                let mut active: stocks::ActiveModel = batch.into();
                active.quantity = Set(new_quantity);
                active.update(&txn).await?;
            }
            (ReceiptPlan::Create { quantity, expiration_date }, _) => {
                stocks::ActiveModel {
                    product_id: Set(product.id),
                    quantity: Set(quantity),
                    expiration_date: Set(expiration_date),
                    registration_date: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
            (ReceiptPlan::Increment { batch_id, .. }, None) => {
                return Err(StockError::StoreFailure(format!("batch {batch_id} vanished")).into());
            }
        }

        let record = incoming_transactions::ActiveModel {
            product_id: Set(product.id),
            quantity: Set(receipt.quantity),
            expiration_date: Set(receipt.expiration_date),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = record.id,
            product = %product.product_name,
            quantity = record.quantity,
            expiration_date = %record.expiration_date,
            "Incoming transaction recorded"
        );

        Ok(IncomingView {
            id: record.id,
            product_name: product.product_name,
            quantity: record.quantity,
            expiration_date: record.expiration_date,
            created_at: record.created_at,
        })
    }

    /// Records an outgoing transaction.
    ///
    /// Depletes batches earliest expiry first and appends one outgoing record
    /// for the full quantity, atomically. If stock is insufficient nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `StockError` for invalid input, an unknown product or employee,
    /// or insufficient stock, and `TransactionError::Database` if the store fails.
    pub async fn record_outgoing(
        &self,
        input: OutgoingInput,
    ) -> Result<OutgoingView, TransactionError> {
        let issue = validate_outgoing(&input)?;

        let txn = self.db.begin().await?;
        let product = lock_product(&txn, &issue.product_name).await?;

        let employee = employees::Entity::find()
            .filter(employees::Column::EmployeeName.eq(issue.employee_name.as_str()))
            .filter(employees::Column::PhoneNumber.eq(issue.employee_phone.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| StockError::EmployeeNotFound {
                name: issue.employee_name.clone(),
                phone: issue.employee_phone.clone(),
            })?;

        let rows = batches_for_product(&txn, product.id).await?;
        let batches: Vec<StockBatch> = rows.iter().map(stocks::Model::as_batch).collect();

        let plan = StockLedger::plan_issue(&product.product_name, &batches, issue.quantity)?;
        debug!(product = %product.product_name, changes = ?plan.changes, "Issue planned");

        let mut rows: HashMap<i32, stocks::Model> = rows.into_iter().map(|r| (r.id, r)).collect();
        for change in &plan.changes {
            match *change {
                BatchChange::Deplete { batch_id, .. } => {
                    stocks::Entity::delete_by_id(batch_id).exec(&txn).await?;
                }
                BatchChange::Decrement {
                    batch_id,
                    remaining,
                    ..
                } => {
                    let row = rows.remove(&batch_id).ok_or_else(|| {
                        StockError::StoreFailure(format!("batch {batch_id} vanished"))
                    })?;
                    let mut active: stocks::ActiveModel = row.into();
                    active.quantity = Set(remaining);
                    active.update(&txn).await?;
                }
            }
        }

        let record = outgoing_transactions::ActiveModel {
            product_id: Set(product.id),
            employee_id: Set(employee.id),
            quantity: Set(plan.quantity),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = record.id,
            product = %product.product_name,
            employee_id = employee.id,
            quantity = record.quantity,
            batches_touched = plan.changes.len(),
            "Outgoing transaction recorded"
        );

        Ok(OutgoingView {
            id: record.id,
            product_name: product.product_name,
            quantity: record.quantity,
            employee_name: employee.employee_name,
            employee_phone: employee.phone_number,
            created_at: record.created_at,
        })
    }

    /// Returns the total units held for a product.
    ///
    /// # Errors
    ///
    /// Returns `StockError::ProductNotFound` if the product does not exist.
    pub async fn available_quantity(&self, product_name: &str) -> Result<i64, TransactionError> {
        let product = products::Entity::find()
            .filter(products::Column::ProductName.eq(product_name.trim()))
            .one(&self.db)
            .await?
            .ok_or_else(|| StockError::ProductNotFound(product_name.to_string()))?;

        let batches: Vec<StockBatch> = batches_for_product(&self.db, product.id)
            .await?
            .iter()
            .map(stocks::Model::as_batch)
            .collect();

        Ok(StockLedger::available_quantity(&batches))
    }

    /// Lists incoming transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_incoming(&self) -> Result<Vec<IncomingView>, TransactionError> {
        let rows = incoming_transactions::Entity::find()
            .find_also_related(products::Entity)
            .order_by_desc(incoming_transactions::Column::CreatedAt)
            .order_by_desc(incoming_transactions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(record, product)| incoming_view(record, product))
            .collect())
    }

    /// Gets an incoming transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if it does not exist.
    pub async fn get_incoming(&self, id: i32) -> Result<IncomingView, TransactionError> {
        let (record, product) = incoming_transactions::Entity::find_by_id(id)
            .find_also_related(products::Entity)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        Ok(incoming_view(record, product))
    }

    /// Lists outgoing transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_outgoing(&self) -> Result<Vec<OutgoingView>, TransactionError> {
        let rows = outgoing_transactions::Entity::find()
            .find_also_related(products::Entity)
            .order_by_desc(outgoing_transactions::Column::CreatedAt)
            .order_by_desc(outgoing_transactions::Column::Id)
            .all(&self.db)
            .await?;

        let employee_ids: Vec<i32> = rows.iter().map(|(r, _)| r.employee_id).collect();
        let employees: HashMap<i32, employees::Model> = employees::Entity::find()
            .filter(employees::Column::Id.is_in(employee_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(record, product)| {
                let employee = employees.get(&record.employee_id).cloned();
                outgoing_view(record, product, employee)
            })
            .collect())
    }

    /// Gets an outgoing transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if it does not exist.
    pub async fn get_outgoing(&self, id: i32) -> Result<OutgoingView, TransactionError> {
        let (record, product) = outgoing_transactions::Entity::find_by_id(id)
            .find_also_related(products::Entity)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let employee = employees::Entity::find_by_id(record.employee_id)
            .one(&self.db)
            .await?;

        Ok(outgoing_view(record, product, employee))
    }
}

/// Loads and locks the product row for the rest of the transaction.
async fn lock_product(
    txn: &DatabaseTransaction,
    product_name: &str,
) -> Result<products::Model, TransactionError> {
    products::Entity::find()
        .filter(products::Column::ProductName.eq(product_name))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| StockError::ProductNotFound(product_name.to_string()).into())
}

fn incoming_view(
    record: incoming_transactions::Model,
    product: Option<products::Model>,
) -> IncomingView {
    IncomingView {
        id: record.id,
        product_name: product.map(|p| p.product_name).unwrap_or_default(),
        quantity: record.quantity,
        expiration_date: record.expiration_date,
        created_at: record.created_at,
    }
}

fn outgoing_view(
    record: outgoing_transactions::Model,
    product: Option<products::Model>,
    employee: Option<employees::Model>,
) -> OutgoingView {
    let (employee_name, employee_phone) = employee
        .map(|e| (e.employee_name, e.phone_number))
        .unwrap_or_default();

    OutgoingView {
        id: record.id,
        product_name: product.map(|p| p.product_name).unwrap_or_default(),
        quantity: record.quantity,
        employee_name,
        employee_phone,
        created_at: record.created_at,
    }
}
