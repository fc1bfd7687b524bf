//! Shared setup for repository integration tests.

#![allow(dead_code)]

use clinic_ims_core::stock::{IncomingInput, OutgoingInput};
use clinic_ims_db::entities::{incoming_transactions, outgoing_transactions, stocks};
use clinic_ims_db::migration::{Migrator, MigratorTrait};
use clinic_ims_db::repositories::CreateEmployeeInput;
use clinic_ims_db::{EmployeeRepository, ProductRepository, TransactionRepository};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

pub const NURSE: (&str, &str) = ("Nurse Joy", "555-0100");

/// Opens a fresh in-memory database with the schema applied.
///
/// One pooled connection keeps every query on the same in-memory database.
pub async fn setup() -> DatabaseConnection {
    let db = clinic_ims_db::connect_with_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Connects to the PostgreSQL database named by `DATABASE_URL` or
/// `CLINIC_IMS__DATABASE__URL` with a pool wide enough for real contention.
///
/// Returns `None` when neither variable is set. The schema is migrated up but
/// never dropped, so callers must use unique names for the rows they create.
pub async fn setup_postgres() -> Option<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("CLINIC_IMS__DATABASE__URL"))
        .ok()
        .filter(|url| url.starts_with("postgres"))?;

    let db = clinic_ims_db::connect_with_options(&url, 8, 2)
        .await
        .expect("Failed to connect to PostgreSQL");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    Some(db)
}

/// Returns a suffix that keeps rows from separate test runs apart.
pub fn unique_suffix() -> String {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}

pub async fn create_product(db: &DatabaseConnection, name: &str) -> i32 {
    ProductRepository::new(db.clone())
        .create(name)
        .await
        .expect("Failed to create product")
        .id
}

pub async fn create_nurse(db: &DatabaseConnection) -> i32 {
    EmployeeRepository::new(db.clone())
        .create(CreateEmployeeInput {
            employee_name: NURSE.0.to_string(),
            department: "ward".to_string(),
            phone_number: NURSE.1.to_string(),
        })
        .await
        .expect("Failed to create employee")
        .id
}

pub fn incoming(product: &str, quantity: i64, expiration_date: &str) -> IncomingInput {
    IncomingInput {
        product_name: product.to_string(),
        quantity,
        expiration_date: expiration_date.to_string(),
    }
}

pub fn outgoing(product: &str, quantity: i64) -> OutgoingInput {
    OutgoingInput {
        product_name: product.to_string(),
        quantity,
        employee_name: NURSE.0.to_string(),
        employee_phone: NURSE.1.to_string(),
    }
}

pub async fn receive(db: &DatabaseConnection, product: &str, quantity: i64, date: &str) {
    TransactionRepository::new(db.clone())
        .record_incoming(incoming(product, quantity, date))
        .await
        .expect("Failed to record incoming");
}

/// Returns `(quantity, expiration_date)` of every batch of a product in issue order.
pub async fn batches(db: &DatabaseConnection, product_id: i32) -> Vec<(i32, String)> {
    stocks::Entity::find()
        .filter(stocks::Column::ProductId.eq(product_id))
        .order_by_asc(stocks::Column::ExpirationDate)
        .order_by_asc(stocks::Column::Id)
        .all(db)
        .await
        .expect("Failed to load batches")
        .into_iter()
        .map(|b| (b.quantity, b.expiration_date.to_string()))
        .collect()
}

/// Returns Σ incoming − Σ outgoing for a product.
pub async fn ledger_balance(db: &DatabaseConnection, product_id: i32) -> i64 {
    let received: i64 = incoming_transactions::Entity::find()
        .filter(incoming_transactions::Column::ProductId.eq(product_id))
        .all(db)
        .await
        .expect("Failed to load incoming")
        .iter()
        .map(|t| i64::from(t.quantity))
        .sum();
    let issued: i64 = outgoing_transactions::Entity::find()
        .filter(outgoing_transactions::Column::ProductId.eq(product_id))
        .all(db)
        .await
        .expect("Failed to load outgoing")
        .iter()
        .map(|t| i64::from(t.quantity))
        .sum();
    received - issued
}

pub async fn stock_total(db: &DatabaseConnection, product_id: i32) -> i64 {
    batches(db, product_id)
        .await
        .iter()
        .map(|(q, _)| i64::from(*q))
        .sum()
}
