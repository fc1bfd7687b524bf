//! Stock batch queries.
//!
//! Batches are written only by `TransactionRepository`; this repository is
//! read-only.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::{products, stocks};

/// A stock batch joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    /// Batch ID.
    pub id: i32,
    /// Product ID.
    pub product_id: i32,
    /// Product name.
    pub product_name: String,
    /// Units held.
    pub quantity: i32,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// When the batch was first received.
    pub registration_date: DateTime<Utc>,
}

impl StockView {
    fn from_pair(stock: stocks::Model, product: Option<products::Model>) -> Self {
        Self {
            id: stock.id,
            product_id: stock.product_id,
            product_name: product.map(|p| p.product_name).unwrap_or_default(),
            quantity: stock.quantity,
            expiration_date: stock.expiration_date,
            registration_date: stock.registration_date,
        }
    }
}

/// Stock repository for batch queries.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all batches, earliest expiry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<StockView>, DbErr> {
        let rows = stocks::Entity::find()
            .find_also_related(products::Entity)
            .order_by_asc(stocks::Column::ExpirationDate)
            .order_by_asc(stocks::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(stock, product)| StockView::from_pair(stock, product))
            .collect())
    }

    /// Finds a batch by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<StockView>, DbErr> {
        let row = stocks::Entity::find_by_id(id)
            .find_also_related(products::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(stock, product)| StockView::from_pair(stock, product)))
    }

    /// Returns the batches of a product in issue order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn batches_for_product(&self, product_id: i32) -> Result<Vec<stocks::Model>, DbErr> {
        batches_for_product(&self.db, product_id).await
    }
}

/// Loads the batches of a product ordered by expiration date, then ID.
pub(crate) async fn batches_for_product<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> Result<Vec<stocks::Model>, DbErr> {
    stocks::Entity::find()
        .filter(stocks::Column::ProductId.eq(product_id))
        .order_by_asc(stocks::Column::ExpirationDate)
        .order_by_asc(stocks::Column::Id)
        .all(conn)
        .await
}
