//! Product repository for catalog operations.

use chrono::Utc;
use clinic_ims_core::catalog::{CatalogError, validate_product};
use clinic_ims_core::stock::{StockBatch, StockLedger};
use clinic_ims_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tracing::info;

use super::stock::batches_for_product;
use super::{is_foreign_key_violation, is_unique_violation};
use crate::entities::{incoming_transactions, outgoing_transactions, products, stocks};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(i32),

    /// Another product already uses this name.
    #[error("Product already exists: {0}")]
    AlreadyExists(String),

    /// Product still has stock or transaction history.
    #[error("Product {0} has stock or transaction history")]
    InUse(i32),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound("Product not found".to_string()),
            ProductError::AlreadyExists(_) => Self::Conflict("Product already exists".to_string()),
            ProductError::InUse(_) => {
                Self::Conflict("Product has stock or transaction history".to_string())
            }
            ProductError::Validation(e) => Self::Validation(e.to_string()),
            ProductError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Stock summary for one product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    /// Product ID.
    pub product_id: i32,
    /// Product name.
    pub product_name: String,
    /// Total units across all batches.
    pub available_quantity: i64,
    /// Batches in the order they will be issued.
    pub batches: Vec<StockBatch>,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all products ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .order_by_asc(products::Column::ProductName)
            .all(&self.db)
            .await
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a product by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::ProductName.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::AlreadyExists` if the name is taken.
    pub async fn create(&self, product_name: &str) -> Result<products::Model, ProductError> {
        let draft = validate_product(product_name)?;

        if self.find_by_name(&draft.product_name).await?.is_some() {
            return Err(ProductError::AlreadyExists(draft.product_name));
        }

        let product = products::ActiveModel {
            product_name: Set(draft.product_name.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ProductError::AlreadyExists(draft.product_name.clone())
            } else {
                ProductError::Database(e)
            }
        })?;

        info!(product_id = product.id, product = %product.product_name, "Product created");
        Ok(product)
    }

    /// Renames a product. Stock and history follow by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` or `ProductError::AlreadyExists`.
    pub async fn update(
        &self,
        id: i32,
        product_name: &str,
    ) -> Result<products::Model, ProductError> {
        let draft = validate_product(product_name)?;

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(other) = self.find_by_name(&draft.product_name).await?
            && other.id != id
        {
            return Err(ProductError::AlreadyExists(draft.product_name));
        }

        let mut active: products::ActiveModel = existing.into();
        active.product_name = Set(draft.product_name.clone());

        let updated = active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ProductError::AlreadyExists(draft.product_name.clone())
            } else {
                ProductError::Database(e)
            }
        })?;

        info!(product_id = id, product = %updated.product_name, "Product renamed");
        Ok(updated)
    }

    /// Deletes a product that has no stock and no transaction history.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` or `ProductError::InUse`.
    pub async fn delete(&self, id: i32) -> Result<(), ProductError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        if self.is_referenced(id).await? {
            return Err(ProductError::InUse(id));
        }

        products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    ProductError::InUse(id)
                } else {
                    ProductError::Database(e)
                }
            })?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Returns the available quantity and batches of a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product does not exist.
    pub async fn stock_summary(&self, id: i32) -> Result<ProductStock, ProductError> {
        let product = self
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let batches: Vec<StockBatch> = batches_for_product(&self.db, id)
            .await?
            .iter()
            .map(stocks::Model::as_batch)
            .collect();

        Ok(ProductStock {
            product_id: product.id,
            product_name: product.product_name,
            available_quantity: StockLedger::available_quantity(&batches),
            batches,
        })
    }

    async fn is_referenced(&self, id: i32) -> Result<bool, DbErr> {
        let batches = stocks::Entity::find()
            .filter(stocks::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if batches > 0 {
            return Ok(true);
        }

        let incoming = incoming_transactions::Entity::find()
            .filter(incoming_transactions::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if incoming > 0 {
            return Ok(true);
        }

        let outgoing = outgoing_transactions::Entity::find()
            .filter(outgoing_transactions::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;

        Ok(outgoing > 0)
    }
}
