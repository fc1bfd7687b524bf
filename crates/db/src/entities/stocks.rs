//! `SeaORM` Entity for stocks table.
//!
//! One row per `(product_id, expiration_date)` batch. Rows never hold zero.

use clinic_ims_core::stock::StockBatch;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stocks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub expiration_date: Date,
    pub registration_date: DateTimeUtc,
}

impl Model {
    /// Returns the ledger view of this batch.
    #[must_use]
    pub const fn as_batch(&self) -> StockBatch {
        StockBatch {
            id: self.id,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
