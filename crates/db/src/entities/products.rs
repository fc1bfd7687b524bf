//! `SeaORM` Entity for products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub product_name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stocks::Entity")]
    Stocks,
    #[sea_orm(has_many = "super::incoming_transactions::Entity")]
    IncomingTransactions,
    #[sea_orm(has_many = "super::outgoing_transactions::Entity")]
    OutgoingTransactions,
}

impl Related<super::stocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stocks.def()
    }
}

impl Related<super::incoming_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomingTransactions.def()
    }
}

impl Related<super::outgoing_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
