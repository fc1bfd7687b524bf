//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_name: String,
    pub department: String,
    pub phone_number: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::outgoing_transactions::Entity")]
    OutgoingTransactions,
}

impl Related<super::outgoing_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
