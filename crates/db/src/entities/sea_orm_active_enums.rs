//! Active enums stored as text columns.

use clinic_ims_core::auth::UserType as CoreUserType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of system user, stored as `ADMIN` or `MANAGER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    /// Administrator.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Manager.
    #[sea_orm(string_value = "MANAGER")]
    Manager,
}

impl From<CoreUserType> for UserType {
    fn from(value: CoreUserType) -> Self {
        match value {
            CoreUserType::Admin => Self::Admin,
            CoreUserType::Manager => Self::Manager,
        }
    }
}

impl From<UserType> for CoreUserType {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Admin => Self::Admin,
            UserType::Manager => Self::Manager,
        }
    }
}
