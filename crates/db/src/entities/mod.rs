//! `SeaORM` entity definitions.

pub mod prelude;

pub mod employees;
pub mod incoming_transactions;
pub mod outgoing_transactions;
pub mod products;
pub mod sea_orm_active_enums;
pub mod stocks;
pub mod users;
