//! Entity re-exports.

pub use super::employees::Entity as Employees;
pub use super::incoming_transactions::Entity as IncomingTransactions;
pub use super::outgoing_transactions::Entity as OutgoingTransactions;
pub use super::products::Entity as Products;
pub use super::stocks::Entity as Stocks;
pub use super::users::Entity as Users;
