//! Initial schema: catalog, stock batches, transaction history and users.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk(Products::Id))
                    .col(
                        ColumnDef::new(Products::ProductName)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(created_at(Products::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk(Employees::Id))
                    .col(ColumnDef::new(Employees::EmployeeName).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::Department).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::PhoneNumber).string_len(255).not_null())
                    .col(created_at(Employees::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_name_phone")
                    .table(Employees::Table)
                    .col(Employees::EmployeeName)
                    .col(Employees::PhoneNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stocks::Table)
                    .if_not_exists()
                    .col(pk(Stocks::Id))
                    .col(ColumnDef::new(Stocks::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(Stocks::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Stocks::Quantity).gt(0)),
                    )
                    .col(ColumnDef::new(Stocks::ExpirationDate).date().not_null())
                    .col(created_at(Stocks::RegistrationDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stocks_product")
                            .from(Stocks::Table, Stocks::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // A product holds at most one batch per expiration date.
        manager
            .create_index(
                Index::create()
                    .name("idx_stocks_product_expiration")
                    .table(Stocks::Table)
                    .col(Stocks::ProductId)
                    .col(Stocks::ExpirationDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncomingTransactions::Table)
                    .if_not_exists()
                    .col(pk(IncomingTransactions::Id))
                    .col(ColumnDef::new(IncomingTransactions::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(IncomingTransactions::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(IncomingTransactions::Quantity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(IncomingTransactions::ExpirationDate)
                            .date()
                            .not_null(),
                    )
                    .col(created_at(IncomingTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incoming_transactions_product")
                            .from(IncomingTransactions::Table, IncomingTransactions::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OutgoingTransactions::Table)
                    .if_not_exists()
                    .col(pk(OutgoingTransactions::Id))
                    .col(ColumnDef::new(OutgoingTransactions::ProductId).integer().not_null())
                    .col(ColumnDef::new(OutgoingTransactions::EmployeeId).integer().not_null())
                    .col(
                        ColumnDef::new(OutgoingTransactions::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(OutgoingTransactions::Quantity).gt(0)),
                    )
                    .col(created_at(OutgoingTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outgoing_transactions_product")
                            .from(OutgoingTransactions::Table, OutgoingTransactions::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outgoing_transactions_employee")
                            .from(OutgoingTransactions::Table, OutgoingTransactions::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(255).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Users::UserType).text().not_null())
                    .col(created_at(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(OutgoingTransactions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(IncomingTransactions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Stocks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn pk<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    ProductName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    EmployeeName,
    Department,
    PhoneNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Stocks {
    Table,
    Id,
    ProductId,
    Quantity,
    ExpirationDate,
    RegistrationDate,
}

#[derive(DeriveIden)]
enum IncomingTransactions {
    Table,
    Id,
    ProductId,
    Quantity,
    ExpirationDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OutgoingTransactions {
    Table,
    Id,
    ProductId,
    EmployeeId,
    Quantity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    PasswordHash,
    UserType,
    CreatedAt,
}
