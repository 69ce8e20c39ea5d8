//! Migration: points ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Poslovnica).string().not_null())
                    .col(ColumnDef::new(Transactions::Rfid).integer().not_null())
                    .col(ColumnDef::new(Transactions::User).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Date)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Transactions::Points).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::Action).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Transactions::Vrsta)
                            .string()
                            .not_null()
                            .default("Redovna kupovina"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_rfid_date")
                    .table(Transactions::Table)
                    .col(Transactions::Rfid)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transactions {
    Table,
    TransactionId,
    Poslovnica,
    Rfid,
    User,
    Date,
    Points,
    Action,
    Vrsta,
}
