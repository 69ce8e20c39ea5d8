//! Migration: welcome bonus row and the key/value settings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BonusConfig::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BonusConfig::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BonusConfig::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(BonusConfig::BonusPoints).big_integer().not_null().default(200))
                    .col(
                        ColumnDef::new(BonusConfig::BonusTitle)
                            .string()
                            .not_null()
                            .default("Dobrodošli!"),
                    )
                    .col(
                        ColumnDef::new(BonusConfig::BonusMessage)
                            .string_len(500)
                            .not_null()
                            .default("Dobili ste 20 KM kao dobrodošlicu!"),
                    )
                    .col(
                        ColumnDef::new(BonusConfig::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BonusConfig::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AppSettings::Key).string().not_null().primary_key())
                    .col(ColumnDef::new(AppSettings::Value).json().not_null())
                    .col(
                        ColumnDef::new(AppSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BonusConfig::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BonusConfig {
    Table,
    Id,
    Enabled,
    BonusPoints,
    BonusTitle,
    BonusMessage,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AppSettings {
    Table,
    Key,
    Value,
    UpdatedAt,
}
