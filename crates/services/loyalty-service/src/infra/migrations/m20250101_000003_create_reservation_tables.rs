//! Migration: exam reservations and extra openings added by staff.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rezervacije::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rezervacije::IdRezervacije)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rezervacije::Poslovnica).string().not_null())
                    .col(ColumnDef::new(Rezervacije::Datum).date().not_null())
                    .col(ColumnDef::new(Rezervacije::Vrijeme).time().not_null())
                    .col(ColumnDef::new(Rezervacije::Ime).string().not_null())
                    .col(ColumnDef::new(Rezervacije::Prezime).string().not_null())
                    .col(ColumnDef::new(Rezervacije::Telefon).string().not_null())
                    .col(ColumnDef::new(Rezervacije::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        // One reservation per branch, day and time
        manager
            .create_index(
                Index::create()
                    .name("uq_rezervacije_slot")
                    .table(Rezervacije::Table)
                    .col(Rezervacije::Poslovnica)
                    .col(Rezervacije::Datum)
                    .col(Rezervacije::Vrijeme)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rezervacije_email")
                    .table(Rezervacije::Table)
                    .col(Rezervacije::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminOtvaranje::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminOtvaranje::IdOtvaranja)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminOtvaranje::Poslovnica).string().not_null())
                    .col(ColumnDef::new(AdminOtvaranje::Datum).date().not_null())
                    .col(ColumnDef::new(AdminOtvaranje::Vrijeme).time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminOtvaranje::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rezervacije::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rezervacije {
    Table,
    IdRezervacije,
    Poslovnica,
    Datum,
    Vrijeme,
    Ime,
    Prezime,
    Telefon,
    Email,
}

#[derive(Iden)]
enum AdminOtvaranje {
    Table,
    IdOtvaranja,
    Poslovnica,
    Datum,
    Vrijeme,
}
