//! Migration: loyalty members.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Useremail).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Userphone).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Users::Dt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Users::Rfid).integer().not_null().unique_key())
                    .col(ColumnDef::new(Users::Points).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Count).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Dioptrija).small_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Dsph).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Dcyl).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Daxa).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Lsph).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Lcyl).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Laxa).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::Ldadd).string_len(10).not_null().default(""))
                    .col(ColumnDef::new(Users::BonusStatus).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::IsApp).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::NotificationSettings).json().null())
                    .col(ColumnDef::new(Users::PushToken).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_userphone")
                    .table(Users::Table)
                    .col(Users::Userphone)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    Useremail,
    Userphone,
    Dt,
    Rfid,
    Points,
    Count,
    Dioptrija,
    Dsph,
    Dcyl,
    Daxa,
    Lsph,
    Lcyl,
    Laxa,
    Ldadd,
    BonusStatus,
    IsApp,
    Role,
    NotificationSettings,
    PushToken,
    CreatedAt,
    UpdatedAt,
}
