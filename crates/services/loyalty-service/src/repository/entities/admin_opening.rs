//! Extra exam slots opened by staff.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_otvaranje")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id_otvaranja: i32,
    pub poslovnica: String,
    pub datum: Date,
    pub vrijeme: Time,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
