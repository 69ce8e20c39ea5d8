//! Points ledger entity.

use sea_orm::entity::prelude::*;

use domain::{LedgerAction, Points, Transaction};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub poslovnica: String,
    pub rfid: i32,
    pub user: String,
    pub date: DateTime,
    pub points: i64,
    pub action: String,
    pub vrsta: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        // Rows written by the in-store software only ever use the two known actions
        let action = LedgerAction::parse(&model.action).unwrap_or(LedgerAction::Added);
        Transaction {
            transaction_id: model.transaction_id,
            poslovnica: model.poslovnica,
            rfid: model.rfid,
            user: model.user,
            date: model.date,
            points: Points::from_tenths(model.points),
            action,
            vrsta: model.vrsta,
        }
    }
}
