//! Welcome bonus configuration row.

use sea_orm::entity::prelude::*;

use domain::BonusConfig;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bonus_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub enabled: bool,
    pub bonus_points: i64,
    pub bonus_title: String,
    pub bonus_message: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BonusConfig {
    fn from(model: Model) -> Self {
        BonusConfig {
            enabled: model.enabled,
            bonus_points: model.bonus_points,
            bonus_title: model.bonus_title,
            bonus_message: model.bonus_message,
        }
    }
}
