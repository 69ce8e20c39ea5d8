//! Exam reservation entity.

use sea_orm::entity::prelude::*;

use domain::Reservation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rezervacije")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_rezervacije: i32,
    pub poslovnica: String,
    pub datum: Date,
    pub vrijeme: Time,
    pub ime: String,
    pub prezime: String,
    pub telefon: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Reservation {
    fn from(model: Model) -> Self {
        Reservation {
            id_rezervacije: model.id_rezervacije,
            poslovnica: model.poslovnica,
            datum: model.datum,
            vrijeme: model.vrijeme,
            ime: model.ime,
            prezime: model.prezime,
            telefon: model.telefon,
            email: model.email,
        }
    }
}
