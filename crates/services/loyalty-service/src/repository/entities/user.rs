//! Loyalty member database entity.

use sea_orm::entity::prelude::*;

use domain::{DiopterData, LoyaltyUser, NotificationSettings, Points, UserRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    #[sea_orm(unique)]
    pub useremail: String,
    pub userphone: String,
    pub dt: DateTime,
    #[sea_orm(unique)]
    pub rfid: i32,
    /// Tenths of a KM
    pub points: i64,
    pub count: i32,
    pub dioptrija: i16,
    pub dsph: String,
    pub dcyl: String,
    pub daxa: String,
    pub lsph: String,
    pub lcyl: String,
    pub laxa: String,
    pub ldadd: String,
    pub bonus_status: i32,
    pub is_app: bool,
    pub role: String,
    pub notification_settings: Option<Json>,
    pub push_token: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn diopter(&self) -> DiopterData {
        DiopterData {
            dsph: self.dsph.clone(),
            dcyl: self.dcyl.clone(),
            daxa: self.daxa.clone(),
            lsph: self.lsph.clone(),
            lcyl: self.lcyl.clone(),
            laxa: self.laxa.clone(),
            ldadd: self.ldadd.clone(),
        }
    }
}

impl From<Model> for LoyaltyUser {
    fn from(model: Model) -> Self {
        let diopter = model.diopter();
        // A malformed settings blob reads as "never saved"
        let notification_settings = model
            .notification_settings
            .and_then(|v| serde_json::from_value::<NotificationSettings>(v).ok());

        LoyaltyUser {
            id: model.id,
            username: model.username,
            email: model.useremail,
            phone: model.userphone,
            rfid: model.rfid,
            points: Points::from_tenths(model.points),
            has_diopter: model.dioptrija != 0,
            diopter,
            is_app: model.is_app,
            role: UserRole::from(model.role.as_str()),
            notification_settings,
            push_token: model.push_token,
            registered_at: model.created_at,
        }
    }
}
