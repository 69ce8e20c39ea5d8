//! In-app notification entity.

use sea_orm::entity::prelude::*;

use domain::notification::NotificationPost;
use domain::Notification;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub has_post: bool,
    pub post_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub post_description: Option<String>,
    pub post_image: Option<String>,
    pub read: bool,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub read_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        let post = model.has_post.then(|| NotificationPost {
            title: model.post_title,
            description: model.post_description,
            image: model.post_image,
        });
        Notification {
            id: model.id,
            user_id: model.user_id,
            kind: model.kind,
            title: model.title,
            message: model.message,
            read: model.read,
            icon: model.icon,
            color: model.color,
            post,
            read_at: model.read_at,
            created_at: model.created_at,
        }
    }
}
