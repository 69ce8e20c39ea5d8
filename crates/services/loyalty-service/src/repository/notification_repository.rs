//! In-app notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::entities::notification::{self, Entity as NotificationEntity};
use common::{AppError, AppResult};
use domain::Notification;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// A member's notifications, newest first.
    async fn list(&self, user_id: i64) -> AppResult<Vec<Notification>>;

    /// Returns false when the notification does not belong to the member.
    async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<bool>;

    /// Returns how many notifications changed.
    async fn mark_all_read(&self, user_id: i64) -> AppResult<u64>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn list(&self, user_id: i64) -> AppResult<Vec<Notification>> {
        let models = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<bool> {
        let now = Utc::now();
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .col_expr(notification::Column::ReadAt, Expr::value(now))
            .col_expr(notification::Column::UpdatedAt, Expr::value(now))
            .filter(notification::Column::Id.eq(notification_id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        let now = Utc::now();
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .col_expr(notification::Column::ReadAt, Expr::value(now))
            .col_expr(notification::Column::UpdatedAt, Expr::value(now))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
