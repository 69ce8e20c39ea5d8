//! Notification inbox, notification preferences and the push token.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::bonus_service::USER_NOT_FOUND;
use crate::repository::{NotificationRepository, UserRepository};
use common::{AppError, AppResult};
use domain::{NotificationSettings, NotificationSettingsInput, NotificationView};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const PUSH_TOKEN_REQUIRED: &str = "Push token je obavezan.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationInbox {
    pub notifications: Vec<NotificationView>,
    pub unread_count: usize,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn inbox(&self, user_id: i64) -> AppResult<NotificationInbox>;

    async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()>;

    /// Returns how many notifications were unread.
    async fn mark_all_read(&self, user_id: i64) -> AppResult<u64>;

    /// Stored preferences, or the defaults when none were saved.
    async fn settings(&self, user_id: i64) -> AppResult<NotificationSettings>;

    /// Omitted fields fall back to their defaults.
    async fn update_settings(
        &self,
        user_id: i64,
        input: NotificationSettingsInput,
    ) -> AppResult<NotificationSettings>;

    /// Returns whether a token is now set.
    async fn set_push_token(&self, user_id: i64, token: String) -> AppResult<bool>;
}

pub struct NotificationManager {
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            users,
            notifications,
        }
    }
}

#[async_trait]
impl NotificationService for NotificationManager {
    async fn inbox(&self, user_id: i64) -> AppResult<NotificationInbox> {
        let notifications: Vec<NotificationView> = self
            .notifications
            .list(user_id)
            .await?
            .into_iter()
            .map(NotificationView::from)
            .collect();
        let unread_count = notifications.iter().filter(|n| !n.read).count();

        Ok(NotificationInbox {
            notifications,
            unread_count,
        })
    }

    async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        if !self.notifications.mark_read(user_id, notification_id).await? {
            return Err(AppError::not_found("Notifikacija nije pronađena."));
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        self.notifications.mark_all_read(user_id).await
    }

    async fn settings(&self, user_id: i64) -> AppResult<NotificationSettings> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        Ok(user.notification_settings.unwrap_or_default())
    }

    async fn update_settings(
        &self,
        user_id: i64,
        input: NotificationSettingsInput,
    ) -> AppResult<NotificationSettings> {
        let settings = input.resolve();
        self.users
            .set_notification_settings(user_id, settings)
            .await?;
        Ok(settings)
    }

    async fn set_push_token(&self, user_id: i64, token: String) -> AppResult<bool> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(AppError::validation(PUSH_TOKEN_REQUIRED));
        }
        self.users.set_push_token(user_id, token).await?;
        tracing::info!(user_id, "Push token stored");
        Ok(true)
    }
}
