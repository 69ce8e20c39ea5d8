//! Key/value settings repository backing the discount and featured action
//! configuration.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value;

use super::entities::app_setting::{self, Entity as AppSettingEntity};
use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;

    /// Insert or replace the value stored under `key`.
    async fn put(&self, key: &str, value: Value) -> AppResult<()>;
}

pub struct SettingsStore {
    db: DatabaseConnection,
}

impl SettingsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SettingsStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let model = AppSettingEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(|m| m.value))
    }

    async fn put(&self, key: &str, value: Value) -> AppResult<()> {
        let row = app_setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(chrono::Utc::now()),
        };

        AppSettingEntity::insert(row)
            .on_conflict(
                OnConflict::column(app_setting::Column::Key)
                    .update_columns([app_setting::Column::Value, app_setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
