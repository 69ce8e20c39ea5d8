//! Welcome bonus configuration repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::entities::bonus_config::{self, ActiveModel, Entity as BonusConfigEntity};
use common::{AppError, AppResult};
use domain::BonusConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BonusRepository: Send + Sync {
    /// The single config row, created with defaults on first access.
    async fn get_or_create(&self) -> AppResult<BonusConfig>;

    async fn save(&self, config: BonusConfig) -> AppResult<BonusConfig>;
}

pub struct BonusStore {
    db: DatabaseConnection,
}

impl BonusStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn row(&self) -> AppResult<bonus_config::Model> {
        let existing = BonusConfigEntity::find()
            .order_by_asc(bonus_config::Column::Id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        if let Some(model) = existing {
            return Ok(model);
        }

        tracing::info!("Creating default bonus configuration");
        let defaults = BonusConfig::default();
        let now = chrono::Utc::now();
        ActiveModel {
            enabled: Set(defaults.enabled),
            bonus_points: Set(defaults.bonus_points),
            bonus_title: Set(defaults.bonus_title),
            bonus_message: Set(defaults.bonus_message),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)
    }
}

#[async_trait]
impl BonusRepository for BonusStore {
    async fn get_or_create(&self) -> AppResult<BonusConfig> {
        self.row().await.map(BonusConfig::from)
    }

    async fn save(&self, config: BonusConfig) -> AppResult<BonusConfig> {
        let mut active: ActiveModel = self.row().await?.into();
        active.enabled = Set(config.enabled);
        active.bonus_points = Set(config.bonus_points);
        active.bonus_title = Set(config.bonus_title);
        active.bonus_message = Set(config.bonus_message);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(BonusConfig::from(model))
    }
}
