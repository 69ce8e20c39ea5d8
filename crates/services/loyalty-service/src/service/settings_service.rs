//! Shop discount and featured action settings.
//!
//! Both live as JSON in the key/value settings table. Until an admin saves
//! them, the defaults from the environment apply.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use serde::{de::DeserializeOwned, Serialize};

use crate::repository::SettingsRepository;
use common::{AppError, AppResult};
use domain::{DiscountConfig, FeaturedActionConfig, FeaturedActionUpdate, FeaturedActionView};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const KEY_DISCOUNT: &str = "discount";
const KEY_FEATURED_ACTION: &str = "featured_action";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DiscountService: Send + Sync {
    async fn get(&self) -> AppResult<DiscountConfig>;

    /// Replace every field.
    async fn update(&self, config: DiscountConfig) -> AppResult<DiscountConfig>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeaturedActionService: Send + Sync {
    /// What the app shows right now.
    async fn current(&self) -> AppResult<FeaturedActionView>;

    async fn update(&self, update: FeaturedActionUpdate) -> AppResult<FeaturedActionConfig>;

    async fn set_enabled(&self, enabled: bool) -> AppResult<FeaturedActionConfig>;
}

/// Stored value under `key`, or `default` when absent or unreadable.
async fn load<T: DeserializeOwned>(
    settings: &dyn SettingsRepository,
    key: &str,
    default: T,
) -> AppResult<T> {
    match settings.get(key).await? {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!(key, "Stored setting is unreadable, using defaults: {e}");
                Ok(default)
            }
        },
        None => Ok(default),
    }
}

async fn store<T: Serialize>(settings: &dyn SettingsRepository, key: &str, value: &T) -> AppResult<()> {
    let json = serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Setting serialization error: {e}")))?;
    settings.put(key, json).await
}

pub struct DiscountSettings {
    settings: Arc<dyn SettingsRepository>,
    defaults: DiscountConfig,
}

impl DiscountSettings {
    pub fn new(settings: Arc<dyn SettingsRepository>, defaults: DiscountConfig) -> Self {
        Self { settings, defaults }
    }
}

#[async_trait]
impl DiscountService for DiscountSettings {
    async fn get(&self) -> AppResult<DiscountConfig> {
        load(self.settings.as_ref(), KEY_DISCOUNT, self.defaults).await
    }

    async fn update(&self, config: DiscountConfig) -> AppResult<DiscountConfig> {
        config.validate()?;
        store(self.settings.as_ref(), KEY_DISCOUNT, &config).await?;
        tracing::info!(
            cashback = config.cashback_percentage,
            discount = config.loyalty_discount_percentage,
            "Discount configuration updated"
        );
        Ok(config)
    }
}

pub struct FeaturedActionSettings {
    settings: Arc<dyn SettingsRepository>,
    defaults: FeaturedActionConfig,
}

impl FeaturedActionSettings {
    pub fn new(settings: Arc<dyn SettingsRepository>, defaults: FeaturedActionConfig) -> Self {
        Self { settings, defaults }
    }

    async fn config(&self) -> AppResult<FeaturedActionConfig> {
        load(self.settings.as_ref(), KEY_FEATURED_ACTION, self.defaults.clone()).await
    }
}

#[async_trait]
impl FeaturedActionService for FeaturedActionSettings {
    async fn current(&self) -> AppResult<FeaturedActionView> {
        let config = self.config().await?;
        Ok(config.view(Local::now().naive_local()))
    }

    async fn update(&self, update: FeaturedActionUpdate) -> AppResult<FeaturedActionConfig> {
        let updated = update.apply(self.config().await?)?;
        store(self.settings.as_ref(), KEY_FEATURED_ACTION, &updated).await?;
        tracing::info!(enabled = updated.enabled, "Featured action updated");
        Ok(updated)
    }

    async fn set_enabled(&self, enabled: bool) -> AppResult<FeaturedActionConfig> {
        let mut config = self.config().await?;
        config.enabled = enabled;
        store(self.settings.as_ref(), KEY_FEATURED_ACTION, &config).await?;
        tracing::info!(enabled, "Featured action toggled");
        Ok(config)
    }
}
