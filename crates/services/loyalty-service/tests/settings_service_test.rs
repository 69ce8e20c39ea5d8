//! Discount and featured action settings tests.

use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;
use serde_json::json;

use common::AppError;
use domain::featured::{FeaturedContentUpdate, FeaturedTiming};
use domain::{DiscountConfig, FeaturedActionConfig, FeaturedActionUpdate};
use loyalty_service_lib::repository::MockSettingsRepository;
use loyalty_service_lib::service::{
    DiscountService, DiscountSettings, FeaturedActionService, FeaturedActionSettings,
};

/// Defaults as the environment would supply them.
fn env_discount() -> DiscountConfig {
    DiscountConfig {
        cashback_percentage: 7.5,
        loyalty_discount_percentage: 12.0,
        ..DiscountConfig::default()
    }
}

fn env_featured() -> FeaturedActionConfig {
    let mut config = FeaturedActionConfig::default();
    config.content.title = "Jesenja akcija".to_string();
    config
}

fn moment(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_discount_uses_env_defaults_until_saved() {
    let mut settings = MockSettingsRepository::new();
    settings
        .expect_get()
        .with(eq("discount"))
        .returning(|_| Ok(None));

    let config = DiscountSettings::new(Arc::new(settings), env_discount())
        .get()
        .await
        .unwrap();
    assert_eq!(config, env_discount());
}

#[tokio::test]
async fn test_discount_saved_value_wins_over_defaults() {
    let mut settings = MockSettingsRepository::new();
    settings.expect_get().returning(|_| {
        Ok(Some(json!({
            "loyalty_discount_percentage": 15.0,
            "cashback_percentage": 3.0,
            "allow_points_payment": false,
            "points_to_currency_rate": 1.0,
            "enabled": true
        })))
    });

    let config = DiscountSettings::new(Arc::new(settings), env_discount())
        .get()
        .await
        .unwrap();
    assert_eq!(config.cashback_percentage, 3.0);
    assert!(!config.allow_points_payment);
}

#[tokio::test]
async fn test_discount_unreadable_value_falls_back_to_defaults() {
    let mut settings = MockSettingsRepository::new();
    settings
        .expect_get()
        .returning(|_| Ok(Some(json!({ "cashback_percentage": "lots" }))));

    let config = DiscountSettings::new(Arc::new(settings), env_discount())
        .get()
        .await
        .unwrap();
    assert_eq!(config, env_discount());
}

#[tokio::test]
async fn test_discount_update_rejects_out_of_range() {
    let mut settings = MockSettingsRepository::new();
    settings.expect_put().never();
    let config = DiscountConfig {
        cashback_percentage: 140.0,
        ..DiscountConfig::default()
    };

    let err = DiscountSettings::new(Arc::new(settings), env_discount())
        .update(config)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_discount_update_stores_config() {
    let mut settings = MockSettingsRepository::new();
    settings
        .expect_put()
        .withf(|key, value| key == "discount" && value["cashback_percentage"] == json!(2.5))
        .times(1)
        .returning(|_, _| Ok(()));
    let config = DiscountConfig {
        cashback_percentage: 2.5,
        ..DiscountConfig::default()
    };

    let saved = DiscountSettings::new(Arc::new(settings), env_discount())
        .update(config)
        .await
        .unwrap();
    assert_eq!(saved, config);
}

#[tokio::test]
async fn test_featured_action_defaults_until_saved() {
    let mut settings = MockSettingsRepository::new();
    settings
        .expect_get()
        .with(eq("featured_action"))
        .returning(|_| Ok(None));

    let view = FeaturedActionSettings::new(Arc::new(settings), env_featured())
        .current()
        .await
        .unwrap();
    assert_eq!(view.content.title, "Jesenja akcija");
    assert!(!view.enabled);
}

#[tokio::test]
async fn test_featured_action_update_merges_onto_stored() {
    let mut stored = FeaturedActionConfig::default();
    stored.content.title = "Ljetna akcija".to_string();
    stored.enabled = true;
    let stored_json = serde_json::to_value(&stored).unwrap();

    let mut settings = MockSettingsRepository::new();
    settings
        .expect_get()
        .returning(move |_| Ok(Some(stored_json.clone())));
    settings
        .expect_put()
        .withf(|key, value| {
            key == "featured_action"
                && value["content"]["title"] == json!("Ljetna akcija")
                && value["content"]["subtitle"] == json!("Samo ovaj mjesec")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let updated = FeaturedActionSettings::new(Arc::new(settings), env_featured())
        .update(FeaturedActionUpdate {
            content: Some(FeaturedContentUpdate {
                subtitle: Some("Samo ovaj mjesec".to_string()),
                ..FeaturedContentUpdate::default()
            }),
            ..FeaturedActionUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.content.title, "Ljetna akcija");
    assert_eq!(updated.content.subtitle, "Samo ovaj mjesec");
    assert!(updated.enabled);
    assert_eq!(updated.action, stored.action);
}

#[tokio::test]
async fn test_featured_action_end_must_follow_start() {
    for (start, end) in [(10, 5), (10, 10)] {
        let mut settings = MockSettingsRepository::new();
        settings.expect_get().returning(|_| Ok(None));
        settings.expect_put().never();

        let err = FeaturedActionSettings::new(Arc::new(settings), env_featured())
            .update(FeaturedActionUpdate {
                timing: Some(FeaturedTiming {
                    start_date: Some(moment(start)),
                    end_date: Some(moment(end)),
                }),
                ..FeaturedActionUpdate::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

#[tokio::test]
async fn test_featured_action_toggle_keeps_content() {
    let mut settings = MockSettingsRepository::new();
    settings.expect_get().returning(|_| Ok(None));
    settings
        .expect_put()
        .withf(|_, value| value["enabled"] == json!(true))
        .times(1)
        .returning(|_, _| Ok(()));

    let config = FeaturedActionSettings::new(Arc::new(settings), env_featured())
        .set_enabled(true)
        .await
        .unwrap();
    assert!(config.enabled);
    assert_eq!(config.content.title, "Jesenja akcija");
}
