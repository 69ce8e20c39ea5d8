//! Welcome bonus tests.

use std::sync::Arc;

use chrono::Utc;

use common::AppError;
use domain::{BonusConfig, BonusUpdate, DiopterData, LoyaltyUser, Points, UserRole};
use loyalty_service_lib::repository::{
    MockBonusRepository, MockLedgerRepository, MockUserRepository,
};
use loyalty_service_lib::service::{BonusManager, BonusService, BONUS_NOT_GRANTED};

fn member(is_app: bool, tenths: i64) -> LoyaltyUser {
    LoyaltyUser {
        id: 11,
        username: "Lejla Begić".to_string(),
        email: "lejla@example.ba".to_string(),
        phone: "061555444".to_string(),
        rfid: 30000003,
        points: Points::from_tenths(tenths),
        has_diopter: false,
        diopter: DiopterData::default(),
        is_app,
        role: UserRole::User,
        notification_settings: None,
        push_token: None,
        registered_at: Utc::now(),
    }
}

fn bonuses(config: BonusConfig) -> MockBonusRepository {
    let mut bonuses = MockBonusRepository::new();
    bonuses
        .expect_get_or_create()
        .returning(move || Ok(config.clone()));
    bonuses
}

fn service(
    users: MockUserRepository,
    bonuses: MockBonusRepository,
    ledger: MockLedgerRepository,
) -> BonusManager {
    BonusManager::new(Arc::new(users), Arc::new(bonuses), Arc::new(ledger))
}

#[tokio::test]
async fn test_grant_app_bonus_credits_new_member() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(member(false, 40))));
    let mut ledger = MockLedgerRepository::new();
    ledger
        .expect_grant_welcome_bonus()
        .times(1)
        .returning(|user, points| Ok(Some(user.points + points)));

    let outcome = service(users, bonuses(BonusConfig::default()), ledger)
        .grant_app_bonus(11)
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(!outcome.already_awarded);
    assert_eq!(outcome.bonus.map(|b| b.points), Some(20.0));
    assert_eq!(outcome.user.points, 24);
    assert_eq!(outcome.user.is_app, 1);
}

#[tokio::test]
async fn test_grant_app_bonus_is_idempotent() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(member(true, 240))));
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_grant_welcome_bonus().never();

    let outcome = service(users, MockBonusRepository::new(), ledger)
        .grant_app_bonus(11)
        .await
        .unwrap();

    assert!(outcome.already_awarded);
    assert!(outcome.bonus.is_none());
    assert_eq!(outcome.user.points, 24);
}

#[tokio::test]
async fn test_grant_app_bonus_lost_race_reports_already_awarded() {
    let mut users = MockUserRepository::new();
    let mut calls = 0;
    users.expect_find_by_id().returning(move |_| {
        calls += 1;
        Ok(Some(member(calls > 1, 240)))
    });
    let mut ledger = MockLedgerRepository::new();
    ledger
        .expect_grant_welcome_bonus()
        .returning(|_, _| Ok(None));

    let outcome = service(users, bonuses(BonusConfig::default()), ledger)
        .grant_app_bonus(11)
        .await
        .unwrap();

    assert!(outcome.already_awarded);
}

#[tokio::test]
async fn test_grant_app_bonus_disabled() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(member(false, 0))));
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_grant_welcome_bonus().never();
    let config = BonusConfig {
        enabled: false,
        ..BonusConfig::default()
    };

    let err = service(users, bonuses(config), ledger)
        .grant_app_bonus(11)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == BONUS_NOT_GRANTED));
}

#[tokio::test]
async fn test_toggle_flips_enabled() {
    let mut repo = bonuses(BonusConfig::default());
    repo.expect_save()
        .withf(|config| !config.enabled)
        .returning(|config| Ok(config));

    let saved = service(MockUserRepository::new(), repo, MockLedgerRepository::new())
        .toggle()
        .await
        .unwrap();
    assert!(!saved.enabled);
}

#[tokio::test]
async fn test_update_config_rejects_negative_points() {
    let mut repo = bonuses(BonusConfig::default());
    repo.expect_save().never();

    let update = BonusUpdate {
        bonus_points: Some(-10),
        ..BonusUpdate::default()
    };
    let err = service(MockUserRepository::new(), repo, MockLedgerRepository::new())
        .update_config(update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
