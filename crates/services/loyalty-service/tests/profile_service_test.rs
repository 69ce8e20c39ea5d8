//! Profile and prescription tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use common::AppError;
use domain::{DiopterData, DiopterUpdate, LoyaltyUser, Points, ProfileUpdate, UserRole};
use loyalty_service_lib::repository::MockUserRepository;
use loyalty_service_lib::service::{ProfileManager, ProfileService, EMAIL_IN_USE, INVALID_PHONE};

fn member(id: i64) -> LoyaltyUser {
    LoyaltyUser {
        id,
        username: "Lejla Begić".to_string(),
        email: "lejla@example.ba".to_string(),
        phone: "062267066".to_string(),
        rfid: 20000003,
        points: Points::from_tenths(420),
        has_diopter: true,
        diopter: DiopterData {
            dsph: "-1.25".to_string(),
            lsph: "-1.00".to_string(),
            ..DiopterData::default()
        },
        is_app: true,
        role: UserRole::User,
        notification_settings: None,
        push_token: None,
        registered_at: Utc::now(),
    }
}

fn existing(users: &mut MockUserRepository) {
    users.expect_find_by_id().returning(|id| Ok(Some(member(id))));
}

#[tokio::test]
async fn test_update_profile_stores_canonical_phone() {
    let mut users = MockUserRepository::new();
    existing(&mut users);
    users
        .expect_update_profile()
        .withf(|id, update| *id == 3 && update.phone.as_deref() == Some("061201891"))
        .times(1)
        .returning(|id, update| {
            Ok(LoyaltyUser {
                phone: update.phone.unwrap_or_default(),
                ..member(id)
            })
        });

    let profile = ProfileManager::new(Arc::new(users))
        .update_profile(
            3,
            ProfileUpdate {
                phone: Some("+387 61 201 891".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.phone, "061201891");
}

#[tokio::test]
async fn test_update_profile_rejects_junk_phone() {
    for junk in ["0", "123", "12-3"] {
        let mut users = MockUserRepository::new();
        users.expect_update_profile().never();

        let err = ProfileManager::new(Arc::new(users))
            .update_profile(
                3,
                ProfileUpdate {
                    phone: Some(junk.to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m == INVALID_PHONE),
            "{junk} was accepted"
        );
    }
}

#[tokio::test]
async fn test_update_profile_blank_phone_clears_it() {
    let mut users = MockUserRepository::new();
    existing(&mut users);
    users
        .expect_update_profile()
        .withf(|_, update| update.phone.as_deref() == Some(""))
        .times(1)
        .returning(|id, _| Ok(member(id)));

    let result = ProfileManager::new(Arc::new(users))
        .update_profile(
            3,
            ProfileUpdate {
                phone: Some("  ".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_profile_email_of_someone_else_conflicts() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("amra@example.ba"))
        .returning(|_| Ok(Some(member(9))));
    users.expect_update_profile().never();

    let err = ProfileManager::new(Arc::new(users))
        .update_profile(
            3,
            ProfileUpdate {
                email: Some("amra@example.ba".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref m) if m == EMAIL_IN_USE));
    assert_eq!(err.status().as_u16(), 409);
}

#[tokio::test]
async fn test_update_profile_keeping_own_email_is_allowed() {
    let mut users = MockUserRepository::new();
    existing(&mut users);
    users
        .expect_find_by_email()
        .returning(|_| Ok(Some(member(3))));
    users
        .expect_update_profile()
        .times(1)
        .returning(|id, _| Ok(member(id)));

    let result = ProfileManager::new(Arc::new(users))
        .update_profile(
            3,
            ProfileUpdate {
                email: Some("lejla@example.ba".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_profile_rejects_blank_name() {
    let mut users = MockUserRepository::new();
    users.expect_update_profile().never();

    let err = ProfileManager::new(Arc::new(users))
        .update_profile(
            3,
            ProfileUpdate {
                username: Some("   ".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_diopter_merges_onto_current_prescription() {
    let mut users = MockUserRepository::new();
    existing(&mut users);
    users
        .expect_update_diopter()
        .withf(|id, diopter| {
            *id == 3
                && diopter.dsph == "-1.25"
                && diopter.lsph == "-1.50"
                && diopter.ldadd == "+2.00"
                && !diopter.is_empty()
        })
        .times(1)
        .returning(|id, diopter| {
            Ok(LoyaltyUser {
                has_diopter: !diopter.is_empty(),
                diopter,
                ..member(id)
            })
        });

    let profile = ProfileManager::new(Arc::new(users))
        .update_diopter(
            3,
            DiopterUpdate {
                lsph: Some("-1.50".to_string()),
                ldadd: Some("+2.00".to_string()),
                ..DiopterUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.dioptrija, 1);
    assert_eq!(profile.diopter_data.lsph, "-1.50");
}

#[tokio::test]
async fn test_update_diopter_clearing_every_value_resets_flag() {
    let mut users = MockUserRepository::new();
    existing(&mut users);
    users
        .expect_update_diopter()
        .withf(|_, diopter| diopter.is_empty())
        .times(1)
        .returning(|id, diopter| {
            Ok(LoyaltyUser {
                has_diopter: !diopter.is_empty(),
                diopter,
                ..member(id)
            })
        });

    let profile = ProfileManager::new(Arc::new(users))
        .update_diopter(
            3,
            DiopterUpdate {
                dsph: Some(String::new()),
                lsph: Some(String::new()),
                ..DiopterUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.dioptrija, 0);
}

#[tokio::test]
async fn test_update_diopter_rejects_long_values() {
    let mut users = MockUserRepository::new();
    users.expect_update_diopter().never();

    let err = ProfileManager::new(Arc::new(users))
        .update_diopter(
            3,
            DiopterUpdate {
                daxa: Some("9".repeat(200)),
                ..DiopterUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
