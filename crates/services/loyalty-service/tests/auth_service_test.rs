//! Sign-in and registration tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use common::AppError;
use domain::{BonusConfig, DiopterData, LoyaltyUser, NewLoyaltyUser, Points, UserRole};
use loyalty_service_lib::config::OtpConfig;
use loyalty_service_lib::infra::MockOtpStore;
use loyalty_service_lib::integrations::MockSmsSender;
use loyalty_service_lib::repository::{
    MockBonusRepository, MockLedgerRepository, MockUserRepository,
};
use loyalty_service_lib::service::{
    AuthService, Authenticator, MockTokenService, RegistrationRequest, TokenResponse, EMAIL_TAKEN,
    INVALID_PHONE, WRONG_OTP,
};

const PHONE: &str = "+387 61 201 891";
const CANONICAL: &str = "061201891";

fn member(id: i64) -> LoyaltyUser {
    LoyaltyUser {
        id,
        username: "Amra Hodžić".to_string(),
        email: "amra@example.ba".to_string(),
        phone: "061 201 891".to_string(),
        rfid: 12345678,
        points: Points::from_tenths(150),
        has_diopter: false,
        diopter: DiopterData::default(),
        is_app: true,
        role: UserRole::User,
        notification_settings: None,
        push_token: None,
        registered_at: Utc::now(),
    }
}

fn tokens() -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens.expect_issue().returning(|_| {
        Ok(TokenResponse {
            access_token: "signed".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        })
    });
    tokens
}

struct Deps {
    users: MockUserRepository,
    bonuses: MockBonusRepository,
    ledger: MockLedgerRepository,
    otp: MockOtpStore,
    sms: MockSmsSender,
}

impl Deps {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            bonuses: MockBonusRepository::new(),
            ledger: MockLedgerRepository::new(),
            otp: MockOtpStore::new(),
            sms: MockSmsSender::new(),
        }
    }

    fn build(self) -> Authenticator {
        Authenticator::new(
            Arc::new(self.users),
            Arc::new(self.bonuses),
            Arc::new(self.ledger),
            Arc::new(self.otp),
            Arc::new(self.sms),
            Arc::new(tokens()),
            OtpConfig::default(),
        )
    }
}

#[tokio::test]
async fn test_phone_lookup_uses_all_surface_forms() {
    let mut deps = Deps::new();
    deps.users
        .expect_find_by_phone_variants()
        .withf(|phones| phones.iter().any(|p| p == CANONICAL) && phones.len() > 1)
        .returning(|_| Ok(Some(member(7))));

    let result = deps.build().phone_login_or_register(PHONE).await.unwrap();
    assert!(result.exists);
}

#[tokio::test]
async fn test_send_otp_rejected_during_cooldown() {
    let mut deps = Deps::new();
    deps.otp
        .expect_cooldown_active()
        .with(eq(CANONICAL))
        .returning(|_| Ok(true));
    deps.sms.expect_send().never();

    let err = deps.build().send_otp(PHONE, "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(_)));
}

#[tokio::test]
async fn test_send_otp_rejected_over_phone_limit() {
    let mut deps = Deps::new();
    deps.otp.expect_cooldown_active().returning(|_| Ok(false));
    deps.otp
        .expect_sends_this_hour()
        .with(eq(format!("phone:{CANONICAL}")))
        .times(1)
        .returning(|_| Ok(20));
    deps.otp.expect_save_code().never();
    deps.sms.expect_send().never();

    let err = deps.build().send_otp(PHONE, "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(ref m) if m.contains("1 sat")));
}

#[tokio::test]
async fn test_send_otp_rejects_junk_phone() {
    for junk in ["0", "123", "abc"] {
        let mut deps = Deps::new();
        deps.otp.expect_cooldown_active().never();
        deps.sms.expect_send().never();

        let err = deps.build().send_otp(junk, "10.0.0.1").await.unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m == INVALID_PHONE),
            "{junk} was accepted"
        );
    }
}

#[tokio::test]
async fn test_junk_phone_lookup_finds_nobody() {
    let mut deps = Deps::new();
    deps.users.expect_find_by_phone_variants().never();

    let result = deps.build().phone_login_or_register("0").await.unwrap();
    assert!(!result.exists);
}

#[tokio::test]
async fn test_send_otp_rejected_over_ip_limit() {
    let mut deps = Deps::new();
    deps.otp.expect_cooldown_active().returning(|_| Ok(false));
    deps.otp
        .expect_sends_this_hour()
        .returning(|counter| Ok(if counter.starts_with("ip:") { 15 } else { 0 }));
    deps.otp.expect_save_code().never();

    let err = deps.build().send_otp(PHONE, "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(_)));
}

#[tokio::test]
async fn test_send_otp_stores_code_and_sends_sms() {
    let mut deps = Deps::new();
    deps.otp.expect_cooldown_active().returning(|_| Ok(false));
    deps.otp.expect_sends_this_hour().returning(|_| Ok(0));
    deps.otp
        .expect_save_code()
        .withf(|phone, code, ttl| {
            phone == CANONICAL
                && code.len() == 6
                && code.chars().all(|c| c.is_ascii_digit())
                && *ttl == 300
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    deps.otp.expect_record_send().times(2).returning(|_| Ok(()));
    deps.otp
        .expect_start_cooldown()
        .with(eq(CANONICAL), eq(30))
        .returning(|_, _| Ok(()));
    deps.sms
        .expect_send()
        .withf(|phone, message| phone == CANONICAL && message.contains("OTP"))
        .times(1)
        .returning(|_, _| Ok(()));

    let sent = deps.build().send_otp(PHONE, "10.0.0.1").await.unwrap();
    assert!(sent.success);
}

#[tokio::test]
async fn test_send_otp_sms_failure_is_unavailable() {
    let mut deps = Deps::new();
    deps.otp.expect_cooldown_active().returning(|_| Ok(false));
    deps.otp.expect_sends_this_hour().returning(|_| Ok(0));
    deps.otp.expect_save_code().returning(|_, _, _| Ok(()));
    deps.otp.expect_record_send().returning(|_| Ok(()));
    deps.otp.expect_start_cooldown().returning(|_, _| Ok(()));
    deps.sms
        .expect_send()
        .returning(|_, _| Err(AppError::internal("gateway down")));

    let err = deps.build().send_otp(PHONE, "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_verify_otp_wrong_code() {
    let mut deps = Deps::new();
    deps.otp
        .expect_code()
        .returning(|_| Ok(Some("123456".to_string())));
    deps.otp.expect_discard_code().never();

    let err = deps.build().verify_otp(PHONE, "654321").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == WRONG_OTP));
}

#[tokio::test]
async fn test_verify_otp_rejects_short_code() {
    let err = Deps::new().build().verify_otp(PHONE, "123").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_verify_otp_signs_in_existing_member() {
    let mut deps = Deps::new();
    deps.otp
        .expect_code()
        .returning(|_| Ok(Some("123456".to_string())));
    deps.otp.expect_discard_code().times(1).returning(|_| Ok(()));
    deps.otp.expect_mark_verified().never();
    deps.users
        .expect_find_by_phone_variants()
        .returning(|_| Ok(Some(member(7))));

    let verified = deps.build().verify_otp(PHONE, "123456").await.unwrap();
    assert!(!verified.is_new_user);
    assert_eq!(verified.token.as_deref(), Some("signed"));
    assert_eq!(verified.user.map(|u| u.id), Some(7));
}

#[tokio::test]
async fn test_verify_otp_opens_registration_for_new_phone() {
    let mut deps = Deps::new();
    deps.otp
        .expect_code()
        .returning(|_| Ok(Some("123456".to_string())));
    deps.otp.expect_discard_code().returning(|_| Ok(()));
    deps.otp
        .expect_mark_verified()
        .with(eq(CANONICAL), eq(900))
        .times(1)
        .returning(|_, _| Ok(()));
    deps.users
        .expect_find_by_phone_variants()
        .returning(|_| Ok(None));

    let verified = deps.build().verify_otp(PHONE, "123456").await.unwrap();
    assert!(verified.is_new_user);
    assert!(verified.token.is_none());
}

fn registration() -> RegistrationRequest {
    RegistrationRequest {
        phone_number: PHONE.to_string(),
        name: " Amra ".to_string(),
        surname: "Hodžić".to_string(),
        email: "amra@example.ba".to_string(),
    }
}

#[tokio::test]
async fn test_registration_requires_verified_phone() {
    let mut deps = Deps::new();
    deps.otp.expect_is_verified().returning(|_| Ok(false));
    deps.users.expect_create().never();

    let err = deps
        .build()
        .complete_registration(registration())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn test_registration_rejects_junk_phone() {
    let mut deps = Deps::new();
    deps.otp.expect_is_verified().never();
    deps.users.expect_create().never();
    let request = RegistrationRequest {
        phone_number: "123".to_string(),
        ..registration()
    };

    let err = deps.build().complete_registration(request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == INVALID_PHONE));
}

#[tokio::test]
async fn test_registration_rejects_taken_email() {
    let mut deps = Deps::new();
    deps.otp.expect_is_verified().returning(|_| Ok(true));
    deps.users
        .expect_find_by_email()
        .returning(|_| Ok(Some(member(3))));

    let err = deps
        .build()
        .complete_registration(registration())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == EMAIL_TAKEN));
}

#[tokio::test]
async fn test_registration_creates_member_with_bonus() {
    let mut deps = Deps::new();
    deps.otp.expect_is_verified().returning(|_| Ok(true));
    deps.otp
        .expect_clear_verified()
        .with(eq(CANONICAL))
        .times(1)
        .returning(|_| Ok(()));
    deps.users.expect_find_by_email().returning(|_| Ok(None));
    deps.users
        .expect_find_by_phone_variants()
        .returning(|_| Ok(None));
    deps.users.expect_rfid_exists().returning(|_| Ok(false));
    deps.users
        .expect_create()
        .withf(|new: &NewLoyaltyUser| {
            new.username == "Amra Hodžić" && new.phone == CANONICAL
        })
        .returning(|new| {
            Ok(LoyaltyUser {
                username: new.username,
                email: new.email,
                phone: new.phone,
                rfid: new.rfid,
                points: Points::ZERO,
                is_app: false,
                ..member(42)
            })
        });
    deps.bonuses
        .expect_get_or_create()
        .returning(|| Ok(BonusConfig::default()));
    deps.ledger
        .expect_grant_welcome_bonus()
        .withf(|user, points| user.id == 42 && points.tenths() == 200)
        .returning(|_, points| Ok(Some(points)));

    let registration = deps
        .build()
        .complete_registration(registration())
        .await
        .unwrap();

    assert!(registration.success);
    assert_eq!(registration.token, "signed");
    assert_eq!(registration.user.points, 20);
    assert_eq!(registration.user.is_app, 1);
    assert_eq!(registration.bonus.map(|b| b.points), Some(20.0));
}
