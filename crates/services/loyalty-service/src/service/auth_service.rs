//! Phone sign-in with one-time SMS codes, and member registration.
//!
//! A phone that verifies a code but has no account gets a short window in
//! which it may finish registration. OTP state is keyed by the canonical
//! phone form, so "+387 61 201 891" and "061201891" share one code.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use super::bonus_service::award_welcome_bonus;
use super::token_service::TokenService;
use crate::config::OtpConfig;
use crate::infra::OtpStore;
use crate::integrations::SmsSender;
use crate::repository::{BonusRepository, LedgerRepository, UserRepository};
use common::{AppError, AppResult};
use domain::{
    phone, BonusGrant, LoyaltyUser, NewLoyaltyUser, PhoneNumber, UserProfile, MAX_NAME_LENGTH,
    OTP_LENGTH, RFID_MAX, RFID_MIN,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const INVALID_PHONE: &str = "Neispravan broj telefona.";
pub const WRONG_OTP: &str = "Pogrešan OTP kod.";
pub const EMAIL_TAKEN: &str = "Email adresa je već registrovana. Molimo koristite drugi email.";
pub const PHONE_TAKEN: &str = "Korisnik s ovim brojem telefona već postoji.";

const RFID_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PhoneCheck {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OtpSent {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OtpVerification {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(rename = "isNewUser")]
    pub is_new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmailAvailability {
    pub available: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub phone_number: String,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Registration {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusGrant>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Whether a member with this phone already exists.
    async fn phone_login_or_register(&self, phone_number: &str) -> AppResult<PhoneCheck>;

    async fn send_otp(&self, phone_number: &str, client_ip: &str) -> AppResult<OtpSent>;

    /// Check a code; signs existing members in, opens registration otherwise.
    async fn verify_otp(&self, phone_number: &str, otp: &str) -> AppResult<OtpVerification>;

    async fn check_email(&self, email: &str) -> AppResult<EmailAvailability>;

    async fn complete_registration(&self, request: RegistrationRequest)
        -> AppResult<Registration>;
}

/// Lowest-id member whose stored phone is any surface form of `raw`.
pub(crate) async fn find_user_by_phone(
    users: &dyn UserRepository,
    raw: &str,
) -> AppResult<Option<LoyaltyUser>> {
    let variants: Vec<String> = phone::variants(raw).into_iter().collect();
    if variants.is_empty() {
        return Ok(None);
    }
    users.find_by_phone_variants(&variants).await
}

fn canonical_phone(raw: &str) -> AppResult<String> {
    PhoneNumber::parse(raw)
        .map(PhoneNumber::into_inner)
        .ok_or_else(|| AppError::validation(INVALID_PHONE))
}

fn required_name(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("Polje {field} je obavezno.")));
    }
    if trimmed.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Polje {field} može imati najviše {MAX_NAME_LENGTH} znakova."
        )));
    }
    Ok(trimmed.to_string())
}

pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    bonuses: Arc<dyn BonusRepository>,
    ledger: Arc<dyn LedgerRepository>,
    otp: Arc<dyn OtpStore>,
    sms: Arc<dyn SmsSender>,
    tokens: Arc<dyn TokenService>,
    config: OtpConfig,
}

impl Authenticator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        bonuses: Arc<dyn BonusRepository>,
        ledger: Arc<dyn LedgerRepository>,
        otp: Arc<dyn OtpStore>,
        sms: Arc<dyn SmsSender>,
        tokens: Arc<dyn TokenService>,
        config: OtpConfig,
    ) -> Self {
        Self {
            users,
            bonuses,
            ledger,
            otp,
            sms,
            tokens,
            config,
        }
    }

    fn generate_code() -> String {
        let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{code:06}")
    }

    async fn unused_rfid(&self) -> AppResult<i32> {
        for _ in 0..RFID_ATTEMPTS {
            let candidate = rand::thread_rng().gen_range(RFID_MIN..=RFID_MAX);
            if !self.users.rfid_exists(candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::internal("Could not allocate an unused card number"))
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn phone_login_or_register(&self, phone_number: &str) -> AppResult<PhoneCheck> {
        let existing = find_user_by_phone(self.users.as_ref(), phone_number).await?;
        tracing::debug!(found = existing.is_some(), "Phone lookup");
        Ok(PhoneCheck {
            exists: existing.is_some(),
        })
    }

    async fn send_otp(&self, phone_number: &str, client_ip: &str) -> AppResult<OtpSent> {
        let phone = canonical_phone(phone_number)?;
        let phone_counter = format!("phone:{phone}");
        let ip_counter = format!("ip:{client_ip}");

        if self.otp.cooldown_active(&phone).await? {
            tracing::warn!(phone = %phone, "OTP resend cooldown hit");
            return Err(AppError::too_many_requests(format!(
                "Molimo sačekajte {} sekundi prije ponovnog slanja OTP-a.",
                self.config.resend_cooldown_seconds
            )));
        }
        if self.otp.sends_this_hour(&phone_counter).await? >= self.config.max_per_phone_per_hour {
            tracing::warn!(phone = %phone, "OTP hourly phone limit hit");
            return Err(AppError::too_many_requests(
                "Previše pokušaja. Pokušajte ponovo za 1 sat.",
            ));
        }
        if self.otp.sends_this_hour(&ip_counter).await? >= self.config.max_per_ip_per_hour {
            tracing::warn!(ip = %client_ip, "OTP hourly IP limit hit");
            return Err(AppError::too_many_requests(
                "Previše pokušaja s ove IP adrese. Pokušajte ponovo za 1 sat.",
            ));
        }

        let code = Self::generate_code();
        self.otp.save_code(&phone, &code, self.config.ttl_seconds).await?;
        self.otp.record_send(&phone_counter).await?;
        self.otp.record_send(&ip_counter).await?;
        self.otp
            .start_cooldown(&phone, self.config.resend_cooldown_seconds)
            .await?;

        let message = format!("Vaš OTP kod je: {code}. Kod je važan 5 minuta.");
        if let Err(e) = self.sms.send(&phone, &message).await {
            tracing::error!(phone = %phone, "SMS delivery failed: {e}");
            return Err(AppError::service_unavailable("Slanje SMS poruke trenutno nije moguće."));
        }

        Ok(OtpSent {
            success: true,
            message: "OTP kod je poslan na vaš broj telefona.".to_string(),
        })
    }

    async fn verify_otp(&self, phone_number: &str, otp: &str) -> AppResult<OtpVerification> {
        if otp.chars().count() != OTP_LENGTH {
            return Err(AppError::validation(format!(
                "OTP kod mora imati {OTP_LENGTH} znakova."
            )));
        }
        let phone = canonical_phone(phone_number)?;

        match self.otp.code(&phone).await? {
            Some(stored) if stored == otp => {}
            _ => return Err(AppError::validation(WRONG_OTP)),
        }
        self.otp.discard_code(&phone).await?;

        match find_user_by_phone(self.users.as_ref(), phone_number).await? {
            Some(user) => {
                let token = self.tokens.issue(&user)?;
                tracing::info!(user_id = user.id, "Member signed in");
                Ok(OtpVerification {
                    success: true,
                    message: "Uspješna prijava!".to_string(),
                    token: Some(token.access_token),
                    user: Some(UserProfile::from(&user)),
                    is_new_user: false,
                })
            }
            None => {
                self.otp
                    .mark_verified(&phone, self.config.registration_window_seconds)
                    .await?;
                Ok(OtpVerification {
                    success: true,
                    message: "OTP kod je ispravan.".to_string(),
                    token: None,
                    user: None,
                    is_new_user: true,
                })
            }
        }
    }

    async fn check_email(&self, email: &str) -> AppResult<EmailAvailability> {
        let available = self.users.find_by_email(email.trim()).await?.is_none();
        let message = if available {
            "Email je dostupan."
        } else {
            "Email je već u upotrebi."
        };
        Ok(EmailAvailability {
            available,
            message: message.to_string(),
        })
    }

    async fn complete_registration(
        &self,
        request: RegistrationRequest,
    ) -> AppResult<Registration> {
        let phone = canonical_phone(&request.phone_number)?;
        if !self.otp.is_verified(&phone).await? {
            tracing::warn!(phone = %phone, "Registration without a verified phone");
            return Err(AppError::Unauthorized);
        }

        let name = required_name(&request.name, "ime")?;
        let surname = required_name(&request.surname, "prezime")?;
        let email = request.email.trim().to_string();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        if find_user_by_phone(self.users.as_ref(), &phone).await?.is_some() {
            return Err(AppError::conflict(PHONE_TAKEN));
        }

        let rfid = self.unused_rfid().await?;
        let mut user = self
            .users
            .create(NewLoyaltyUser {
                username: format!("{name} {surname}"),
                email,
                phone: phone.clone(),
                rfid,
            })
            .await?;
        tracing::info!(user_id = user.id, rfid, "Member registered");

        let bonus = award_welcome_bonus(self.bonuses.as_ref(), self.ledger.as_ref(), &user).await?;
        let bonus = bonus.map(|(grant, balance)| {
            user.points = balance;
            user.is_app = true;
            grant
        });

        self.otp.clear_verified(&phone).await?;
        let token = self.tokens.issue(&user)?;

        Ok(Registration {
            success: true,
            message: "Registracija uspješna!".to_string(),
            token: token.access_token,
            user: UserProfile::from(&user),
            bonus,
        })
    }
}
