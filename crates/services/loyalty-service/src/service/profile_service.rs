//! Member profile and prescription.

use std::sync::Arc;

use async_trait::async_trait;

use super::auth_service::INVALID_PHONE;
use super::bonus_service::USER_NOT_FOUND;
use crate::repository::UserRepository;
use common::{AppError, AppResult};
use domain::{
    DiopterUpdate, LoyaltyUser, PhoneNumber, ProfileUpdate, UserProfile, MAX_DIOPTER_LENGTH,
    MAX_NAME_LENGTH, MAX_PHONE_LENGTH,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const EMAIL_IN_USE: &str = "Email je već u upotrebi.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, user_id: i64) -> AppResult<UserProfile>;

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> AppResult<UserProfile>;

    async fn update_diopter(&self, user_id: i64, update: DiopterUpdate) -> AppResult<UserProfile>;
}

pub struct ProfileManager {
    users: Arc<dyn UserRepository>,
}

impl ProfileManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    async fn member(&self, user_id: i64) -> AppResult<LoyaltyUser> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }
}

fn too_long(value: &str, max: u64) -> bool {
    value.chars().count() as u64 > max
}

#[async_trait]
impl ProfileService for ProfileManager {
    async fn get_profile(&self, user_id: i64) -> AppResult<UserProfile> {
        self.member(user_id).await.map(UserProfile::from)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        mut update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        if let Some(name) = update.username.as_deref() {
            if name.trim().is_empty() || too_long(name, MAX_NAME_LENGTH) {
                return Err(AppError::validation("Ime mora imati između 1 i 255 znakova."));
            }
        }

        if let Some(email) = update.email.as_deref() {
            if let Some(owner) = self.users.find_by_email(email).await? {
                if owner.id != user_id {
                    return Err(AppError::conflict(EMAIL_IN_USE));
                }
            }
        }

        if let Some(raw) = update.phone.take() {
            if too_long(&raw, MAX_PHONE_LENGTH) {
                return Err(AppError::validation(format!(
                    "Broj telefona može imati najviše {MAX_PHONE_LENGTH} znakova."
                )));
            }
            // Blank clears the number; anything else must be a valid one
            let stored = if raw.trim().is_empty() {
                String::new()
            } else {
                PhoneNumber::parse(&raw)
                    .map(PhoneNumber::into_inner)
                    .ok_or_else(|| AppError::validation(INVALID_PHONE))?
            };
            update.phone = Some(stored);
        }

        // Confirms the member exists before writing
        self.member(user_id).await?;
        let user = self.users.update_profile(user_id, update).await?;
        tracing::info!(user_id, "Profile updated");
        Ok(UserProfile::from(user))
    }

    async fn update_diopter(&self, user_id: i64, update: DiopterUpdate) -> AppResult<UserProfile> {
        let fields = [
            &update.dsph,
            &update.dcyl,
            &update.daxa,
            &update.lsph,
            &update.lcyl,
            &update.laxa,
            &update.ldadd,
        ];
        if fields
            .iter()
            .any(|f| f.as_deref().is_some_and(|v| too_long(v, MAX_DIOPTER_LENGTH)))
        {
            return Err(AppError::validation(format!(
                "Vrijednosti dioptrije mogu imati najviše {MAX_DIOPTER_LENGTH} znakova."
            )));
        }

        let user = self.member(user_id).await?;
        let diopter = update.apply(&user.diopter);
        let user = self.users.update_diopter(user_id, diopter).await?;
        Ok(UserProfile::from(user))
    }
}
