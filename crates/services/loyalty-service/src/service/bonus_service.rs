//! App welcome bonus: configuration and the one-time grant.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::repository::{BonusRepository, LedgerRepository, UserRepository};
use common::{AppError, AppResult};
use domain::{BonusConfig, BonusGrant, BonusUpdate, LoyaltyUser, Points};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const BONUS_NOT_GRANTED: &str = "Bonus nije dodijeljen.";
pub const USER_NOT_FOUND: &str = "Korisnik nije pronađen.";

/// Balance snapshot returned with a bonus claim.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BonusMember {
    pub id: i64,
    /// Whole KM
    pub points: i64,
    pub is_app: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppBonusOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_awarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusGrant>,
    pub user: BonusMember,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BonusService: Send + Sync {
    async fn config(&self) -> AppResult<BonusConfig>;

    async fn update_config(&self, update: BonusUpdate) -> AppResult<BonusConfig>;

    /// Flip the enabled flag.
    async fn toggle(&self) -> AppResult<BonusConfig>;

    /// Claim the welcome bonus for a member who installed the app.
    async fn grant_app_bonus(&self, user_id: i64) -> AppResult<AppBonusOutcome>;
}

/// Grant the welcome bonus if it is enabled and the member has not had it.
///
/// Returns the grant and the new balance.
pub(crate) async fn award_welcome_bonus(
    bonuses: &dyn BonusRepository,
    ledger: &dyn LedgerRepository,
    user: &LoyaltyUser,
) -> AppResult<Option<(BonusGrant, Points)>> {
    if user.is_app {
        return Ok(None);
    }

    let config = bonuses.get_or_create().await?;
    let Some(grant) = config.grant() else {
        return Ok(None);
    };

    let balance = ledger.grant_welcome_bonus(user, config.points()).await?;
    if let Some(balance) = balance {
        tracing::info!(user_id = user.id, points = grant.points, "Welcome bonus granted");
    }
    Ok(balance.map(|b| (grant, b)))
}

pub struct BonusManager {
    users: Arc<dyn UserRepository>,
    bonuses: Arc<dyn BonusRepository>,
    ledger: Arc<dyn LedgerRepository>,
}

impl BonusManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        bonuses: Arc<dyn BonusRepository>,
        ledger: Arc<dyn LedgerRepository>,
    ) -> Self {
        Self {
            users,
            bonuses,
            ledger,
        }
    }

    fn already_awarded(user: &LoyaltyUser) -> AppBonusOutcome {
        AppBonusOutcome {
            success: true,
            already_awarded: true,
            bonus: None,
            user: BonusMember {
                id: user.id,
                points: user.points.whole_km(),
                is_app: 1,
            },
        }
    }
}

#[async_trait]
impl BonusService for BonusManager {
    async fn config(&self) -> AppResult<BonusConfig> {
        self.bonuses.get_or_create().await
    }

    async fn update_config(&self, update: BonusUpdate) -> AppResult<BonusConfig> {
        let current = self.bonuses.get_or_create().await?;
        let updated = update.apply(current)?;
        let saved = self.bonuses.save(updated).await?;
        tracing::info!(enabled = saved.enabled, points = saved.bonus_points, "Bonus config updated");
        Ok(saved)
    }

    async fn toggle(&self) -> AppResult<BonusConfig> {
        let mut config = self.bonuses.get_or_create().await?;
        config.enabled = !config.enabled;
        let saved = self.bonuses.save(config).await?;
        tracing::info!(enabled = saved.enabled, "Bonus toggled");
        Ok(saved)
    }

    async fn grant_app_bonus(&self, user_id: i64) -> AppResult<AppBonusOutcome> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        if user.is_app {
            return Ok(Self::already_awarded(&user));
        }

        match award_welcome_bonus(self.bonuses.as_ref(), self.ledger.as_ref(), &user).await? {
            Some((grant, balance)) => Ok(AppBonusOutcome {
                success: true,
                already_awarded: false,
                bonus: Some(grant),
                user: BonusMember {
                    id: user.id,
                    points: balance.whole_km(),
                    is_app: 1,
                },
            }),
            None => {
                // Lost a race with a concurrent claim, or the bonus is off
                let fresh = self.users.find_by_id(user_id).await?;
                match fresh {
                    Some(fresh) if fresh.is_app => Ok(Self::already_awarded(&fresh)),
                    _ => Err(AppError::validation(BONUS_NOT_GRANTED)),
                }
            }
        }
    }
}
