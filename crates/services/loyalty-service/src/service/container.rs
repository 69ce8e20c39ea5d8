//! Service container - one place that wires stores, integrations and
//! services together.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, BonusManager, BonusService, DiscountService, DiscountSettings,
    FeaturedActionService, FeaturedActionSettings, JwtTokens, LedgerManager, LedgerService,
    NotificationManager, NotificationService, ProfileManager, ProfileService, RecordsService,
    ReservationManager, ReservationService, SheetRecords, TokenService,
};
use crate::config::LoyaltyConfig;
use crate::infra::{Cache, RedisOtpStore};
use crate::integrations::{JsonFileSheets, LoggingOrderForwarder, LoggingSmsSender};
use crate::repository::{
    BonusStore, LedgerStore, NotificationStore, ReservationStore, SettingsStore, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Access to every application service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn tokens(&self) -> Arc<dyn TokenService>;
    fn profile(&self) -> Arc<dyn ProfileService>;
    fn ledger(&self) -> Arc<dyn LedgerService>;
    fn bonus(&self) -> Arc<dyn BonusService>;
    fn discount(&self) -> Arc<dyn DiscountService>;
    fn featured(&self) -> Arc<dyn FeaturedActionService>;
    fn reservations(&self) -> Arc<dyn ReservationService>;
    fn notifications(&self) -> Arc<dyn NotificationService>;
    fn records(&self) -> Arc<dyn RecordsService>;
}

#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    tokens: Arc<dyn TokenService>,
    profile: Arc<dyn ProfileService>,
    ledger: Arc<dyn LedgerService>,
    bonus: Arc<dyn BonusService>,
    discount: Arc<dyn DiscountService>,
    featured: Arc<dyn FeaturedActionService>,
    reservations: Arc<dyn ReservationService>,
    notifications: Arc<dyn NotificationService>,
    records: Arc<dyn RecordsService>,
}

impl Services {
    /// Build the production graph on top of a database pool and Redis.
    pub fn from_connection(db: DatabaseConnection, cache: Cache, config: &LoyaltyConfig) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let ledger_store = Arc::new(LedgerStore::new(db.clone()));
        let bonus_store = Arc::new(BonusStore::new(db.clone()));
        let settings = Arc::new(SettingsStore::new(db.clone()));
        let reservation_store = Arc::new(ReservationStore::new(db.clone()));
        let notification_store = Arc::new(NotificationStore::new(db));

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokens::new(&config.jwt));
        let discount: Arc<dyn DiscountService> = Arc::new(DiscountSettings::new(
            settings.clone(),
            config.discount_defaults,
        ));
        let featured = Arc::new(FeaturedActionSettings::new(
            settings,
            config.featured_defaults.clone(),
        ));

        let auth = Arc::new(Authenticator::new(
            users.clone(),
            bonus_store.clone(),
            ledger_store.clone(),
            Arc::new(RedisOtpStore::new(cache)),
            Arc::new(LoggingSmsSender::new(config.sms_sender.clone())),
            tokens.clone(),
            config.otp,
        ));
        let ledger = Arc::new(LedgerManager::new(
            users.clone(),
            ledger_store.clone(),
            discount.clone(),
            Arc::new(LoggingOrderForwarder::default()),
        ));
        let bonus = Arc::new(BonusManager::new(users.clone(), bonus_store, ledger_store));
        let records = Arc::new(SheetRecords::new(
            users.clone(),
            Arc::new(JsonFileSheets::new(config.sheets.clone())),
        ));

        Self {
            auth,
            tokens,
            profile: Arc::new(ProfileManager::new(users.clone())),
            ledger,
            bonus,
            discount,
            featured,
            reservations: Arc::new(ReservationManager::new(users.clone(), reservation_store)),
            notifications: Arc::new(NotificationManager::new(users, notification_store)),
            records,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenService> {
        self.tokens.clone()
    }

    fn profile(&self) -> Arc<dyn ProfileService> {
        self.profile.clone()
    }

    fn ledger(&self) -> Arc<dyn LedgerService> {
        self.ledger.clone()
    }

    fn bonus(&self) -> Arc<dyn BonusService> {
        self.bonus.clone()
    }

    fn discount(&self) -> Arc<dyn DiscountService> {
        self.discount.clone()
    }

    fn featured(&self) -> Arc<dyn FeaturedActionService> {
        self.featured.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationService> {
        self.reservations.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notifications.clone()
    }

    fn records(&self) -> Arc<dyn RecordsService> {
        self.records.clone()
    }
}
