//! Application services - the loyalty use cases.
//!
//! Services depend on repository and integration traits, so each one can be
//! exercised with mocks.

mod auth_service;
mod bonus_service;
pub mod container;
mod ledger_service;
mod notification_service;
mod profile_service;
mod records_service;
mod reservation_service;
mod settings_service;
mod token_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{
    AuthService, Authenticator, EmailAvailability, OtpSent, OtpVerification, PhoneCheck,
    Registration, RegistrationRequest, EMAIL_TAKEN, INVALID_PHONE, PHONE_TAKEN, WRONG_OTP,
};
pub use bonus_service::{
    AppBonusOutcome, BonusManager, BonusMember, BonusService, BONUS_NOT_GRANTED, USER_NOT_FOUND,
};
pub use ledger_service::{LedgerManager, LedgerService, OrderPlaced, POINTS_PAYMENT_DISABLED};
pub use notification_service::{
    NotificationInbox, NotificationManager, NotificationService, PUSH_TOKEN_REQUIRED,
};
pub use profile_service::{ProfileManager, ProfileService, EMAIL_IN_USE};
pub use records_service::{RecordsService, SheetRecords, NO_PHONE};
pub use reservation_service::{ReservationManager, ReservationService};
pub use settings_service::{
    DiscountService, DiscountSettings, FeaturedActionService, FeaturedActionSettings,
};
pub use token_service::{Claims, JwtTokens, TokenResponse, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use bonus_service::MockBonusService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use ledger_service::MockLedgerService;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationService;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_service::MockProfileService;
#[cfg(any(test, feature = "test-utils"))]
pub use records_service::MockRecordsService;
#[cfg(any(test, feature = "test-utils"))]
pub use reservation_service::MockReservationService;
#[cfg(any(test, feature = "test-utils"))]
pub use settings_service::{MockDiscountService, MockFeaturedActionService};
#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenService;
