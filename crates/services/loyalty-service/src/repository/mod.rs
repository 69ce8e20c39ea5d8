//! Repository layer for data access.

pub mod entities;
mod bonus_repository;
mod ledger_repository;
mod notification_repository;
mod reservation_repository;
mod settings_repository;
mod tx;
mod user_repository;

pub use bonus_repository::{BonusRepository, BonusStore};
pub use ledger_repository::{LedgerRepository, LedgerStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use reservation_repository::{ReservationRepository, ReservationStore};
pub use settings_repository::{SettingsRepository, SettingsStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use bonus_repository::MockBonusRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use ledger_repository::MockLedgerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reservation_repository::MockReservationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use settings_repository::MockSettingsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
