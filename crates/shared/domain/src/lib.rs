//! Domain layer - loyalty program entities, rules and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Anything time-dependent takes the current date or time as an argument.

pub mod bonus;
pub mod constants;
pub mod discount;
pub mod error;
pub mod featured;
pub mod notification;
pub mod order;
pub mod phone;
pub mod points;
pub mod records;
pub mod reservation;
pub mod transaction;
pub mod user;

pub use bonus::{BonusConfig, BonusGrant, BonusUpdate};
pub use constants::*;
pub use discount::DiscountConfig;
pub use error::{DomainError, DomainResult};
pub use featured::{FeaturedActionConfig, FeaturedActionUpdate, FeaturedActionView};
pub use notification::{Notification, NotificationSettings, NotificationSettingsInput, NotificationView};
pub use order::{CustomerInfo, LineItem, OrderProduct, OrderRequest};
pub use phone::PhoneNumber;
pub use points::Points;
pub use reservation::{NewReservation, Reservation, SlotKey, TimeSlot};
pub use transaction::{LedgerAction, NewTransaction, OrderPointsOutcome, Transaction, TransactionView};
pub use user::{DiopterData, DiopterUpdate, LoyaltyUser, NewLoyaltyUser, ProfileUpdate, UserProfile, UserRole};
