//! Infrastructure layer - database, redis and migrations.

mod cache;
mod db;
pub mod migrations;
mod otp_store;

pub use cache::Cache;
pub use db::Database;
pub use migrations::Migrator;
pub use otp_store::{OtpStore, RedisOtpStore};

#[cfg(any(test, feature = "test-utils"))]
pub use otp_store::MockOtpStore;
