//! SeaORM entities.

pub mod admin_opening;
pub mod app_setting;
pub mod bonus_config;
pub mod notification;
pub mod reservation;
pub mod transaction;
pub mod user;
