//! Loyalty Service Library
//!
//! Member sign-in, points ledger, welcome bonus, eye exam reservations,
//! notifications and spreadsheet records for the optician loyalty app.
//! The HTTP gateway embeds this crate through [`service::Services`].

pub mod config;
pub mod infra;
pub mod integrations;
pub mod repository;
pub mod service;

use tracing::info;

use crate::config::LoyaltyConfig;
use crate::infra::Database;

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &LoyaltyConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{marker} {name}");
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
