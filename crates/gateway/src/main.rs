//! Loyalty API - HTTP server and migration runner.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loyalty_service_lib::config::LoyaltyConfig;
use loyalty_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "loyalty-api")]
#[command(about = "Optician loyalty program API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Defaults to the HOST variable
        #[arg(long)]
        host: Option<String>,
        /// Defaults to the PORT variable
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(cmd: MigrateCommand) -> Self {
        match cmd {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = LoyaltyConfig::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            gateway_lib::run_server(config, &host, port).await?;
        }
        Commands::Migrate { action } => {
            loyalty_service_lib::run_migrations(&config, action.into()).await?;
        }
    }

    Ok(())
}
