//! Loyalty API Library
//!
//! The HTTP surface of the loyalty app. Routes under `/api` translate JSON
//! requests into calls on the services of `loyalty_service_lib`.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use loyalty_service_lib::config::LoyaltyConfig;
use loyalty_service_lib::infra::{Cache, Database};
use loyalty_service_lib::service::Services;

use crate::routes::create_router;
use crate::state::{AppState, InfraProbe};

/// Connect to Postgres and Redis, apply pending migrations, then serve.
pub async fn run_server(
    config: LoyaltyConfig,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let cache = Cache::connect(&config.cache).await?;

    let services = Services::from_connection(db.get_connection(), cache.clone(), &config);
    let state = AppState::new(
        Arc::new(services),
        Arc::new(cache.clone()),
        Arc::new(InfraProbe::new(db, cache)),
        config.rate_limit,
        config.auth_rate_limit,
    );

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(service = %config.server.service_name, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
