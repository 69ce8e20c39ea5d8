//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub database: ServiceHealth,
    pub redis: ServiceHealth,
}

/// Service health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    fn from_probe(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy".to_string(),
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy".to_string(),
                error: Some(e),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Database and Redis reachability
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "A dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let probe = state.health.probe().await;
    let services = ServiceStatus {
        database: ServiceHealth::from_probe(probe.database),
        redis: ServiceHealth::from_probe(probe.redis),
    };
    let healthy = services.database.is_healthy() && services.redis.is_healthy();
    if !healthy {
        tracing::warn!(?services, "Health check degraded");
    }

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        services,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response)).into_response()
}
