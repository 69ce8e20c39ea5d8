//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    admin_routes, auth_routes, health_routes, ledger_routes, notification_routes, profile_routes,
    public_routes, records_routes, reservation_routes,
};
use crate::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Sign-in endpoints: no auth, stricter rate limit
    let sign_in = auth_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_auth_middleware,
    ));

    // Read-only configuration: no auth, general rate limit
    let public = public_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ));

    // Member and admin endpoints: auth required, general rate limit.
    // The rate limit layer is added last so it runs before authentication.
    let members = Router::new()
        .merge(profile_routes())
        .merge(notification_routes())
        .merge(ledger_routes())
        .merge(reservation_routes())
        .merge(records_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no auth, no rate limit)
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", sign_in.merge(public).merge(members))
        .with_state(state)
}
