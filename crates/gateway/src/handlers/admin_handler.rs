//! Admin configuration handlers. Every route requires the admin role.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::AppResult;
use domain::{BonusConfig, BonusUpdate, DiscountConfig, FeaturedActionConfig, FeaturedActionUpdate};

use crate::middleware::{require_admin, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct BonusConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: BonusConfig,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub success: bool,
    pub message: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: DiscountConfig,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: FeaturedActionConfig,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeaturedToggleRequest {
    pub enabled: bool,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/bonus/config", put(update_bonus_config))
        .route("/admin/bonus/toggle", post(toggle_bonus))
        .route("/admin/discount/config", put(update_discount_config))
        .route("/admin/featured-action/config", put(update_featured_action))
        .route("/admin/featured-action/toggle", post(toggle_featured_action))
}

/// Change welcome bonus settings
#[utoipa::path(
    put,
    path = "/api/admin/bonus/config",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = BonusUpdate,
    responses(
        (status = 200, description = "Saved settings", body = BonusConfigResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn update_bonus_config(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(update): Json<BonusUpdate>,
) -> AppResult<Json<BonusConfigResponse>> {
    require_admin(&current_user)?;
    let config = state.services.bonus().update_config(update).await?;
    Ok(Json(BonusConfigResponse {
        success: true,
        message: "Bonus konfiguracija je ažurirana".to_string(),
        config,
    }))
}

/// Switch the welcome bonus on or off
#[utoipa::path(
    post,
    path = "/api/admin/bonus/toggle",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New state", body = ToggleResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn toggle_bonus(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ToggleResponse>> {
    require_admin(&current_user)?;
    let config = state.services.bonus().toggle().await?;
    let message = if config.enabled {
        "Bonus sistem je uključen"
    } else {
        "Bonus sistem je isključen"
    };
    Ok(Json(ToggleResponse {
        success: true,
        message: message.to_string(),
        enabled: config.enabled,
    }))
}

/// Replace discount settings
#[utoipa::path(
    put,
    path = "/api/admin/discount/config",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = DiscountConfig,
    responses(
        (status = 200, description = "Saved settings", body = DiscountConfigResponse),
        (status = 400, description = "Percentage out of range"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn update_discount_config(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(config): Json<DiscountConfig>,
) -> AppResult<Json<DiscountConfigResponse>> {
    require_admin(&current_user)?;
    let config = state.services.discount().update(config).await?;
    Ok(Json(DiscountConfigResponse {
        success: true,
        message: "Konfiguracija popusta je ažurirana".to_string(),
        config,
    }))
}

/// Merge changes into the featured action
#[utoipa::path(
    put,
    path = "/api/admin/featured-action/config",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = FeaturedActionUpdate,
    responses(
        (status = 200, description = "Saved configuration", body = FeaturedConfigResponse),
        (status = 400, description = "Field too long or end date before start"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn update_featured_action(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(update): Json<FeaturedActionUpdate>,
) -> AppResult<Json<FeaturedConfigResponse>> {
    require_admin(&current_user)?;
    let config = state.services.featured().update(update).await?;
    Ok(Json(FeaturedConfigResponse {
        success: true,
        message: "Istaknuta akcija je ažurirana".to_string(),
        config,
    }))
}

/// Show or hide the featured action
#[utoipa::path(
    post,
    path = "/api/admin/featured-action/toggle",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = FeaturedToggleRequest,
    responses(
        (status = 200, description = "New state", body = ToggleResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn toggle_featured_action(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(req): Json<FeaturedToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    require_admin(&current_user)?;
    let config = state.services.featured().set_enabled(req.enabled).await?;
    let message = if config.enabled {
        "Istaknuta akcija je uključena"
    } else {
        "Istaknuta akcija je isključena"
    };
    Ok(Json(ToggleResponse {
        success: true,
        message: message.to_string(),
        enabled: config.enabled,
    }))
}
