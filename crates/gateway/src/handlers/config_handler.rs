//! Public configuration read by the app before sign-in.

use axum::{extract::State, response::Json, routing::get, Router};

use common::AppResult;
use domain::{BonusConfig, DiscountConfig, FeaturedActionView};

use super::records_handler::companies;
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/bonus/config", get(bonus_config))
        .route("/discount/config", get(discount_config))
        .route("/featured-action/config", get(featured_action))
        .route("/companies", get(companies))
}

/// Welcome bonus settings
#[utoipa::path(
    get,
    path = "/api/bonus/config",
    tag = "Configuration",
    responses((status = 200, description = "Bonus settings", body = BonusConfig))
)]
pub async fn bonus_config(State(state): State<AppState>) -> AppResult<Json<BonusConfig>> {
    Ok(Json(state.services.bonus().config().await?))
}

/// Shop discount and cashback settings
#[utoipa::path(
    get,
    path = "/api/discount/config",
    tag = "Configuration",
    responses((status = 200, description = "Discount settings", body = DiscountConfig))
)]
pub async fn discount_config(State(state): State<AppState>) -> AppResult<Json<DiscountConfig>> {
    Ok(Json(state.services.discount().get().await?))
}

/// Home screen promotion as currently shown
#[utoipa::path(
    get,
    path = "/api/featured-action/config",
    tag = "Configuration",
    responses((status = 200, description = "Featured action", body = FeaturedActionView))
)]
pub async fn featured_action(
    State(state): State<AppState>,
) -> AppResult<Json<FeaturedActionView>> {
    Ok(Json(state.services.featured().current().await?))
}
