//! Glasses, eye exam history and partner company handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use common::AppResult;
use domain::records::company::Company;
use domain::records::glasses::Glasses;
use domain::records::review::Review;

use super::DataResponse;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CompaniesResponse {
    pub success: bool,
    pub data: Vec<Company>,
    pub count: usize,
}

/// Member routes; companies are public and live in the config routes.
pub fn records_routes() -> Router<AppState> {
    Router::new()
        .route("/user/glasses", get(user_glasses))
        .route("/user/review-history", get(review_history))
}

/// Eyewear bought by the member
#[utoipa::path(
    get,
    path = "/api/user/glasses",
    tag = "Records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`{success, data}`", body = Vec<Glasses>),
        (status = 400, description = "Member has no phone on file"),
        (status = 503, description = "Sheet not configured")
    )
)]
pub async fn user_glasses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Glasses>>>> {
    let glasses = state.services.records().glasses(current_user.id).await?;
    Ok(Json(DataResponse::new(glasses)))
}

/// Eye exams of the member
#[utoipa::path(
    get,
    path = "/api/user/review-history",
    tag = "Records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`{success, data}`", body = Vec<Review>),
        (status = 400, description = "Member has no phone on file"),
        (status = 503, description = "Sheet not configured")
    )
)]
pub async fn review_history(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = state
        .services
        .records()
        .review_history(current_user.id)
        .await?;
    Ok(Json(DataResponse::new(reviews)))
}

/// Partner companies with member discounts
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Records",
    responses(
        (status = 200, description = "Companies", body = CompaniesResponse),
        (status = 503, description = "Sheet not configured")
    )
)]
pub async fn companies(State(state): State<AppState>) -> AppResult<Json<CompaniesResponse>> {
    let data = state.services.records().companies().await?;
    Ok(Json(CompaniesResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
