//! Member profile, prescription and app bonus handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{DiopterUpdate, ProfileUpdate, UserProfile};
use loyalty_service_lib::service::AppBonusOutcome;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Ime mora imati između 1 i 255 znakova."))]
    #[schema(example = "Amra Hodžić")]
    pub name: Option<String>,
    #[validate(email(message = "Email adresa nije ispravna."))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Broj telefona može imati najviše 20 znakova."))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDiopterRequest {
    #[validate(length(max = 10))]
    pub dsph: Option<String>,
    #[validate(length(max = 10))]
    pub dcyl: Option<String>,
    #[validate(length(max = 10))]
    pub daxa: Option<String>,
    #[validate(length(max = 10))]
    pub lsph: Option<String>,
    #[validate(length(max = 10))]
    pub lcyl: Option<String>,
    #[validate(length(max = 10))]
    pub laxa: Option<String>,
    #[validate(length(max = 10))]
    pub ldadd: Option<String>,
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).put(update_profile))
        .route("/user/diopter", put(update_diopter))
        .route("/user/bonus/app", post(claim_app_bonus))
}

/// Current member profile
#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    let user = state.services.profile().get_profile(current_user.id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        user,
    }))
}

/// Change name, email or phone
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let update = ProfileUpdate {
        username: req.name,
        email: req.email,
        phone: req.phone,
    };
    let user = state
        .services
        .profile()
        .update_profile(current_user.id, update)
        .await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Profil je uspješno ažuriran.".to_string()),
        user,
    }))
}

/// Update prescription values
#[utoipa::path(
    put,
    path = "/api/user/diopter",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateDiopterRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Value longer than 10 characters")
    )
)]
pub async fn update_diopter(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateDiopterRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let update = DiopterUpdate {
        dsph: req.dsph,
        dcyl: req.dcyl,
        daxa: req.daxa,
        lsph: req.lsph,
        lcyl: req.lcyl,
        laxa: req.laxa,
        ldadd: req.ldadd,
    };
    let user = state
        .services
        .profile()
        .update_diopter(current_user.id, update)
        .await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Dioptrija je uspješno ažurirana.".to_string()),
        user,
    }))
}

/// Claim the welcome bonus for installing the app
#[utoipa::path(
    post,
    path = "/api/user/bonus/app",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bonus granted or already granted", body = AppBonusOutcome),
        (status = 400, description = "Bonus is switched off")
    )
)]
pub async fn claim_app_bonus(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AppBonusOutcome>> {
    let outcome = state
        .services
        .bonus()
        .grant_app_bonus(current_user.id)
        .await?;
    Ok(Json(outcome))
}
