//! Notification inbox, preferences and push token handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{NotificationSettings, NotificationSettingsInput, NotificationView};

use super::MessageResponse;
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: NotificationSettings,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InboxResponse {
    pub success: bool,
    pub notifications: Vec<NotificationView>,
    pub unread_count: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkReadRequest {
    #[validate(range(min = 1, message = "ID notifikacije je obavezan i mora biti valjan."))]
    pub notification_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub success: bool,
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PushTokenRequest {
    #[validate(length(min = 1, message = "Push token je obavezan."))]
    pub push_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PushTokenResponse {
    pub success: bool,
    pub message: String,
    pub push_token_set: bool,
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/user/notifications", get(get_settings).put(update_settings))
        .route("/user/notifications/list", get(list_notifications))
        .route("/user/notifications/mark-read", put(mark_read))
        .route("/user/notifications/mark-all-read", put(mark_all_read))
        .route("/user/push-token", put(update_push_token))
}

/// Notification preferences
#[utoipa::path(
    get,
    path = "/api/user/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Stored or default preferences", body = SettingsResponse))
)]
pub async fn get_settings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state
        .services
        .notifications()
        .settings(current_user.id)
        .await?;
    Ok(Json(SettingsResponse {
        success: true,
        settings,
    }))
}

/// Save notification preferences; omitted flags take their defaults
#[utoipa::path(
    put,
    path = "/api/user/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    request_body = NotificationSettingsInput,
    responses((status = 200, description = "Saved preferences", body = SettingsResponse))
)]
pub async fn update_settings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(input): Json<NotificationSettingsInput>,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state
        .services
        .notifications()
        .update_settings(current_user.id, input)
        .await?;
    Ok(Json(SettingsResponse {
        success: true,
        settings,
    }))
}

/// Inbox, newest first
#[utoipa::path(
    get,
    path = "/api/user/notifications/list",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Notifications with unread count", body = InboxResponse))
)]
pub async fn list_notifications(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<InboxResponse>> {
    let inbox = state.services.notifications().inbox(current_user.id).await?;
    Ok(Json(InboxResponse {
        success: true,
        notifications: inbox.notifications,
        unread_count: inbox.unread_count,
    }))
}

/// Mark one notification read
#[utoipa::path(
    put,
    path = "/api/user/notifications/mark-read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Marked read", body = MessageResponse),
        (status = 404, description = "Not the member's notification")
    )
)]
pub async fn mark_read(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MarkReadRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .notifications()
        .mark_read(current_user.id, req.notification_id)
        .await?;
    Ok(Json(MessageResponse::new("Notifikacija je označena kao pročitana.")))
}

/// Mark every notification read
#[utoipa::path(
    put,
    path = "/api/user/notifications/mark-all-read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Count of notifications updated", body = MarkAllReadResponse))
)]
pub async fn mark_all_read(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = state
        .services
        .notifications()
        .mark_all_read(current_user.id)
        .await?;
    Ok(Json(MarkAllReadResponse {
        success: true,
        message: "Sve notifikacije su označene kao pročitane.".to_string(),
        updated,
    }))
}

/// Register the device push token
#[utoipa::path(
    put,
    path = "/api/user/push-token",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    request_body = PushTokenRequest,
    responses(
        (status = 200, description = "Token stored", body = PushTokenResponse),
        (status = 400, description = "Empty token")
    )
)]
pub async fn update_push_token(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PushTokenRequest>,
) -> AppResult<Json<PushTokenResponse>> {
    let push_token_set = state
        .services
        .notifications()
        .set_push_token(current_user.id, req.push_token)
        .await?;
    Ok(Json(PushTokenResponse {
        success: true,
        message: "Push token je uspješno ažuriran.".to_string(),
        push_token_set,
    }))
}
