//! Phone sign-in and registration handlers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use loyalty_service_lib::service::{
    EmailAvailability, OtpSent, OtpVerification, PhoneCheck, Registration, RegistrationRequest,
};

use crate::extractors::ValidatedJson;
use crate::middleware::client_ip;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PhoneRequest {
    #[validate(length(min = 1, max = 20, message = "Broj telefona je obavezan."))]
    #[schema(example = "061 201 891")]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 20, message = "Broj telefona je obavezan."))]
    pub phone_number: String,
    #[validate(length(equal = 6, message = "OTP kod mora imati 6 znakova."))]
    #[schema(example = "042917")]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckEmailRequest {
    #[validate(email(message = "Email adresa nije ispravna."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteRegistrationRequest {
    #[validate(length(min = 1, max = 20, message = "Broj telefona je obavezan."))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 255, message = "Ime je obavezno."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Prezime je obavezno."))]
    pub surname: String,
    #[validate(email(message = "Email adresa nije ispravna."))]
    pub email: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/phone-login-or-register", post(phone_login_or_register))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/check-email", post(check_email))
        .route("/complete-registration", post(complete_registration))
}

/// Whether a member exists for the phone
#[utoipa::path(
    post,
    path = "/api/phone-login-or-register",
    tag = "Authentication",
    request_body = PhoneRequest,
    responses(
        (status = 200, description = "Lookup result", body = PhoneCheck),
        (status = 400, description = "Validation error")
    )
)]
pub async fn phone_login_or_register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PhoneRequest>,
) -> AppResult<Json<PhoneCheck>> {
    let result = state
        .services
        .auth()
        .phone_login_or_register(&req.phone_number)
        .await?;
    Ok(Json(result))
}

/// Send a one-time code by SMS
#[utoipa::path(
    post,
    path = "/api/send-otp",
    tag = "Authentication",
    request_body = PhoneRequest,
    responses(
        (status = 200, description = "Code sent", body = OtpSent),
        (status = 429, description = "Cooldown or hourly limit reached"),
        (status = 503, description = "SMS delivery failed")
    )
)]
pub async fn send_otp(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<PhoneRequest>,
) -> AppResult<Json<OtpSent>> {
    let ip = client_ip(&headers, connect_info.map(|ci| ci.0));
    let sent = state
        .services
        .auth()
        .send_otp(&req.phone_number, &ip)
        .await?;
    Ok(Json(sent))
}

/// Check a one-time code
#[utoipa::path(
    post,
    path = "/api/verify-otp",
    tag = "Authentication",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Signed in, or registration may continue", body = OtpVerification),
        (status = 400, description = "Wrong code")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<OtpVerification>> {
    let verified = state
        .services
        .auth()
        .verify_otp(&req.phone_number, &req.otp)
        .await?;
    Ok(Json(verified))
}

/// Whether an email is still free
#[utoipa::path(
    post,
    path = "/api/check-email",
    tag = "Authentication",
    request_body = CheckEmailRequest,
    responses(
        (status = 200, description = "Availability", body = EmailAvailability)
    )
)]
pub async fn check_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckEmailRequest>,
) -> AppResult<Json<EmailAvailability>> {
    let availability = state.services.auth().check_email(&req.email).await?;
    Ok(Json(availability))
}

/// Create the member for a verified phone
#[utoipa::path(
    post,
    path = "/api/complete-registration",
    tag = "Authentication",
    request_body = CompleteRegistrationRequest,
    responses(
        (status = 200, description = "Member created and signed in", body = Registration),
        (status = 401, description = "Phone not verified"),
        (status = 409, description = "Email or phone already registered")
    )
)]
pub async fn complete_registration(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CompleteRegistrationRequest>,
) -> AppResult<Json<Registration>> {
    let registration = state
        .services
        .auth()
        .complete_registration(RegistrationRequest {
            phone_number: req.phone_number,
            name: req.name,
            surname: req.surname,
            email: req.email,
        })
        .await?;
    Ok(Json(registration))
}
