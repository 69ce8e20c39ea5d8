//! Eye exam reservation handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::reservation::parse_slot_time;
use domain::{NewReservation, Reservation, SlotKey, TimeSlot};

use super::{DataResponse, MessageResponse};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TimeSlotsRequest {
    #[schema(value_type = String, example = "2025-06-12")]
    pub datum: NaiveDate,
    #[validate(length(min = 1, message = "Poslovnica je obavezna."))]
    pub poslovnica: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "Poslovnica je obavezna."))]
    pub poslovnica: String,
    #[schema(value_type = String, example = "2025-06-12")]
    pub datum: NaiveDate,
    /// HH:MM:SS
    #[schema(example = "10:30:00")]
    pub vrijeme: String,
    #[validate(length(min = 1, message = "Ime je obavezno."))]
    pub ime: String,
    #[validate(length(min = 1, message = "Prezime je obavezno."))]
    pub prezime: String,
    #[validate(length(min = 1, message = "Telefon je obavezan."))]
    pub telefon: String,
    #[validate(email(message = "Email adresa nije ispravna."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationRequest {
    pub id_rezervacije: i32,
    #[validate(length(min = 1, message = "Poslovnica je obavezna."))]
    pub poslovnica: String,
    #[schema(value_type = String, example = "2025-06-12")]
    pub datum: NaiveDate,
    #[schema(example = "11:00:00")]
    pub vrijeme: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelReservationRequest {
    pub id_rezervacije: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub success: bool,
    pub message: String,
    pub data: Reservation,
}

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations/time-slots", post(time_slots))
        .route("/reservations/create", post(create_reservation))
        .route("/reservations/user", get(user_reservations))
        .route("/user/appointments", get(user_reservations))
        .route("/reservations/update", put(update_reservation))
        .route("/reservations/cancel", delete(cancel_reservation))
}

/// Slots for a branch and day
#[utoipa::path(
    post,
    path = "/api/reservations/time-slots",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = TimeSlotsRequest,
    responses((status = 200, description = "`{success, data}` with slots in time order", body = Vec<TimeSlot>))
)]
pub async fn time_slots(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TimeSlotsRequest>,
) -> AppResult<Json<DataResponse<Vec<TimeSlot>>>> {
    let slots = state
        .services
        .reservations()
        .time_slots(&req.poslovnica, req.datum)
        .await?;
    Ok(Json(DataResponse::new(slots)))
}

/// Book a slot
#[utoipa::path(
    post,
    path = "/api/reservations/create",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Slot already taken")
    )
)]
pub async fn create_reservation(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = NewReservation {
        poslovnica: req.poslovnica,
        datum: req.datum,
        vrijeme: parse_slot_time(&req.vrijeme)?,
        ime: req.ime,
        prezime: req.prezime,
        telefon: req.telefon,
        email: req.email,
    };
    let created = state.services.reservations().create(reservation).await?;
    Ok(Json(ReservationResponse {
        success: true,
        message: "Rezervacija je uspješno kreirana".to_string(),
        data: created,
    }))
}

/// The member's reservations, newest first
#[utoipa::path(
    get,
    path = "/api/reservations/user",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "`{success, data}`", body = Vec<Reservation>))
)]
pub async fn user_reservations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Reservation>>>> {
    let reservations = state
        .services
        .reservations()
        .list_for_user(current_user.id)
        .await?;
    Ok(Json(DataResponse::new(reservations)))
}

/// Move a reservation to another slot
#[utoipa::path(
    put,
    path = "/api/reservations/update",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation moved", body = ReservationResponse),
        (status = 400, description = "Slot already taken"),
        (status = 404, description = "Not the member's reservation")
    )
)]
pub async fn update_reservation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let slot = SlotKey {
        poslovnica: req.poslovnica,
        datum: req.datum,
        vrijeme: parse_slot_time(&req.vrijeme)?,
    };
    let updated = state
        .services
        .reservations()
        .update(current_user.id, req.id_rezervacije, slot)
        .await?;
    Ok(Json(ReservationResponse {
        success: true,
        message: "Rezervacija je uspješno ažurirana".to_string(),
        data: updated,
    }))
}

/// Cancel a reservation
#[utoipa::path(
    delete,
    path = "/api/reservations/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CancelReservationRequest,
    responses(
        (status = 200, description = "Reservation cancelled", body = MessageResponse),
        (status = 404, description = "Not the member's reservation")
    )
)]
pub async fn cancel_reservation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(req): Json<CancelReservationRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .reservations()
        .cancel(current_user.id, req.id_rezervacije)
        .await?;
    Ok(Json(MessageResponse::new("Rezervacija je uspješno otkazana")))
}
