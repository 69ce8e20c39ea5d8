//! Eye exam reservations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::bonus_service::USER_NOT_FOUND;
use crate::repository::{ReservationRepository, UserRepository};
use common::{AppError, AppResult};
use domain::reservation::{build_time_slots, RESERVATION_NOT_FOUND_MESSAGE};
use domain::{LoyaltyUser, NewReservation, Reservation, SlotKey, TimeSlot};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Regular and staff-opened slots for a branch and day, in time order.
    async fn time_slots(&self, poslovnica: &str, datum: NaiveDate) -> AppResult<Vec<TimeSlot>>;

    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation>;

    /// The member's reservations, newest first.
    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Reservation>>;

    /// Move one of the member's reservations to another slot.
    async fn update(&self, user_id: i64, id: i32, slot: SlotKey) -> AppResult<Reservation>;

    async fn cancel(&self, user_id: i64, id: i32) -> AppResult<()>;
}

pub struct ReservationManager {
    users: Arc<dyn UserRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl ReservationManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            users,
            reservations,
        }
    }

    async fn member(&self, user_id: i64) -> AppResult<LoyaltyUser> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    async fn owned(&self, user_id: i64, id: i32) -> AppResult<Reservation> {
        let user = self.member(user_id).await?;
        self.reservations
            .find_owned(id, &user.email)
            .await?
            .ok_or_else(|| AppError::not_found(RESERVATION_NOT_FOUND_MESSAGE))
    }
}

fn require_branch(poslovnica: &str) -> AppResult<()> {
    if poslovnica.trim().is_empty() {
        return Err(AppError::validation("Poslovnica je obavezna."));
    }
    Ok(())
}

#[async_trait]
impl ReservationService for ReservationManager {
    async fn time_slots(&self, poslovnica: &str, datum: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        require_branch(poslovnica)?;
        let booked = self.reservations.booked_times(poslovnica, datum).await?;
        let openings = self.reservations.admin_openings(poslovnica, datum).await?;
        Ok(build_time_slots(&booked, &openings))
    }

    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation> {
        require_branch(&reservation.poslovnica)?;
        let created = self.reservations.create(reservation).await?;
        tracing::info!(
            id = created.id_rezervacije,
            poslovnica = %created.poslovnica,
            datum = %created.datum,
            "Reservation created"
        );
        Ok(created)
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Reservation>> {
        let user = self.member(user_id).await?;
        self.reservations.list_by_email(&user.email).await
    }

    async fn update(&self, user_id: i64, id: i32, slot: SlotKey) -> AppResult<Reservation> {
        require_branch(&slot.poslovnica)?;
        self.owned(user_id, id).await?;
        let updated = self.reservations.reschedule(id, slot).await?;
        tracing::info!(id, "Reservation rescheduled");
        Ok(updated)
    }

    async fn cancel(&self, user_id: i64, id: i32) -> AppResult<()> {
        self.owned(user_id, id).await?;
        self.reservations.delete(id).await?;
        tracing::info!(id, "Reservation cancelled");
        Ok(())
    }
}
