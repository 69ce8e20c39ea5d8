//! Exam reservation repository.
//!
//! Creating and moving a reservation checks the slot and writes in the same
//! serializable transaction, and the slot columns carry a unique index, so
//! two members cannot end up in one slot.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::admin_opening::{self, Entity as AdminOpeningEntity};
use super::entities::reservation::{self, Entity as ReservationEntity};
use super::tx::{begin, finish, is_unique_violation};
use common::{AppError, AppResult};
use domain::reservation::{RESERVATION_NOT_FOUND_MESSAGE, SLOT_TAKEN_MESSAGE};
use domain::{NewReservation, Reservation, SlotKey};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Times already reserved at a branch on a day.
    async fn booked_times(&self, poslovnica: &str, datum: NaiveDate) -> AppResult<Vec<NaiveTime>>;

    /// Extra slots staff opened at a branch on a day.
    async fn admin_openings(&self, poslovnica: &str, datum: NaiveDate)
        -> AppResult<Vec<NaiveTime>>;

    /// Book a free slot under the next reservation number.
    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation>;

    /// Newest first.
    async fn list_by_email(&self, email: &str) -> AppResult<Vec<Reservation>>;

    async fn find_owned(&self, id: i32, email: &str) -> AppResult<Option<Reservation>>;

    /// Move a reservation to another free slot.
    async fn reschedule(&self, id: i32, slot: SlotKey) -> AppResult<Reservation>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ReservationStore {
    db: DatabaseConnection,
}

impl ReservationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn slot_taken(
        txn: &DatabaseTransaction,
        slot: &SlotKey,
        except: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = ReservationEntity::find()
            .filter(reservation::Column::Poslovnica.eq(slot.poslovnica.as_str()))
            .filter(reservation::Column::Datum.eq(slot.datum))
            .filter(reservation::Column::Vrijeme.eq(slot.vrijeme));
        if let Some(id) = except {
            query = query.filter(reservation::Column::IdRezervacije.ne(id));
        }

        let found = query.one(txn).await.map_err(AppError::from)?;
        Ok(found.is_some())
    }

    async fn next_id(txn: &DatabaseTransaction) -> AppResult<i32> {
        let max: Option<Option<i32>> = ReservationEntity::find()
            .select_only()
            .column_as(reservation::Column::IdRezervacije.max(), "max_id")
            .into_tuple()
            .one(txn)
            .await
            .map_err(AppError::from)?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    async fn create_in(
        txn: &DatabaseTransaction,
        new: NewReservation,
    ) -> AppResult<Reservation> {
        let slot = SlotKey {
            poslovnica: new.poslovnica.clone(),
            datum: new.datum,
            vrijeme: new.vrijeme,
        };
        if Self::slot_taken(txn, &slot, None).await? {
            return Err(AppError::validation(SLOT_TAKEN_MESSAGE));
        }

        let id = Self::next_id(txn).await?;
        let model = reservation::ActiveModel {
            id_rezervacije: Set(id),
            poslovnica: Set(new.poslovnica),
            datum: Set(new.datum),
            vrijeme: Set(new.vrijeme),
            ime: Set(new.ime),
            prezime: Set(new.prezime),
            telefon: Set(new.telefon),
            email: Set(new.email),
        }
        .insert(txn)
        .await
        .map_err(slot_error)?;

        Ok(Reservation::from(model))
    }

    async fn reschedule_in(
        txn: &DatabaseTransaction,
        id: i32,
        slot: SlotKey,
    ) -> AppResult<Reservation> {
        let existing = ReservationEntity::find_by_id(id)
            .one(txn)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found(RESERVATION_NOT_FOUND_MESSAGE))?;

        if Self::slot_taken(txn, &slot, Some(id)).await? {
            return Err(AppError::validation(SLOT_TAKEN_MESSAGE));
        }

        let mut active: reservation::ActiveModel = existing.into();
        active.poslovnica = Set(slot.poslovnica);
        active.datum = Set(slot.datum);
        active.vrijeme = Set(slot.vrijeme);

        let model = active.update(txn).await.map_err(slot_error)?;
        Ok(Reservation::from(model))
    }
}

/// A unique violation on write means another booking won the slot.
fn slot_error(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::validation(SLOT_TAKEN_MESSAGE)
    } else {
        AppError::from(err)
    }
}

#[async_trait]
impl ReservationRepository for ReservationStore {
    async fn booked_times(&self, poslovnica: &str, datum: NaiveDate) -> AppResult<Vec<NaiveTime>> {
        let models = ReservationEntity::find()
            .filter(reservation::Column::Poslovnica.eq(poslovnica))
            .filter(reservation::Column::Datum.eq(datum))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.vrijeme).collect())
    }

    async fn admin_openings(
        &self,
        poslovnica: &str,
        datum: NaiveDate,
    ) -> AppResult<Vec<NaiveTime>> {
        let models = AdminOpeningEntity::find()
            .filter(admin_opening::Column::Poslovnica.eq(poslovnica))
            .filter(admin_opening::Column::Datum.eq(datum))
            .order_by_asc(admin_opening::Column::Vrijeme)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.vrijeme).collect())
    }

    async fn create(&self, new: NewReservation) -> AppResult<Reservation> {
        let txn = begin(&self.db, IsolationLevel::Serializable).await?;
        let result = Self::create_in(&txn, new).await;
        finish(txn, result).await
    }

    async fn list_by_email(&self, email: &str) -> AppResult<Vec<Reservation>> {
        let models = ReservationEntity::find()
            .filter(reservation::Column::Email.eq(email))
            .order_by_desc(reservation::Column::Datum)
            .order_by_desc(reservation::Column::Vrijeme)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Reservation::from).collect())
    }

    async fn find_owned(&self, id: i32, email: &str) -> AppResult<Option<Reservation>> {
        let model = ReservationEntity::find_by_id(id)
            .filter(reservation::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Reservation::from))
    }

    async fn reschedule(&self, id: i32, slot: SlotKey) -> AppResult<Reservation> {
        let txn = begin(&self.db, IsolationLevel::Serializable).await?;
        let result = Self::reschedule_in(&txn, id, slot).await;
        finish(txn, result).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ReservationEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(RESERVATION_NOT_FOUND_MESSAGE));
        }
        Ok(())
    }
}
