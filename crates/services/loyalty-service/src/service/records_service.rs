//! Purchase history, eye exam history and partner companies read from the
//! business spreadsheets.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use super::bonus_service::USER_NOT_FOUND;
use crate::integrations::{Sheet, SheetSource};
use crate::repository::UserRepository;
use common::{AppError, AppResult};
use domain::records::company::{companies, Company};
use domain::records::glasses::{glasses_for, Glasses};
use domain::records::review::{reviews_for, Review};
use domain::records::SheetTable;
use domain::LoyaltyUser;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const NO_PHONE: &str = "Korisnik nema broj telefona. Molimo vas da ažurirate svoj profil.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordsService: Send + Sync {
    /// Eyewear bought by the member.
    async fn glasses(&self, user_id: i64) -> AppResult<Vec<Glasses>>;

    /// The member's eye exams.
    async fn review_history(&self, user_id: i64) -> AppResult<Vec<Review>>;

    /// Partner companies whose staff get the member discount.
    async fn companies(&self) -> AppResult<Vec<Company>>;
}

pub struct SheetRecords {
    users: Arc<dyn UserRepository>,
    sheets: Arc<dyn SheetSource>,
}

impl SheetRecords {
    pub fn new(users: Arc<dyn UserRepository>, sheets: Arc<dyn SheetSource>) -> Self {
        Self { users, sheets }
    }

    /// The member, who must have a phone to be linked against sheet rows.
    async fn linkable_member(&self, user_id: i64) -> AppResult<LoyaltyUser> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        if !user.has_phone() {
            return Err(AppError::validation(NO_PHONE));
        }
        Ok(user)
    }

    async fn table(&self, sheet: Sheet, lowercase_headers: bool) -> AppResult<SheetTable> {
        let rows = self.sheets.rows(sheet).await?;
        Ok(SheetTable::new(rows, lowercase_headers))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[async_trait]
impl RecordsService for SheetRecords {
    async fn glasses(&self, user_id: i64) -> AppResult<Vec<Glasses>> {
        let user = self.linkable_member(user_id).await?;
        let table = self.table(Sheet::Glasses, false).await?;
        let found = glasses_for(&table, &user.phone, &user.username, today());
        tracing::debug!(user_id, matched = found.len(), "Glasses linked");
        Ok(found)
    }

    async fn review_history(&self, user_id: i64) -> AppResult<Vec<Review>> {
        let user = self.linkable_member(user_id).await?;
        let table = self.table(Sheet::Reviews, true).await?;
        let found = reviews_for(&table, &user.phone, today());
        tracing::debug!(user_id, matched = found.len(), "Reviews linked");
        Ok(found)
    }

    async fn companies(&self) -> AppResult<Vec<Company>> {
        let table = self.table(Sheet::Companies, false).await?;
        Ok(companies(&table))
    }
}
