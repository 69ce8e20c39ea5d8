//! Eye-exam history from the appointment protocol sheet.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{SheetRecord, SheetTable};
use crate::phone;

const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Completed,
    Scheduled,
    Cancelled,
    Unknown,
}

impl ReviewStatus {
    /// Classify the free-text "stanje" cell.
    pub fn from_stanje(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        if s.contains("pregledan") {
            ReviewStatus::Completed
        } else if s.contains("zakazan") || s.contains("čekanje") {
            ReviewStatus::Scheduled
        } else if s.contains("otkazan") {
            ReviewStatus::Cancelled
        } else {
            ReviewStatus::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub protocol_date: String,
    pub protocol_time: String,
    pub branch: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub review_date: String,
    pub review_time: String,
    pub employee: String,
    pub status: ReviewStatus,
    pub month: String,
    pub is_completed: bool,
    pub is_upcoming: bool,
}

/// Review rows whose phone matches the member. Names are not consulted.
///
/// The table must have been built with lower-cased headers.
pub fn reviews_for(table: &SheetTable, user_phone: &str, today: NaiveDate) -> Vec<Review> {
    table
        .records()
        .filter(|(_, r)| phone::matches(user_phone, r.get("telefon")))
        .map(|(_, r)| format_review(&r, today))
        .collect()
}

fn format_review(r: &SheetRecord<'_>, today: NaiveDate) -> Review {
    let status = ReviewStatus::from_stanje(r.get("stanje"));
    let review_date = format_review_date(r.get("datum pregleda"));
    let is_upcoming = NaiveDate::parse_from_str(&review_date, ISO_DATE)
        .map(|d| d > today)
        .unwrap_or(false);

    Review {
        id: format!("review_{}", Uuid::new_v4().simple()),
        protocol_date: format_review_date(r.get("datum protokola")),
        protocol_time: r.get("vrijeme protokola").to_string(),
        branch: r.get("poslovnica").to_string(),
        name: r.get("ime").to_string(),
        email: r.get("email").to_string(),
        phone: r.get("telefon").to_string(),
        review_date,
        review_time: r.get("vrijeme pregleda").to_string(),
        employee: r.get("uposlenik").to_string(),
        is_completed: status == ReviewStatus::Completed,
        status,
        month: r.get("mjesec").to_string(),
        is_upcoming,
    }
}

/// Dates with dashes are taken as ISO already; MM/DD/YYYY is converted.
pub fn format_review_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('-') {
        return raw.to_string();
    }
    if raw.contains('/') {
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
            return d.format(ISO_DATE).to_string();
        }
    }
    raw.to_string()
}
