//! Points ledger entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_ADDED, ACTION_REMOVED};
use crate::points::Points;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerAction {
    #[serde(rename = "dodato")]
    Added,
    #[serde(rename = "skinuto")]
    Removed,
}

impl LedgerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerAction::Added => ACTION_ADDED,
            LedgerAction::Removed => ACTION_REMOVED,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ACTION_ADDED => Some(LedgerAction::Added),
            ACTION_REMOVED => Some(LedgerAction::Removed),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored ledger row. Rows are keyed by card number, not user id.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: i32,
    pub poslovnica: String,
    pub rfid: i32,
    pub user: String,
    pub date: NaiveDateTime,
    pub points: Points,
    pub action: LedgerAction,
    pub vrsta: String,
}

/// Ledger row to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub poslovnica: String,
    pub rfid: i32,
    pub user: String,
    pub points: Points,
    pub action: LedgerAction,
    pub vrsta: String,
}

/// Ledger row as the app lists it, with points in KM.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TransactionView {
    pub transaction_id: i32,
    pub poslovnica: String,
    pub vrsta: String,
    pub date: NaiveDateTime,
    pub points: f64,
    pub action: String,
}

impl From<Transaction> for TransactionView {
    fn from(t: Transaction) -> Self {
        Self {
            transaction_id: t.transaction_id,
            poslovnica: t.poslovnica,
            vrsta: t.vrsta,
            date: t.date,
            points: t.points.as_km(),
            action: t.action.as_str().to_string(),
        }
    }
}

/// Outcome of settling points on a shop order, in KM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderPointsOutcome {
    pub points_used: f64,
    pub cashback_earned: f64,
    pub new_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_view_converts_tenths() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let view = TransactionView::from(Transaction {
            transaction_id: 3,
            poslovnica: "Loyalty App".to_string(),
            rfid: 12345678,
            user: "Amra".to_string(),
            date,
            points: Points::from_tenths(125),
            action: LedgerAction::Added,
            vrsta: "Online Shop - Cashback 5%".to_string(),
        });
        assert_eq!(view.points, 12.5);
        assert_eq!(view.action, "dodato");
    }

    #[test]
    fn test_action_round_trips_through_str() {
        assert_eq!(LedgerAction::parse("skinuto"), Some(LedgerAction::Removed));
        assert_eq!(LedgerAction::parse("x"), None);
        assert_eq!(LedgerAction::Added.to_string(), "dodato");
    }
}
