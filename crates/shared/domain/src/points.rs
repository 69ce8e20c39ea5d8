//! Loyalty balance arithmetic.
//!
//! Balances and ledger amounts are stored as integer tenths of a KM so the
//! database never sees floating point. Clients deal in KM.

use serde::{Deserialize, Serialize};

use crate::constants::POINTS_SCALE;
use crate::error::{DomainError, DomainResult};

/// An amount of loyalty points in stored units (tenths of a KM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(i64);

impl Points {
    pub const ZERO: Points = Points(0);

    pub fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Convert a KM amount, rounding to the nearest tenth.
    pub fn from_km(km: f64) -> DomainResult<Self> {
        if !km.is_finite() || km < 0.0 {
            return Err(DomainError::validation("Iznos mora biti pozitivan broj."));
        }
        Ok(Self((km * POINTS_SCALE as f64).round() as i64))
    }

    pub fn tenths(self) -> i64 {
        self.0
    }

    /// Value in KM, with the tenth preserved.
    pub fn as_km(self) -> f64 {
        self.0 as f64 / POINTS_SCALE as f64
    }

    /// Whole KM, truncated, as shown on the profile screen.
    pub fn whole_km(self) -> i64 {
        self.0 / POINTS_SCALE
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::ops::Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

/// Cashback earned on an order total at the given percentage.
pub fn cashback(order_total_km: f64, percentage: f64) -> Points {
    if !order_total_km.is_finite() || order_total_km <= 0.0 || percentage <= 0.0 {
        return Points::ZERO;
    }
    Points::from_km(order_total_km * percentage / 100.0).unwrap_or(Points::ZERO)
}
