//! Shop discount and cashback settings.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DiscountConfig {
    pub loyalty_discount_percentage: f64,
    pub cashback_percentage: f64,
    pub allow_points_payment: bool,
    pub points_to_currency_rate: f64,
    pub enabled: bool,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            loyalty_discount_percentage: 10.0,
            cashback_percentage: 5.0,
            allow_points_payment: true,
            points_to_currency_rate: 1.0,
            enabled: true,
        }
    }
}

impl DiscountConfig {
    pub fn validate(&self) -> DomainResult<()> {
        check_percentage("loyalty_discount_percentage", self.loyalty_discount_percentage)?;
        check_percentage("cashback_percentage", self.cashback_percentage)?;
        if !self.points_to_currency_rate.is_finite() || self.points_to_currency_rate < 0.0 {
            return Err(DomainError::validation(
                "points_to_currency_rate must not be negative",
            ));
        }
        Ok(())
    }
}

fn check_percentage(field: &str, value: f64) -> DomainResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(DomainError::validation(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(())
}
