//! Domain-level constants.
//!
//! Loyalty program rules and the literal strings other systems expect to see
//! in the ledger.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "user";

/// Administrator role with access to configuration endpoints
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours (30 days, mobile app sessions)
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 720;

/// Minimum JWT secret length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Length of one-time login codes
pub const OTP_LENGTH: usize = 6;

// =============================================================================
// Points
// =============================================================================

/// Stored balances are tenths of a KM
pub const POINTS_SCALE: i64 = 10;

/// Loyalty card numbers are 8-digit integers
pub const RFID_MIN: i32 = 10_000_000;
pub const RFID_MAX: i32 = 99_999_999;

/// Ledger action for credits
pub const ACTION_ADDED: &str = "dodato";

/// Ledger action for debits
pub const ACTION_REMOVED: &str = "skinuto";

/// Default transaction kind for in-store purchases
pub const VRSTA_REGULAR_PURCHASE: &str = "Redovna kupovina";

/// Transaction kind for points spent in the online shop
pub const VRSTA_SHOP_PAYMENT: &str = "Online Shop - Plaćanje";

/// Transaction kind for points returned when a shop order is not placed
pub const VRSTA_ORDER_REVERSAL: &str = "Online Shop - Storno";

/// Transaction kind for the app welcome bonus
pub const VRSTA_WELCOME_BONUS: &str = "Bonus - Dobrodošlica";

/// Branch recorded for shop orders placed in the app
pub const BRANCH_LOYALTY_APP: &str = "Loyalty App";

/// Branch recorded for the welcome bonus
pub const BRANCH_ONLINE: &str = "Online";

/// Transaction kind for shop cashback at the given percentage
pub fn vrsta_cashback(percentage: f64) -> String {
    format!("Online Shop - Cashback {}%", format_percentage(percentage))
}

fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// =============================================================================
// Reservations
// =============================================================================

/// First bookable slot of the day (hour)
pub const SLOT_FIRST_HOUR: u32 = 10;

/// Last bookable slot of the day (hour, inclusive)
pub const SLOT_LAST_HOUR: u32 = 21;

/// Minutes between regular slots
pub const SLOT_STEP_MINUTES: i64 = 30;

// =============================================================================
// Validation
// =============================================================================

/// Maximum length of names and emails
pub const MAX_NAME_LENGTH: u64 = 255;

/// Maximum length of a phone number as typed
pub const MAX_PHONE_LENGTH: u64 = 20;

/// Maximum length of a single diopter value
pub const MAX_DIOPTER_LENGTH: u64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cashback_label() {
        assert_eq!(vrsta_cashback(5.0), "Online Shop - Cashback 5%");
        assert_eq!(vrsta_cashback(2.5), "Online Shop - Cashback 2.5%");
    }
}
