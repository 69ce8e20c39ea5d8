//! Loyalty service configuration.

use std::path::PathBuf;

use common::{
    env_opt, env_or, AppResult, CacheConfig, DatabaseConfig, JwtConfig, RateLimitConfig,
    ServiceConfig,
};
use domain::featured::{parse_moment, FeaturedTiming};
use domain::{DiscountConfig, FeaturedActionConfig};

/// One-time code limits.
#[derive(Debug, Clone, Copy)]
pub struct OtpConfig {
    /// Code lifetime
    pub ttl_seconds: u64,
    /// Minimum gap between two codes for the same phone
    pub resend_cooldown_seconds: u64,
    pub max_per_phone_per_hour: u64,
    pub max_per_ip_per_hour: u64,
    /// How long a verified phone may finish registration
    pub registration_window_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            resend_cooldown_seconds: 30,
            max_per_phone_per_hour: 20,
            max_per_ip_per_hour: 15,
            registration_window_seconds: 900,
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            ttl_seconds: env_or("OTP_TTL_SECONDS", d.ttl_seconds),
            resend_cooldown_seconds: env_or("OTP_RESEND_COOLDOWN_SECONDS", d.resend_cooldown_seconds),
            max_per_phone_per_hour: env_or("OTP_MAX_PER_PHONE_PER_HOUR", d.max_per_phone_per_hour),
            max_per_ip_per_hour: env_or("OTP_MAX_PER_IP_PER_HOUR", d.max_per_ip_per_hour),
            registration_window_seconds: env_or(
                "REGISTRATION_WINDOW_SECONDS",
                d.registration_window_seconds,
            ),
        }
    }
}

/// Locations of exported spreadsheets. `None` means the sheet is not set up.
#[derive(Debug, Clone, Default)]
pub struct SheetsConfig {
    pub glasses: Option<PathBuf>,
    pub reviews: Option<PathBuf>,
    pub companies: Option<PathBuf>,
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        Self {
            glasses: env_opt("GLASSES_SHEET_PATH").map(PathBuf::from),
            reviews: env_opt("REVIEW_SHEET_PATH").map(PathBuf::from),
            companies: env_opt("COMPANIES_SHEET_PATH").map(PathBuf::from),
        }
    }
}

/// Everything the loyalty backend needs at startup.
#[derive(Debug, Clone)]
pub struct LoyaltyConfig {
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub auth_rate_limit: RateLimitConfig,
    pub otp: OtpConfig,
    pub sms_sender: String,
    pub sheets: SheetsConfig,
    /// Used until an admin saves discount settings
    pub discount_defaults: DiscountConfig,
    /// Used until an admin saves the featured action
    pub featured_defaults: FeaturedActionConfig,
}

impl LoyaltyConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails only when the JWT secret is missing or too short.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            server: ServiceConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            rate_limit: RateLimitConfig::general_from_env(),
            auth_rate_limit: RateLimitConfig::auth_from_env(),
            otp: OtpConfig::from_env(),
            sms_sender: env_or("SMS_SENDER", "OPTIKA.BA".to_string()),
            sheets: SheetsConfig::from_env(),
            discount_defaults: discount_from_env(),
            featured_defaults: featured_from_env(),
        })
    }
}

fn discount_from_env() -> DiscountConfig {
    let d = DiscountConfig::default();
    DiscountConfig {
        loyalty_discount_percentage: env_or(
            "LOYALTY_DISCOUNT_PERCENTAGE",
            d.loyalty_discount_percentage,
        ),
        cashback_percentage: env_or("CASHBACK_PERCENTAGE", d.cashback_percentage),
        allow_points_payment: env_or("ALLOW_POINTS_PAYMENT", d.allow_points_payment),
        points_to_currency_rate: env_or("POINTS_TO_CURRENCY_RATE", d.points_to_currency_rate),
        enabled: env_or("DISCOUNT_ENABLED", d.enabled),
    }
}

fn featured_from_env() -> FeaturedActionConfig {
    let mut f = FeaturedActionConfig::default();
    f.enabled = env_or("FEATURED_ACTION_ENABLED", f.enabled);

    let text = |key: &str, slot: &mut String| {
        if let Some(v) = env_opt(key) {
            *slot = v;
        }
    };
    text("FEATURED_ACTION_TITLE", &mut f.content.title);
    text("FEATURED_ACTION_SUBTITLE", &mut f.content.subtitle);
    text("FEATURED_ACTION_BADGE", &mut f.content.badge_text);
    text("FEATURED_ACTION_BRAND", &mut f.action.brand_name);
    text("FEATURED_ACTION_DESCRIPTION", &mut f.action.description);
    text("FEATURED_ACTION_META", &mut f.action.meta_text);
    text("FEATURED_ACTION_LOGO", &mut f.action.logo_path);
    text("FEATURED_ACTION_GRADIENT_START", &mut f.design.gradient_start);
    text("FEATURED_ACTION_GRADIENT_END", &mut f.design.gradient_end);
    text("FEATURED_ACTION_BADGE_GRADIENT_START", &mut f.design.badge_gradient_start);
    text("FEATURED_ACTION_BADGE_GRADIENT_END", &mut f.design.badge_gradient_end);

    f.timing = FeaturedTiming {
        start_date: env_opt("FEATURED_ACTION_START_DATE").and_then(|v| parse_moment(&v)),
        end_date: env_opt("FEATURED_ACTION_END_DATE").and_then(|v| parse_moment(&v)),
    };
    f
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate that touches these variables
    #[test]
    fn test_settings_defaults_read_from_env() {
        std::env::set_var("CASHBACK_PERCENTAGE", "7.5");
        std::env::set_var("ALLOW_POINTS_PAYMENT", "false");
        std::env::set_var("FEATURED_ACTION_TITLE", "Jesenja akcija");
        std::env::set_var("FEATURED_ACTION_START_DATE", "2025-09-01");
        std::env::set_var("FEATURED_ACTION_END_DATE", "not a date");

        let discount = discount_from_env();
        let featured = featured_from_env();

        assert_eq!(discount.cashback_percentage, 7.5);
        assert!(!discount.allow_points_payment);
        assert_eq!(
            discount.loyalty_discount_percentage,
            DiscountConfig::default().loyalty_discount_percentage
        );
        assert_eq!(featured.content.title, "Jesenja akcija");
        assert_eq!(featured.timing.start_date, parse_moment("2025-09-01"));
        assert_eq!(featured.timing.end_date, None);
    }
}
