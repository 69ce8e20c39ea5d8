//! Short-lived sign-in state: one-time codes, send counters, and the
//! marker that lets a freshly verified phone finish registration.

use async_trait::async_trait;

use common::AppResult;

use super::Cache;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const PREFIX_CODE: &str = "otp:code:";
const PREFIX_COOLDOWN: &str = "otp:cooldown:";
const PREFIX_COUNTER: &str = "otp:count:";
const PREFIX_VERIFIED: &str = "otp:verified:";

/// Hourly counter window
const COUNTER_WINDOW_SECONDS: u64 = 3600;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Whether a code was sent to this phone too recently.
    async fn cooldown_active(&self, phone: &str) -> AppResult<bool>;

    async fn start_cooldown(&self, phone: &str, seconds: u64) -> AppResult<()>;

    /// Codes sent this hour under `counter` (a phone or an IP key).
    async fn sends_this_hour(&self, counter: &str) -> AppResult<u64>;

    /// Count one send; the first send opens a one-hour window.
    async fn record_send(&self, counter: &str) -> AppResult<()>;

    async fn save_code(&self, phone: &str, code: &str, ttl_seconds: u64) -> AppResult<()>;

    async fn code(&self, phone: &str) -> AppResult<Option<String>>;

    async fn discard_code(&self, phone: &str) -> AppResult<()>;

    async fn mark_verified(&self, phone: &str, ttl_seconds: u64) -> AppResult<()>;

    async fn is_verified(&self, phone: &str) -> AppResult<bool>;

    async fn clear_verified(&self, phone: &str) -> AppResult<()>;
}

/// Redis-backed store.
pub struct RedisOtpStore {
    cache: Cache,
}

impl RedisOtpStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn cooldown_active(&self, phone: &str) -> AppResult<bool> {
        self.cache.exists(&format!("{PREFIX_COOLDOWN}{phone}")).await
    }

    async fn start_cooldown(&self, phone: &str, seconds: u64) -> AppResult<()> {
        self.cache
            .set_with_ttl(&format!("{PREFIX_COOLDOWN}{phone}"), &true, seconds)
            .await
    }

    async fn sends_this_hour(&self, counter: &str) -> AppResult<u64> {
        self.cache.counter(&format!("{PREFIX_COUNTER}{counter}")).await
    }

    async fn record_send(&self, counter: &str) -> AppResult<()> {
        self.cache
            .incr_in_window(&format!("{PREFIX_COUNTER}{counter}"), COUNTER_WINDOW_SECONDS)
            .await
            .map(|_| ())
    }

    async fn save_code(&self, phone: &str, code: &str, ttl_seconds: u64) -> AppResult<()> {
        self.cache
            .set_with_ttl(&format!("{PREFIX_CODE}{phone}"), &code, ttl_seconds)
            .await
    }

    async fn code(&self, phone: &str) -> AppResult<Option<String>> {
        self.cache.get(&format!("{PREFIX_CODE}{phone}")).await
    }

    async fn discard_code(&self, phone: &str) -> AppResult<()> {
        self.cache.delete(&format!("{PREFIX_CODE}{phone}")).await
    }

    async fn mark_verified(&self, phone: &str, ttl_seconds: u64) -> AppResult<()> {
        self.cache
            .set_with_ttl(&format!("{PREFIX_VERIFIED}{phone}"), &true, ttl_seconds)
            .await
    }

    async fn is_verified(&self, phone: &str) -> AppResult<bool> {
        self.cache.exists(&format!("{PREFIX_VERIFIED}{phone}")).await
    }

    async fn clear_verified(&self, phone: &str) -> AppResult<()> {
        self.cache.delete(&format!("{PREFIX_VERIFIED}{phone}")).await
    }
}
