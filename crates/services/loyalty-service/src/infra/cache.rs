//! Redis access shared by the OTP store and the HTTP rate limiter.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use common::{AppError, AppResult, CacheConfig};

/// Cache key prefix for rate limiting
const CACHE_PREFIX_RATE_LIMIT: &str = "rate_limit:";

/// Redis connection wrapper.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        tracing::debug!("Connecting to Redis");
        let client = Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        value
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| AppError::internal(format!("Cache deserialization error: {e}")))
            })
            .transpose()
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {e}")))?;
        conn.set_ex::<_, _, ()>(key, json, ttl_seconds).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        Ok(conn.exists(key).await?)
    }

    /// Current counter value, zero when absent.
    pub async fn counter(&self, key: &str) -> AppResult<u64> {
        let mut conn = self.connection.clone();
        let value: Option<u64> = conn.get(key).await?;
        Ok(value.unwrap_or(0))
    }

    /// Increment a counter that lives for `window_seconds` from its first hit.
    pub async fn incr_in_window(&self, key: &str, window_seconds: u64) -> AppResult<u64> {
        let mut conn = self.connection.clone();
        let count: u64 = conn.incr(key, 1).await?;
        if count == 1 {
            conn.expire::<_, ()>(key, window_seconds as i64).await?;
        }
        Ok(count)
    }

    // =========================================================================
    // Rate Limiting
    // =========================================================================

    /// Count a request against `identifier`. Returns (current_count, allowed).
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{CACHE_PREFIX_RATE_LIMIT}{identifier}");
        let count = self.incr_in_window(&key, window_seconds).await?;
        Ok((count, count <= max_requests))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
