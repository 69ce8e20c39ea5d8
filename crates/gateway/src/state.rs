//! Application state for dependency injection.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppResult, RateLimitConfig};
use loyalty_service_lib::infra::{Cache, Database};
use loyalty_service_lib::service::ServiceContainer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Counts requests per key in a fixed window.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request. Returns (current_count, allowed).
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64)
        -> AppResult<(u64, bool)>;
}

#[async_trait]
impl RateLimiter for Cache {
    async fn hit(
        &self,
        key: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        self.check_rate_limit(key, max_requests, window_seconds).await
    }
}

/// Reachability of each backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub database: Result<(), String>,
    pub redis: Result<(), String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> ProbeResult;
}

/// Pings Postgres and Redis concurrently.
pub struct InfraProbe {
    db: Database,
    cache: Cache,
}

impl InfraProbe {
    pub fn new(db: Database, cache: Cache) -> Self {
        Self { db, cache }
    }
}

#[async_trait]
impl HealthProbe for InfraProbe {
    async fn probe(&self) -> ProbeResult {
        let (database, redis) = futures::join!(self.db.ping(), self.cache.ping());
        ProbeResult {
            database: database.map_err(|e| e.to_string()),
            redis: redis.map_err(|e| e.to_string()),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub limiter: Arc<dyn RateLimiter>,
    pub health: Arc<dyn HealthProbe>,
    pub rate_limit: RateLimitConfig,
    pub auth_rate_limit: RateLimitConfig,
}

impl AppState {
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        limiter: Arc<dyn RateLimiter>,
        health: Arc<dyn HealthProbe>,
        rate_limit: RateLimitConfig,
        auth_rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            services,
            limiter,
            health,
            rate_limit,
            auth_rate_limit,
        }
    }
}
