//! Middleware for authentication and rate limiting.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, require_admin, CurrentUser};
pub use rate_limit::{client_ip, rate_limit_auth_middleware, rate_limit_middleware};
