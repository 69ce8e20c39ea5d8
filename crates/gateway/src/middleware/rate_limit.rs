//! Rate limiting middleware.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use common::RateLimitConfig;

use crate::state::AppState;

const HEADER_LIMIT: &str = "X-RateLimit-Limit";
const HEADER_REMAINING: &str = "X-RateLimit-Remaining";

/// General limit for the app endpoints.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.rate_limit;
    enforce(state, connect_info, request, next, limit).await
}

/// Stricter limit for the sign-in endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.auth_rate_limit;
    enforce(state, connect_info, request, next, limit).await
}

async fn enforce(
    state: AppState,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
    limit: RateLimitConfig,
) -> Response {
    let ip = client_ip(request.headers(), connect_info.map(|ci| ci.0));
    let key = format!("{}:{}", request.uri().path(), ip);

    // Fail closed: a limiter error denies the request
    let count = match state
        .limiter
        .hit(&key, limit.max_requests, limit.window_seconds)
        .await
    {
        Ok((count, true)) => count,
        Ok((_, false)) => {
            tracing::warn!(key = %key, "Rate limit exceeded");
            return exceeded(limit);
        }
        Err(e) => {
            tracing::error!(key = %key, "Rate limiter unavailable: {e}");
            return exceeded(limit);
        }
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(HEADER_LIMIT, HeaderValue::from(limit.max_requests));
    headers.insert(
        HEADER_REMAINING,
        HeaderValue::from(limit.max_requests.saturating_sub(count)),
    );
    response
}

/// Client address: first X-Forwarded-For hop, then X-Real-IP, then the socket.
pub fn client_ip(headers: &HeaderMap, socket: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("X-Forwarded-For").and_then(|v| v.split(',').next()) {
        return ip.trim().to_string();
    }
    if let Some(ip) = header("X-Real-IP") {
        return ip.to_string();
    }
    socket
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn exceeded(limit: RateLimitConfig) -> Response {
    let body = json!({
        "error": {
            "code": "TOO_MANY_REQUESTS",
            "message": "Previše zahtjeva. Pokušajte ponovo kasnije.",
        }
    });
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert("Retry-After", HeaderValue::from(limit.window_seconds));
    headers.insert(HEADER_REMAINING, HeaderValue::from_static("0"));
    headers.insert(HEADER_LIMIT, HeaderValue::from(limit.max_requests));
    response
}
