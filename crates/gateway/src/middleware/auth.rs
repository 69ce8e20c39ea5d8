//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::{UserRole, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// Member extracted from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Check if user has admin privileges.
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Validates the bearer token and stores the [`CurrentUser`] in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;

    let claims = state.services.tokens().verify(token).map_err(|e| {
        tracing::debug!("Rejected access token: {e}");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: UserRole::from(claims.role.as_str()),
    });

    Ok(next.run(request).await)
}

fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}
