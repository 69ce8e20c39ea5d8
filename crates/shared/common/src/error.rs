//! Errors returned by services and rendered by the HTTP layer.
//!
//! The JSON body is always `{"error": {"code", "message"}}`. Messages of
//! client errors are shown in the app as-is; infrastructure failures are
//! logged and replaced by a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Došlo je do greške. Pokušajte ponovo.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Potrebna je prijava.")]
    Unauthorized,

    #[error("Nemate pristup ovoj akciji.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Input broke a business or field rule
    #[error("{0}")]
    Validation(String),

    /// Body could not be parsed
    #[error("Neispravan zahtjev: {0}")]
    BadRequest(String),

    #[error("Nemate dovoljno na računu. Imate {available:.2} KM, a pokušavate iskoristiti {requested:.2} KM.")]
    InsufficientPoints { available: f64, requested: f64 },

    #[error("{0}")]
    TooManyRequests(String),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[cfg(feature = "cache")]
    #[error("Redis error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A collaborator (SMS gateway, sheet source) is down or not configured
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            AppError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "UNAUTHORIZED",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Configuration(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientPoints { .. } => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the member. Server-side failures are logged here.
    pub fn user_message(&self) -> String {
        if self.status().is_server_error() {
            match self {
                AppError::ServiceUnavailable(msg) => {
                    tracing::warn!(reason = %msg, "Dependency unavailable");
                    return msg.clone();
                }
                other => {
                    tracing::error!(code = other.code(), "{other}");
                    return GENERIC_FAILURE.to_string();
                }
            }
        }

        #[cfg(feature = "jwt")]
        if let AppError::Jwt(e) = self {
            tracing::debug!("Rejected token: {e}");
            return AppError::Unauthorized.to_string();
        }

        self.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::InsufficientPoints {
                available,
                requested,
            } => AppError::InsufficientPoints {
                available,
                requested,
            },
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Turns a missing row into a 404.
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found("Traženi podatak nije pronađen."))
    }
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        AppError::TooManyRequests(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = AppError::from(DomainError::not_found("Rezervacija nije pronađena"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Rezervacija nije pronađena");

        let err = AppError::from(DomainError::validation("Ovaj termin je već zauzet"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Ovaj termin je već zauzet");
    }

    #[test]
    fn test_insufficient_points() {
        let err = AppError::from(DomainError::InsufficientPoints {
            available: 12.5,
            requested: 20.0,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INSUFFICIENT_POINTS");
        assert_eq!(
            err.user_message(),
            "Nemate dovoljno na računu. Imate 12.50 KM, a pokušavate iskoristiti 20.00 KM."
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::internal("connection pool exhausted");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(AppError::configuration("JWT_SECRET").user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_unavailable_keeps_reason() {
        let err = AppError::service_unavailable("SMS servis trenutno nije dostupan.");
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.user_message(), "SMS servis trenutno nije dostupan.");
    }

    #[test]
    fn test_conflict_and_rate_limit() {
        let err = AppError::conflict("Email je već u upotrebi.");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
        assert_eq!(err.user_message(), "Email je već u upotrebi.");

        let err = AppError::too_many_requests("Previše zahtjeva.");
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::bad_request("EOF").user_message(), "Neispravan zahtjev: EOF");
    }
}
