//! Domain-level errors.
//!
//! These errors represent loyalty rule violations. They know nothing about
//! HTTP, the database, or redis.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Entity not found
    #[error("{0}")]
    NotFound(String),

    /// Entity already exists or a slot is taken
    #[error("{0}")]
    Conflict(String),

    /// Redemption larger than the balance (both values in KM)
    #[error("Nemate dovoljno na računu. Imate {available:.2} KM, a pokušavate iskoristiti {requested:.2} KM.")]
    InsufficientPoints { available: f64, requested: f64 },

    /// Unauthorized access attempt
    #[error("Unauthorized")]
    Unauthorized,

    /// Forbidden action
    #[error("Forbidden")]
    Forbidden,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
