//! Access token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::{AppResult, JwtConfig};
use domain::{LoyaltyUser, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Member id
    pub sub: i64,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &LoyaltyUser) -> AppResult<TokenResponse>;

    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// HS256 tokens signed with the configured secret.
pub struct JwtTokens {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokens {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            expiration_hours: config.expiration_hours,
        }
    }
}

impl TokenService for JwtTokens {
    fn issue(&self, user: &LoyaltyUser) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::{DiopterData, Points, UserRole};

    fn tokens(secret: &str) -> JwtTokens {
        JwtTokens::new(&JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 720,
        })
    }

    fn member() -> LoyaltyUser {
        LoyaltyUser {
            id: 42,
            username: "Lejla Kovač".into(),
            email: "lejla@example.ba".into(),
            phone: "061201891".into(),
            rfid: 12345678,
            points: Points::ZERO,
            has_diopter: false,
            diopter: DiopterData::default(),
            is_app: false,
            role: UserRole::User,
            notification_settings: None,
            push_token: None,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let jwt = tokens("a-very-long-secret-for-testing-purposes-only");
        let issued = jwt.issue(&member()).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 720 * 3600);

        let claims = jwt.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let issued = tokens("a-very-long-secret-for-testing-purposes-only")
            .issue(&member())
            .unwrap();
        let err = tokens("another-secret-that-is-also-long-enough-123")
            .verify(&issued.access_token)
            .unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }
}
