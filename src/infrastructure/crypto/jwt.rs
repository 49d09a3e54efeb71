//! JWT Token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::User;

/// Default token lifetime
pub const DEFAULT_EXPIRATION_HOURS: i64 = 1;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
    /// Audience claim
    pub audience: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT signing secret is not configured")]
    MissingSecret,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// User role
    pub role: String,
    /// Unique token id, so tokens minted in the same second still differ
    pub jti: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user: &User, config: &JwtConfig, now: DateTime<Utc>) -> Self {
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Sign an HS256 token for `user`, issued at `now`.
pub fn issue_token(
    user: &User,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    if config.secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let token_claims = TokenClaims::new(user, config, now);

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &token_claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Verify signature, expiry, issuer and audience, then decode the claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    if config.secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-with-enough-bytes-000".to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: "books-auth".to_string(),
            audience: "books-auth-clients".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: 42,
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn issued_token_carries_identity_claims() {
        let config = config();
        let now = Utc::now();
        let token = issue_token(&user(), &config, now).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, "books-auth");
        assert_eq!(claims.aud, "books-auth-clients");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 3600);
    }

    #[test]
    fn token_is_signed_with_hs256() {
        let token = issue_token(&user(), &config(), Utc::now()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn tokens_issued_at_same_instant_differ() {
        let config = config();
        let now = Utc::now();
        let a = issue_token(&user(), &config, now).unwrap();
        let b = issue_token(&user(), &config, now).unwrap();
        assert_ne!(a, b);

        let a = verify_token(&a, &config).unwrap();
        let b = verify_token(&b, &config).unwrap();
        assert_ne!(a.jti, b.jti);
        assert_eq!(a.exp, b.exp);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let config = JwtConfig {
            secret: String::new(),
            ..config()
        };
        let result = issue_token(&user(), &config, Utc::now());
        assert!(matches!(result, Err(TokenError::MissingSecret)));
    }

    #[test]
    fn expired_token_fails_verification() {
        let config = config();
        let issued = Utc::now() - Duration::hours(3);
        let token = issue_token(&user(), &config, issued).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_audience_or_secret_fails_verification() {
        let config = config();
        let token = issue_token(&user(), &config, Utc::now()).unwrap();

        let other_audience = JwtConfig {
            audience: "someone-else".to_string(),
            ..config.clone()
        };
        assert!(verify_token(&token, &other_audience).is_err());

        let other_secret = JwtConfig {
            secret: "a-completely-different-secret-123".to_string(),
            ..config
        };
        assert!(verify_token(&token, &other_secret).is_err());
    }

    #[test]
    fn invalid_token() {
        let result = verify_token("invalid-token", &config());
        assert!(result.is_err());
    }
}
