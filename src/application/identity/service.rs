//! Authentication service (application-layer orchestration)
//!
//! Registration, sign-in and the admin user listing live here.
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::queries::build_user_query;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, User, UserRepositoryInterface,
    ROLE_ADMIN,
};
use crate::infrastructure::crypto::jwt::{issue_token, JwtConfig};
use crate::shared::PaginatedResult;

/// Token type reported alongside every access token
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Result of a successful registration or sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub access_token: String,
    pub token_type: String,
}

/// Auth service. Orchestrates registration, sign-in and user listing.
///
/// Holds its collaborators explicitly; nothing here checks the caller's
/// role. Admin-only access to [`AuthService::list_users`] is enforced by
/// the HTTP layer.
pub struct AuthService {
    repo: Arc<dyn UserRepositoryInterface>,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    pub fn repository(&self) -> &Arc<dyn UserRepositoryInterface> {
        &self.repo
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the default role and sign them in.
    ///
    /// The password is stored exactly as given.
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        if self.repo.email_exists(email).await? {
            debug!("Registration rejected: email already taken");
            return Err(DomainError::DuplicateEmail);
        }

        let user = self
            .repo
            .create_user(CreateUserDto::registration(email, password))
            .await?;

        info!(user_id = user.id, "New user registered");
        self.issue(&user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by exact email + password and return a token.
    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repo.find_by_credentials(email, password).await? else {
            debug!("Sign-in rejected: no matching credentials");
            return Err(DomainError::InvalidCredentials);
        };

        debug!(user_id = user.id, "User signed in");
        self.issue(&user)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// List users with role filter, email search, id ordering and pagination.
    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let query = build_user_query(dto)?;
        self.repo.list_users(&query).await
    }

    // ── Bootstrap ───────────────────────────────────────────────

    /// Create an administrator if the store holds no users yet.
    ///
    /// Returns the created user, or `None` when users already exist.
    pub async fn seed_admin(&self, email: &str, password: &str) -> DomainResult<Option<User>> {
        if self.repo.count_users().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .repo
            .create_user(CreateUserDto {
                email: email.to_string(),
                password: password.to_string(),
                role: ROLE_ADMIN.to_string(),
            })
            .await?;

        Ok(Some(admin))
    }

    fn issue(&self, user: &User) -> DomainResult<AuthResult> {
        let access_token = issue_token(user, &self.jwt_config, Utc::now())
            .map_err(|e| DomainError::Token(e.to_string()))?;

        Ok(AuthResult {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }
}
