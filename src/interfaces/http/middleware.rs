//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::api_error;
use crate::domain::ROLE_ADMIN;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims, TokenError};

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

impl AuthError {
    fn status(self) -> StatusCode {
        match self {
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Missing authentication token",
            Self::InvalidToken => "Invalid authentication token",
            Self::ExpiredToken => "Token has expired",
            Self::InsufficientPermissions => "Insufficient permissions",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        api_error(self.status(), self.message()).into_response()
    }
}

/// State for the authentication middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT bearer authentication middleware
///
/// Inserts [`AuthenticatedUser`] into request extensions on success.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = extract_token(&auth_header) else {
        return AuthError::InvalidToken.into_response();
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(TokenError::Jwt(e))
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) =>
        {
            AuthError::ExpiredToken.into_response()
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            AuthError::InvalidToken.into_response()
        }
    }
}

/// Admin-only middleware - must be used after auth_middleware
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => AuthError::InsufficientPermissions.into_response(),
        None => AuthError::MissingToken.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{middleware, routing::get, Extension, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::User;
    use crate::infrastructure::crypto::jwt::issue_token;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret-0123456789".to_string(),
            expiration_hours: 1,
            issuer: "books-auth".to_string(),
            audience: "books-auth-clients".to_string(),
        }
    }

    fn token_for(role: &str, issued_hours_ago: i64) -> String {
        let user = User {
            id: 7,
            email: "caller@x.com".to_string(),
            password: String::new(),
            role: role.to_string(),
        };
        let issued = Utc::now() - Duration::hours(issued_hours_ago);
        issue_token(&user, &jwt_config(), issued).unwrap()
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.email
    }

    fn app() -> Router {
        Router::new()
            .route("/admin", get(whoami))
            .layer(middleware::from_fn(admin_middleware))
            .layer(middleware::from_fn_with_state(
                AuthState {
                    jwt_config: jwt_config(),
                },
                auth_middleware,
            ))
    }

    async fn status_with(auth: Option<String>) -> StatusCode {
        let mut builder = Request::builder().uri("/admin");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
    }

    #[tokio::test]
    async fn admin_token_passes() {
        let status = status_with(Some(format!("Bearer {}", token_for("admin", 0)))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn regular_user_is_forbidden() {
        let status = status_with(Some(format!("Bearer {}", token_for("user", 0)))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_or_bad_tokens_are_unauthorized() {
        assert_eq!(status_with(None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_with(Some("Bearer not-a-jwt".into())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_with(Some(format!("Bearer {}", token_for("admin", 3)))).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
