//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use super::dto::{RegisterRequest, SignInRequest, SignInResponse};
use crate::application::AuthService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{api_error, ApiError, MessageResponse, ValidatedJson};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth_service: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered and signed in", body = SignInResponse),
        (status = 400, description = "Email already registered, malformed body, or empty email/password", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    match state
        .auth_service
        .register(&request.email, &request.password)
        .await
    {
        Ok(result) => {
            metrics::counter!("auth_registrations_total", "outcome" => "created").increment(1);
            Ok(Json(result.into()))
        }
        Err(DomainError::DuplicateEmail) => {
            metrics::counter!("auth_registrations_total", "outcome" => "duplicate").increment(1);
            Err(api_error(StatusCode::BAD_REQUEST, DUPLICATE_EMAIL_MESSAGE))
        }
        Err(e) => {
            error!(error = %e, "Error occurred during registration");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during registration",
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Successful login", body = SignInResponse),
        (status = 400, description = "Malformed body or empty email/password", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    match state
        .auth_service
        .sign_in(&request.email, &request.password)
        .await
    {
        Ok(result) => {
            metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
            Ok(Json(result.into()))
        }
        Err(DomainError::InvalidCredentials) => {
            metrics::counter!("auth_logins_total", "outcome" => "rejected").increment(1);
            Err(api_error(
                StatusCode::UNAUTHORIZED,
                INVALID_CREDENTIALS_MESSAGE,
            ))
        }
        Err(e) => {
            error!(error = %e, "Error occurred during login");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during login",
            ))
        }
    }
}
