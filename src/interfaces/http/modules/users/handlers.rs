//! User listing API handler
//!
//! Admin-only; the router wraps it in `auth_middleware` + `admin_middleware`.
//! Delegates to `AuthService` from the application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use super::dto::{ListUsersParams, UserModel};
use crate::application::AuthService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{api_error, ApiError, MessageResponse};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub auth_service: Arc<AuthService>,
}

#[utoipa::path(
    get,
    path = "/auth/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Page of users; totals in X-Total-Count / X-Total-Pages", body = Vec<UserModel>,
            headers(
                ("X-Total-Count" = u64, description = "Matching users across all pages"),
                ("X-Total-Pages" = u64, description = "Number of pages at this page size")
            )
        ),
        (status = 400, description = "Invalid paging parameters", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 403, description = "Caller is not an admin", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Response, ApiError> {
    info!("Fetching users for admin");

    match state.auth_service.list_users(params.into()).await {
        Ok(result) => {
            if result.items.is_empty() {
                warn!("No users found");
            } else {
                info!("Successfully retrieved {} users", result.items.len());
            }

            let headers = [
                (TOTAL_COUNT_HEADER, result.total.to_string()),
                (TOTAL_PAGES_HEADER, result.total_pages.to_string()),
            ];
            let page = result.map(UserModel::from);

            Ok((headers, Json(page.items)).into_response())
        }
        Err(DomainError::Validation(message)) => Err(api_error(StatusCode::BAD_REQUEST, message)),
        Err(e) => {
            error!(error = %e, "Error occurred while fetching users");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while retrieving users",
            ))
        }
    }
}
