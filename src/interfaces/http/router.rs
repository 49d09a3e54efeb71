//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::MessageResponse;
use super::middleware::{admin_middleware, auth_middleware, AuthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::{request_id_middleware, REQUEST_ID_HEADER};
use super::modules::users::{TOTAL_COUNT_HEADER, TOTAL_PAGES_HEADER};
use super::modules::{auth, health, users};
use crate::application::AuthService;
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::list_users,
    ),
    components(
        schemas(
            MessageResponse,
            auth::RegisterRequest,
            auth::SignInRequest,
            auth::SignInResponse,
            users::UserModel,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and user store readiness"),
        (name = "Authentication", description = "Registration and sign-in, both returning a JWT"),
        (name = "Users", description = "Admin-only user listing with filtering and paging"),
    ),
    info(
        title = "Books Auth API",
        version = "1.0.0",
        description = "User registration, JWT sign-in and admin user listing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    auth_service: Arc<AuthService>,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState { jwt_config };

    let health_state = health::HealthState {
        repo: Arc::clone(auth_service.repository()),
        started_at: Arc::new(Instant::now()),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(auth::AuthHandlerState {
            auth_service: Arc::clone(&auth_service),
        });

    // User listing (admin). auth_middleware is added last so it runs first.
    let user_routes = Router::new()
        .route("/auth/users", get(users::list_users))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(users::UserHandlerState { auth_service });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderName::from_static(TOTAL_PAGES_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
