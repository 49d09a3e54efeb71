//! Identity module: registration, sign-in and user listing
//!
//! Contains the `AuthService` which orchestrates the identity use-cases
//! and the listing query normalization it delegates to.

pub mod queries;
pub mod service;

pub use queries::build_user_query;
pub use service::{AuthResult, AuthService, TOKEN_TYPE_BEARER};
