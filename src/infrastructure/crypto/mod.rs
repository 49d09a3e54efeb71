//! Token signing and verification

pub mod jwt;

pub use jwt::{issue_token, verify_token, JwtConfig, TokenClaims, TokenError};
