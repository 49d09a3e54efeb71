//! HTTP REST API
//!
//! - `common`: shared response bodies and the validating JSON extractor
//! - `middleware`: JWT bearer authentication and the admin gate
//! - `modules`: one module per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
