//! # Books auth service
//!
//! User registration, JWT sign-in and an admin-only user listing.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: users, queries, the repository port and domain errors
//! - **application**: the auth service orchestrating registration, sign-in and listing
//! - **infrastructure**: SeaORM/SQLite and in-memory user stores, JWT signing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle shared by the CLI and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository};

pub use interfaces::http::create_api_router;
