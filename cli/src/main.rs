//! Books auth service CLI
//!
//! Runs the registration / sign-in / user listing API as a standalone
//! process, systemd unit or container entrypoint.
//!
//! ```sh
//! # Run with default config (~/.config/books-auth/config.toml)
//! JWT_SECRET=change-me books-auth
//!
//! # Custom config path
//! books-auth --config /etc/books-auth/config.toml
//!
//! # Override the port
//! books-auth --api-port 8080
//!
//! # Validate config without starting
//! books-auth --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use books_auth::config::AppConfig;
use books_auth::server::{init_tracing, ServerHandle, ServerOptions};

/// Books auth service: register, sign in, list users.
#[derive(Parser, Debug)]
#[command(
    name = "books-auth",
    version,
    about = "User registration, JWT sign-in and admin user listing",
    long_about = "Books auth service: REST API issuing JWT bearer tokens \
                  and exposing an admin-only, paginated user listing.\n\n\
                  Default config: ~/.config/books-auth/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKS_AUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip seeding the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(books_auth::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Token TTL   : {}h", config.security.jwt_expiration_hours);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}
