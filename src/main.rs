//! Keyhub - Main Application Entry Point
//!
//! This is a REST API server for tracking physical keys. It provides
//! authenticated endpoints for the key catalog, the checkout/check-in
//! reservation flow, QR scan confirmation, profiles with avatars, and the
//! movement history report.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: opaque bearer sessions, stored as SHA-256 digests
//! - **Format**: JSON requests/responses (CSV for the report export)
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Start the expired-session sweeper
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

use keyhub::{AppState, config, db, handlers, services::session_service};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Session maintenance is owned here, not registered as a side effect
    // somewhere in the session module
    let _sweeper = session_service::spawn_expiry_sweeper(
        pool.clone(),
        Duration::from_secs(config.session_sweep_interval_secs),
    );
    tracing::info!("Session expiry sweeper started");

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let app = handlers::create_router(AppState { pool, config });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
