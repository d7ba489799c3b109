//! # Health Tracker
//!
//! Medication tracking and health blog service.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool, migrations and seeding
//! - HTTP server

use anyhow::Result;
use tracing::info;

use health_tracker::config::Settings;
use health_tracker::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up LOG_FORMAT / RUST_LOG from .env before logging starts
    let _ = dotenvy::dotenv();

    health_tracker::telemetry::init_tracing();

    info!("Starting Health Tracker...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
