//! # Social API
//!
//! Application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - HTTP server

use anyhow::Result;
use tracing::info;

use social_api::config::Settings;
use social_api::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before the subscriber reads RUST_LOG / LOG_FORMAT
    let _ = dotenvy::dotenv();
    social_api::telemetry::init_tracing();

    info!("Starting Social API...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
