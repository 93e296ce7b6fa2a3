//! EventHive service host
//!
//! Main application entry point: loads configuration, initializes logging,
//! prepares the database, and wires the registration services. The HTTP
//! controller layer attaches to the `ServiceFactory` from outside this
//! crate.

#![allow(non_snake_case)]

use tracing::info;

use EventHive::{
    config::Settings,
    database::{connection, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting {}...", EventHive::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = connection::create_pool(&settings.database).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let database_service = DatabaseService::new(pool.clone());
    let services = ServiceFactory::new(&settings, database_service)?;

    if services.stats_service.is_enabled() {
        info!("Stats collector client enabled");
    } else {
        info!("Stats collector client disabled, view counts will read as zero");
    }

    info!("Registration services ready");

    // Keep the host alive until shutdown is requested
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, closing database pool");
    pool.close().await;

    Ok(())
}
