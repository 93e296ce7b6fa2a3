//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the EventHive application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventhive.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log event lifecycle actions with structured data
pub fn log_event_action(event_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log participation request decisions
pub fn log_request_decision(request_id: i64, event_id: i64, status: &str) {
    info!(
        request_id = request_id,
        event_id = event_id,
        status = status,
        "Participation request resolved"
    );
}

/// Log admin actions
pub fn log_admin_action(event_id: i64, action: &str, details: Option<&str>) {
    warn!(
        event_id = event_id,
        action = action,
        details = details,
        "Admin action performed"
    );
}
