//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{EventHiveError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_stats_config(&settings.stats)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHiveError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(EventHiveError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventHiveError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate stats collector configuration
fn validate_stats_config(config: &super::StatsConfig) -> Result<()> {
    if let Some(base_url) = &config.base_url {
        if !base_url.is_empty() {
            Url::parse(base_url).map_err(|e| {
                EventHiveError::Config(format!("Invalid stats base URL: {}", e))
            })?;
        }
    }

    if config.app_name.is_empty() {
        return Err(EventHiveError::Config(
            "Stats application name is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(EventHiveError::Config(
            "Stats timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventHiveError::Config("Log level is required".to_string()));
    }

    Ok(())
}
