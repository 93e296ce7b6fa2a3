//! Error handling for EventHive
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the EventHive application
#[derive(Error, Debug)]
pub enum EventHiveError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User with id={user_id} not found")]
    UserNotFound { user_id: i64 },

    #[error("Category with id={category_id} not found")]
    CategoryNotFound { category_id: i64 },

    #[error("Event with id={event_id} not found")]
    EventNotFound { event_id: i64 },

    #[error("Request with id={request_id} not found")]
    RequestNotFound { request_id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for EventHive operations
pub type Result<T> = std::result::Result<T, EventHiveError>;

/// Domain outcome of an error, independent of any transport layer.
///
/// The excluded HTTP boundary maps these to status codes; the core only
/// classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Internal,
}

impl EventHiveError {
    /// Classify the error into its domain outcome
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventHiveError::UserNotFound { .. }
            | EventHiveError::CategoryNotFound { .. }
            | EventHiveError::EventNotFound { .. }
            | EventHiveError::RequestNotFound { .. } => ErrorKind::NotFound,
            EventHiveError::Conflict(_) => ErrorKind::Conflict,
            EventHiveError::BadRequest(_) => ErrorKind::BadRequest,
            EventHiveError::Database(_)
            | EventHiveError::Migration(_)
            | EventHiveError::Config(_)
            | EventHiveError::Http(_)
            | EventHiveError::Serialization(_)
            | EventHiveError::Io(_)
            | EventHiveError::UrlParse(_) => ErrorKind::Internal,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventHiveError::Database(_) => false,
            EventHiveError::Migration(_) => false,
            EventHiveError::Config(_) => false,
            EventHiveError::Http(_) => true,
            EventHiveError::Io(_) => true,
            _ => false,
        }
    }
}
