//! Date and time handling
//!
//! All timestamps at the service boundary use the fixed textual pattern
//! `yyyy-MM-dd HH:mm:ss` (no timezone). This module owns parsing, formatting
//! and the serde glue for that pattern.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::utils::errors::{EventHiveError, Result};

/// Boundary timestamp pattern, kept in sync with the stats collector
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current timestamp, truncated to the naive wall-clock form used everywhere
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Start of the all-time window used for view-count queries
pub fn stats_window_start() -> NaiveDateTime {
    NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        NaiveTime::MIN,
    )
}

/// Parse a boundary timestamp string
pub fn parse(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| {
        EventHiveError::BadRequest(format!(
            "Incorrect date format: {}. Expected pattern: yyyy-MM-dd HH:mm:ss",
            value
        ))
    })
}

/// Format a timestamp into the boundary pattern
pub fn format(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` fields in the boundary pattern
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields in the boundary pattern
pub mod serde_format_opt {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&ts.format(DATE_TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => NaiveDateTime::parse_from_str(&s, DATE_TIME_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
