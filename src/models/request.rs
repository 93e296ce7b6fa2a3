//! Participation request model
//!
//! A participation request is a join entity between a user and an event. Its
//! status is decided by the allocator: admitted requests are CONFIRMED or
//! queued PENDING, the requester may CANCEL, and the event owner resolves
//! pending requests in batches.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime;

/// Status of a participation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "request_status", rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Confirmed => write!(f, "CONFIRMED"),
            RequestStatus::Rejected => write!(f, "REJECTED"),
            RequestStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "CONFIRMED" => Ok(RequestStatus::Confirmed),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "CANCELED" => Ok(RequestStatus::Canceled),
            other => Err(format!("Unknown request status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParticipationRequest {
    pub id: i64,
    pub event_id: i64,
    pub requester_id: i64,
    pub status: RequestStatus,
    /// Set at creation, immutable afterward
    #[serde(with = "datetime::serde_format")]
    pub created: NaiveDateTime,
}

/// Owner's batch resolution payload. The target status arrives as a wire
/// token and is parsed by the service; only CONFIRMED and REJECTED are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequestStatusUpdate {
    pub request_ids: Vec<i64>,
    pub status: String,
}

/// Requests mutated by one batch resolution call. Cascade-rejected requests
/// are a side effect and are not listed here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventRequestStatusResult {
    pub confirmed_requests: Vec<ParticipationRequest>,
    pub rejected_requests: Vec<ParticipationRequest>,
}
