//! Event model
//!
//! An event moves through an approval lifecycle: it is created PENDING,
//! reviewed by an administrator, and either PUBLISHED or CANCELED. Owner
//! edits are only allowed while the event has not been published.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime;

/// Lifecycle state of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "event_state", rename_all = "UPPERCASE")]
pub enum EventState {
    Pending,
    Published,
    Canceled,
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Pending => write!(f, "PENDING"),
            EventState::Published => write!(f, "PUBLISHED"),
            EventState::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// State action an event owner may request on their own event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStateAction {
    SendToReview,
    CancelReview,
}

/// State action an administrator may apply during review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStateAction {
    PublishEvent,
    RejectEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub annotation: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub initiator_id: i64,
    #[serde(with = "datetime::serde_format")]
    pub event_date: NaiveDateTime,
    pub location: Option<String>,
    pub paid: bool,
    /// 0 means unlimited
    pub participant_limit: i32,
    /// When false, every admitted request is auto-confirmed
    pub request_moderation: bool,
    pub state: EventState,
    #[serde(with = "datetime::serde_format")]
    pub created_on: NaiveDateTime,
    /// Set exactly once, at the PENDING -> PUBLISHED transition
    #[serde(with = "datetime::serde_format_opt")]
    pub published_on: Option<NaiveDateTime>,
}

impl Event {
    /// Whether owner edits are currently allowed
    pub fn is_editable(&self) -> bool {
        self.state != EventState::Published
    }

    /// Whether admitted requests need no manual confirmation
    pub fn auto_confirms(&self) -> bool {
        !self.request_moderation || self.participant_limit == 0
    }

    /// Apply the optional field edits shared by owner and admin updates.
    ///
    /// Category and event date changes are resolved by the service because
    /// they need existence and lead-time checks.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(annotation) = &patch.annotation {
            self.annotation = annotation.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(paid) = patch.paid {
            self.paid = paid;
        }
        if let Some(limit) = patch.participant_limit {
            self.participant_limit = limit;
        }
        if let Some(moderation) = patch.request_moderation {
            self.request_moderation = moderation;
        }
    }
}

/// Payload for creating an event. The date arrives in the boundary pattern
/// and is parsed by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub annotation: String,
    pub description: Option<String>,
    pub category: i64,
    pub event_date: String,
    pub location: Option<String>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
}

/// Optional field edits shared by owner and admin update payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub annotation: Option<String>,
    pub description: Option<String>,
    pub category: Option<i64>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
}

/// Owner update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventUser {
    #[serde(flatten)]
    pub patch: EventPatch,
    pub state_action: Option<UserStateAction>,
}

/// Admin update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventAdmin {
    #[serde(flatten)]
    pub patch: EventPatch,
    pub state_action: Option<AdminStateAction>,
}

/// Resolved insert row for a new event, produced by the service after
/// defaults and guards have been applied
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub annotation: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub initiator_id: i64,
    pub event_date: NaiveDateTime,
    pub location: Option<String>,
    pub paid: bool,
    pub participant_limit: i32,
    pub request_moderation: bool,
    pub state: EventState,
    pub created_on: NaiveDateTime,
}

/// Event enriched with derived counters for the caller
#[derive(Debug, Clone, Serialize)]
pub struct EventFull {
    #[serde(flatten)]
    pub event: Event,
    pub confirmed_requests: i64,
    pub views: i64,
}
