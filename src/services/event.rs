//! Event lifecycle service
//!
//! This service owns the event state machine: creation, owner edits while
//! the event is under review, and the admin publish/reject decision. Every
//! date-carrying edit re-validates the lead-time guard, and publication is
//! the only transition that stamps `published_on`.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::database::{CategoryRepository, EventRepository, RequestRepository, UserRepository};
use crate::models::event::{
    AdminStateAction, Event, EventDraft, EventFull, EventPatch, EventState, NewEvent,
    UpdateEventAdmin, UpdateEventUser, UserStateAction,
};
use crate::services::stats::StatsService;
use crate::utils::datetime;
use crate::utils::errors::{EventHiveError, Result};

/// Minimum lead between now and the event date for owner create/edit
const USER_LEAD_HOURS: i64 = 2;
/// Minimum lead required at publication time
const ADMIN_LEAD_HOURS: i64 = 1;

/// Event lifecycle service
#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    users: UserRepository,
    categories: CategoryRepository,
    requests: RequestRepository,
    stats: StatsService,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(
        events: EventRepository,
        users: UserRepository,
        categories: CategoryRepository,
        requests: RequestRepository,
        stats: StatsService,
    ) -> Self {
        Self {
            events,
            users,
            categories,
            requests,
            stats,
        }
    }

    /// Create a new event owned by `user_id`, starting in PENDING state
    pub async fn create_event(&self, user_id: i64, payload: NewEvent) -> Result<EventFull> {
        debug!(user_id = user_id, "Creating event");

        let initiator = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EventHiveError::UserNotFound { user_id })?;
        let category = self
            .categories
            .find_by_id(payload.category)
            .await?
            .ok_or(EventHiveError::CategoryNotFound {
                category_id: payload.category,
            })?;

        let event_date = datetime::parse(&payload.event_date)?;
        ensure_lead(event_date, datetime::now(), USER_LEAD_HOURS)?;

        let participant_limit = payload.participant_limit.unwrap_or(0);
        ensure_limit_non_negative(participant_limit)?;

        let draft = EventDraft {
            title: payload.title,
            annotation: payload.annotation,
            description: payload.description,
            category_id: category.id,
            initiator_id: initiator.id,
            event_date,
            location: payload.location,
            paid: payload.paid.unwrap_or(false),
            participant_limit,
            request_moderation: payload.request_moderation.unwrap_or(true),
            state: EventState::Pending,
            created_on: datetime::now(),
        };

        let event = self.events.create(draft).await?;
        info!(event_id = event.id, user_id = user_id, "Event created");

        // A brand-new event cannot have confirmed requests or views yet, so
        // neither counter is recomputed here.
        Ok(EventFull {
            event,
            confirmed_requests: 0,
            views: 0,
        })
    }

    /// List events created by one user
    pub async fn get_user_events(&self, user_id: i64, from: i64, size: i64) -> Result<Vec<EventFull>> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventHiveError::UserNotFound { user_id })?;

        let events = self.events.find_by_initiator(user_id, size, from).await?;
        self.enrich_many(events).await
    }

    /// Fetch one event as its owner; a non-owner is told it does not exist
    pub async fn get_user_event(&self, user_id: i64, event_id: i64) -> Result<EventFull> {
        let event = self.load_owned_event(user_id, event_id).await?;
        self.enrich(event).await
    }

    /// Owner edit of a not-yet-published event
    pub async fn update_user_event(
        &self,
        user_id: i64,
        event_id: i64,
        update: UpdateEventUser,
    ) -> Result<EventFull> {
        let mut event = self.load_owned_event(user_id, event_id).await?;

        if !event.is_editable() {
            return Err(EventHiveError::Conflict(
                "Only pending or canceled events can be changed".to_string(),
            ));
        }

        self.apply_patch_checked(&mut event, &update.patch, USER_LEAD_HOURS)
            .await?;

        match update.state_action {
            Some(UserStateAction::SendToReview) => event.state = EventState::Pending,
            Some(UserStateAction::CancelReview) => event.state = EventState::Canceled,
            None => {}
        }

        let saved = self.events.update(&event).await?;
        info!(event_id = event_id, user_id = user_id, state = %saved.state, "Event updated by owner");
        self.enrich(saved).await
    }

    /// Admin review of an event: field fixes plus the publish/reject decision
    pub async fn update_admin_event(
        &self,
        event_id: i64,
        update: UpdateEventAdmin,
    ) -> Result<EventFull> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;

        self.apply_patch_checked(&mut event, &update.patch, ADMIN_LEAD_HOURS)
            .await?;

        match update.state_action {
            Some(AdminStateAction::PublishEvent) => {
                if event.state != EventState::Pending {
                    return Err(EventHiveError::Conflict(format!(
                        "Cannot publish the event because it's not in the right state: {}",
                        event.state
                    )));
                }
                let now = datetime::now();
                if event.event_date < now + Duration::hours(ADMIN_LEAD_HOURS) {
                    return Err(EventHiveError::Conflict(
                        "Event date must be at least 1 hour after publish time".to_string(),
                    ));
                }
                event.state = EventState::Published;
                event.published_on = Some(now);
            }
            Some(AdminStateAction::RejectEvent) => {
                if event.state == EventState::Published {
                    return Err(EventHiveError::Conflict(
                        "Published event cannot be rejected".to_string(),
                    ));
                }
                event.state = EventState::Canceled;
            }
            None => {}
        }

        let saved = self.events.update(&event).await?;
        info!(event_id = event_id, state = %saved.state, "Event updated by admin");
        self.enrich(saved).await
    }

    /// Public view of a published event. Records a hit with the collector
    /// and returns the view count including this visit.
    pub async fn get_public_event(
        &self,
        event_id: i64,
        client_ip: &str,
        uri: &str,
    ) -> Result<EventFull> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;
        if event.state != EventState::Published {
            return Err(EventHiveError::EventNotFound { event_id });
        }

        // Read the count before the hit so the response can guarantee +1
        let before = self
            .views_by_event_ids(&[event_id])
            .await
            .get(&event_id)
            .copied()
            .unwrap_or(0);
        self.stats.record_hit(uri, client_ip, datetime::now()).await;

        let confirmed = self.requests.count_confirmed(event.id).await?;
        Ok(EventFull {
            event,
            confirmed_requests: confirmed,
            views: before + 1,
        })
    }

    // ===== Helpers =====

    async fn load_owned_event(&self, user_id: i64, event_id: i64) -> Result<Event> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;
        // Ownership mismatches are reported as absence, not as a permission
        // failure
        if event.initiator_id != user_id {
            return Err(EventHiveError::EventNotFound { event_id });
        }
        Ok(event)
    }

    /// Resolve the checked parts of a patch (category existence, date lead,
    /// limit sign), then apply the plain field edits
    async fn apply_patch_checked(
        &self,
        event: &mut Event,
        patch: &EventPatch,
        lead_hours: i64,
    ) -> Result<()> {
        if let Some(category_id) = patch.category {
            let category = self
                .categories
                .find_by_id(category_id)
                .await?
                .ok_or(EventHiveError::CategoryNotFound { category_id })?;
            event.category_id = category.id;
        }

        if let Some(raw_date) = &patch.event_date {
            let event_date = datetime::parse(raw_date)?;
            ensure_lead(event_date, datetime::now(), lead_hours)?;
            event.event_date = event_date;
        }

        if let Some(limit) = patch.participant_limit {
            ensure_limit_non_negative(limit)?;
        }

        event.apply_patch(patch);
        Ok(())
    }

    async fn enrich(&self, event: Event) -> Result<EventFull> {
        let views = self
            .views_by_event_ids(&[event.id])
            .await
            .get(&event.id)
            .copied()
            .unwrap_or(0);
        let confirmed = self.requests.count_confirmed(event.id).await?;
        Ok(EventFull {
            event,
            confirmed_requests: confirmed,
            views,
        })
    }

    async fn enrich_many(&self, events: Vec<Event>) -> Result<Vec<EventFull>> {
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        let views = self.views_by_event_ids(&ids).await;

        let mut result = Vec::with_capacity(events.len());
        for event in events {
            let confirmed = self.requests.count_confirmed(event.id).await?;
            let event_views = views.get(&event.id).copied().unwrap_or(0);
            result.push(EventFull {
                event,
                confirmed_requests: confirmed,
                views: event_views,
            });
        }
        Ok(result)
    }

    /// Best-effort view counts keyed by event id; zeros when the collector
    /// is unreachable
    async fn views_by_event_ids(&self, ids: &[i64]) -> HashMap<i64, i64> {
        if ids.is_empty() {
            return HashMap::new();
        }
        let uris: Vec<String> = ids.iter().map(|id| format!("/events/{}", id)).collect();
        let by_uri = self
            .stats
            .view_counts(
                &uris,
                datetime::stats_window_start(),
                datetime::now() + Duration::days(1),
                true,
            )
            .await;

        ids.iter()
            .map(|&id| {
                let hits = by_uri
                    .get(&format!("/events/{}", id))
                    .copied()
                    .unwrap_or(0);
                (id, hits)
            })
            .collect()
    }
}

/// Lead-time guard shared by creation, edits, and the publish transition
fn ensure_lead(event_date: NaiveDateTime, now: NaiveDateTime, lead_hours: i64) -> Result<()> {
    if event_date < now + Duration::hours(lead_hours) {
        return Err(EventHiveError::BadRequest(format!(
            "Event date must be at least {} hour(s) in the future",
            lead_hours
        )));
    }
    Ok(())
}

fn ensure_limit_non_negative(limit: i32) -> Result<()> {
    if limit < 0 {
        return Err(EventHiveError::BadRequest(
            "Participant limit must not be negative".to_string(),
        ));
    }
    Ok(())
}
