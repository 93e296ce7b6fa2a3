//! Participation request service
//!
//! This service admits, cancels, and batch-resolves participation requests
//! without ever letting the confirmed count of an event exceed its
//! participant limit. Admission and batch resolution for one event run
//! under that event's lock, so a capacity check and the write it guards
//! form a single critical section.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::database::{EventRepository, RequestRepository, UserRepository};
use crate::models::event::EventState;
use crate::models::request::{
    EventRequestStatusResult, EventRequestStatusUpdate, ParticipationRequest, RequestStatus,
};
use crate::utils::datetime;
use crate::utils::errors::{EventHiveError, Result};
use crate::utils::locks::EventLocks;

/// Participation request allocator
#[derive(Clone)]
pub struct RequestService {
    requests: RequestRepository,
    events: EventRepository,
    users: UserRepository,
    locks: EventLocks,
}

impl RequestService {
    /// Create a new RequestService instance
    pub fn new(
        requests: RequestRepository,
        events: EventRepository,
        users: UserRepository,
        locks: EventLocks,
    ) -> Self {
        Self {
            requests,
            events,
            users,
            locks,
        }
    }

    /// Admit a new participation request for `event_id` by `user_id`.
    ///
    /// The admitted request is CONFIRMED right away when the event needs no
    /// moderation or has no limit, otherwise it is queued PENDING.
    pub async fn add_request(&self, user_id: i64, event_id: i64) -> Result<ParticipationRequest> {
        debug!(user_id = user_id, event_id = event_id, "Admitting participation request");

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventHiveError::UserNotFound { user_id })?;

        // Everything from the state checks to the insert is one critical
        // section per event: two concurrent admissions against the last open
        // slot must not both pass the capacity check.
        let _guard = self.locks.acquire(event_id).await;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;

        if event.initiator_id == user_id {
            return Err(EventHiveError::Conflict(
                "Initiator cannot request participation in own event".to_string(),
            ));
        }
        if event.state != EventState::Published {
            return Err(EventHiveError::Conflict(
                "You can participate only in published events".to_string(),
            ));
        }
        if self
            .requests
            .exists_by_requester_and_event(user_id, event_id)
            .await?
        {
            return Err(EventHiveError::Conflict("Request already exists".to_string()));
        }

        if event.participant_limit > 0 {
            let confirmed = self.requests.count_confirmed(event_id).await?;
            if confirmed >= i64::from(event.participant_limit) {
                return Err(EventHiveError::Conflict(
                    "The participant limit has been reached".to_string(),
                ));
            }
        }

        let status = if event.auto_confirms() {
            RequestStatus::Confirmed
        } else {
            RequestStatus::Pending
        };

        let request = self
            .requests
            .create(event_id, user_id, status, datetime::now())
            .await?;
        info!(
            request_id = request.id,
            event_id = event_id,
            user_id = user_id,
            status = %request.status,
            "Participation request admitted"
        );
        Ok(request)
    }

    /// Cancel one's own request. Works from any prior status; cancelling an
    /// already-confirmed request frees its slot, and the freed slot is not
    /// backfilled from the pending queue.
    pub async fn cancel_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<ParticipationRequest> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventHiveError::UserNotFound { user_id })?;

        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(EventHiveError::RequestNotFound { request_id })?;
        // Someone else's request is reported as absent
        if request.requester_id != user_id {
            return Err(EventHiveError::RequestNotFound { request_id });
        }

        let canceled = self
            .requests
            .update_status(request_id, RequestStatus::Canceled)
            .await?;
        info!(request_id = request_id, user_id = user_id, "Participation request canceled");
        Ok(canceled)
    }

    /// All requests submitted by one user
    pub async fn get_user_requests(&self, user_id: i64) -> Result<Vec<ParticipationRequest>> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventHiveError::UserNotFound { user_id })?;

        self.requests.find_by_requester(user_id).await
    }

    /// All requests targeting one event, visible to its owner only
    pub async fn get_event_requests(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Vec<ParticipationRequest>> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;
        if event.initiator_id != user_id {
            return Err(EventHiveError::EventNotFound { event_id });
        }

        self.requests.find_by_event(event_id).await
    }

    /// Owner's batch resolution of pending requests.
    ///
    /// Confirmations are processed in the order given; once the limit is
    /// reached the call fails with Conflict, keeping the prefix confirmed so
    /// far. A batch that fills the limit exactly cascade-rejects every other
    /// still-pending request of the event as a side effect.
    pub async fn update_event_requests(
        &self,
        user_id: i64,
        event_id: i64,
        body: EventRequestStatusUpdate,
    ) -> Result<EventRequestStatusResult> {
        // The whole resolution is serialized against admissions and other
        // batches on the same event
        let _guard = self.locks.acquire(event_id).await;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHiveError::EventNotFound { event_id })?;
        if event.initiator_id != user_id {
            return Err(EventHiveError::EventNotFound { event_id });
        }

        if event.auto_confirms() {
            return Err(EventHiveError::Conflict(
                "Confirmation is not required for this event".to_string(),
            ));
        }

        if body.request_ids.is_empty() {
            return Ok(EventRequestStatusResult::default());
        }

        let target: RequestStatus = body.status.parse().map_err(|_| {
            EventHiveError::BadRequest(format!("Unknown target status: {}", body.status))
        })?;
        if !matches!(target, RequestStatus::Confirmed | RequestStatus::Rejected) {
            return Err(EventHiveError::BadRequest(format!(
                "Unknown target status: {}",
                body.status
            )));
        }

        let loaded = self.requests.find_by_ids(&body.request_ids).await?;
        let mut by_id: HashMap<i64, ParticipationRequest> =
            loaded.into_iter().map(|r| (r.id, r)).collect();
        // Re-establish the caller's order; duplicates and unknown ids drop out
        let mut targeted: Vec<ParticipationRequest> = Vec::with_capacity(body.request_ids.len());
        for id in &body.request_ids {
            if let Some(request) = by_id.remove(id) {
                targeted.push(request);
            }
        }

        // All-or-nothing precondition checks, before any mutation
        for request in &targeted {
            if request.event_id != event_id {
                return Err(EventHiveError::Conflict(format!(
                    "Request with id={} does not belong to event with id={}",
                    request.id, event_id
                )));
            }
            if request.status != RequestStatus::Pending {
                return Err(EventHiveError::Conflict(
                    "Only pending requests can be modified".to_string(),
                ));
            }
        }

        if target == RequestStatus::Confirmed {
            let confirmed_now = self.requests.count_confirmed(event_id).await?;
            let plan = plan_confirm(event.participant_limit, confirmed_now, targeted.len());

            let confirm_ids: Vec<i64> = targeted.iter().take(plan.confirm).map(|r| r.id).collect();
            let confirmed = if confirm_ids.is_empty() {
                Vec::new()
            } else {
                self.requests
                    .update_status_many(&confirm_ids, RequestStatus::Confirmed)
                    .await?
            };

            if plan.halted {
                // The prefix confirmed above stays confirmed; the batch
                // itself fails once capacity is exhausted
                return Err(EventHiveError::Conflict(
                    "The participant limit has been reached".to_string(),
                ));
            }

            if plan.limit_hit {
                let rejected = self.requests.reject_all_pending(event_id).await?;
                info!(
                    event_id = event_id,
                    rejected = rejected,
                    "Cascade-rejected remaining pending requests, limit reached"
                );
            }

            info!(
                event_id = event_id,
                confirmed = confirmed.len(),
                "Batch confirmation applied"
            );
            Ok(EventRequestStatusResult {
                confirmed_requests: confirmed,
                rejected_requests: Vec::new(),
            })
        } else {
            let ids: Vec<i64> = targeted.iter().map(|r| r.id).collect();
            let rejected = self
                .requests
                .update_status_many(&ids, RequestStatus::Rejected)
                .await?;
            info!(
                event_id = event_id,
                rejected = rejected.len(),
                "Batch rejection applied"
            );
            Ok(EventRequestStatusResult {
                confirmed_requests: Vec::new(),
                rejected_requests: rejected,
            })
        }
    }
}

/// Outcome of sizing a confirmation batch against remaining capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfirmPlan {
    /// How many requests from the front of the batch get confirmed
    confirm: usize,
    /// Whether the confirmed count equals the limit afterwards
    limit_hit: bool,
    /// Whether the batch ran out of capacity partway and must fail
    halted: bool,
}

/// Size a confirmation batch. `limit <= 0` means unlimited: the whole batch
/// is confirmed and no cascade ever triggers.
fn plan_confirm(limit: i32, confirmed: i64, batch: usize) -> ConfirmPlan {
    if limit <= 0 {
        return ConfirmPlan {
            confirm: batch,
            limit_hit: false,
            halted: false,
        };
    }

    let limit = i64::from(limit);
    let remaining = (limit - confirmed).max(0) as usize;
    if batch <= remaining {
        ConfirmPlan {
            confirm: batch,
            limit_hit: confirmed + batch as i64 >= limit,
            halted: false,
        }
    } else {
        ConfirmPlan {
            confirm: remaining,
            limit_hit: true,
            halted: true,
        }
    }
}
