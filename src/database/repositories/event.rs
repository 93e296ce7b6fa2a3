//! Event repository implementation

use sqlx::PgPool;

use crate::models::event::{Event, EventDraft};
use crate::utils::errors::Result;

const EVENT_COLUMNS: &str = "id, title, annotation, description, category_id, initiator_id, \
     event_date, location, paid, participant_limit, request_moderation, state, \
     created_on, published_on";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event from a resolved draft
    pub async fn create(&self, draft: EventDraft) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, annotation, description, category_id, initiator_id,
                                event_date, location, paid, participant_limit,
                                request_moderation, state, created_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(draft.title)
        .bind(draft.annotation)
        .bind(draft.description)
        .bind(draft.category_id)
        .bind(draft.initiator_id)
        .bind(draft.event_date)
        .bind(draft.location)
        .bind(draft.paid)
        .bind(draft.participant_limit)
        .bind(draft.request_moderation)
        .bind(draft.state)
        .bind(draft.created_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List events created by one initiator, newest first
    pub async fn find_by_initiator(
        &self,
        initiator_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE initiator_id = $1 \
             ORDER BY id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(initiator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Persist a mutated event wholesale
    pub async fn update(&self, event: &Event) -> Result<Event> {
        let updated = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $2,
                annotation = $3,
                description = $4,
                category_id = $5,
                event_date = $6,
                location = $7,
                paid = $8,
                participant_limit = $9,
                request_moderation = $10,
                state = $11,
                published_on = $12
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.annotation)
        .bind(&event.description)
        .bind(event.category_id)
        .bind(event.event_date)
        .bind(&event.location)
        .bind(event.paid)
        .bind(event.participant_limit)
        .bind(event.request_moderation)
        .bind(event.state)
        .bind(event.published_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Count events referencing a category
    pub async fn count_by_category(&self, category_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
