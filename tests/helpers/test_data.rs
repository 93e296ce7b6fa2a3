//! Test fixture builders
//!
//! Direct-insert builders for users, categories, events, and participation
//! requests, so tests can stage any lifecycle state without walking the full
//! service flow first.

use chrono::{Duration, NaiveDateTime};
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::PgPool;
use uuid::Uuid;

use EventHive::models::category::Category;
use EventHive::models::event::{Event, EventState};
use EventHive::models::request::{ParticipationRequest, RequestStatus};
use EventHive::models::user::User;
use EventHive::utils::datetime;

/// Insert a user with a random name and unique email
pub async fn create_user(pool: &PgPool) -> User {
    let name: String = Name().fake();
    let email = format!("{}@test.local", Uuid::new_v4().simple());

    sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user")
}

/// Insert a category with a unique name
pub async fn create_category(pool: &PgPool) -> Category {
    let name = format!("category-{}", Uuid::new_v4().simple());

    sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test category")
}

/// Shape of an event fixture
pub struct EventFixture {
    pub initiator_id: i64,
    pub category_id: i64,
    pub state: EventState,
    pub participant_limit: i32,
    pub request_moderation: bool,
    pub event_date: NaiveDateTime,
}

impl EventFixture {
    pub fn published(initiator_id: i64, category_id: i64) -> Self {
        Self {
            initiator_id,
            category_id,
            state: EventState::Published,
            participant_limit: 0,
            request_moderation: true,
            event_date: datetime::now() + Duration::days(7),
        }
    }

    pub fn pending(initiator_id: i64, category_id: i64) -> Self {
        Self {
            state: EventState::Pending,
            ..Self::published(initiator_id, category_id)
        }
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.participant_limit = limit;
        self
    }

    pub fn with_moderation(mut self, moderation: bool) -> Self {
        self.request_moderation = moderation;
        self
    }

    pub fn with_event_date(mut self, event_date: NaiveDateTime) -> Self {
        self.event_date = event_date;
        self
    }
}

/// Insert an event in the given lifecycle state
pub async fn create_event(pool: &PgPool, fixture: EventFixture) -> Event {
    let published_on = if fixture.state == EventState::Published {
        Some(datetime::now())
    } else {
        None
    };

    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, annotation, description, category_id, initiator_id,
                            event_date, location, paid, participant_limit,
                            request_moderation, state, created_on, published_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id, title, annotation, description, category_id, initiator_id,
                  event_date, location, paid, participant_limit, request_moderation,
                  state, created_on, published_on
        "#,
    )
    .bind(format!("Event {}", Uuid::new_v4().simple()))
    .bind("Fixture event")
    .bind(Option::<String>::None)
    .bind(fixture.category_id)
    .bind(fixture.initiator_id)
    .bind(fixture.event_date)
    .bind(Option::<String>::None)
    .bind(false)
    .bind(fixture.participant_limit)
    .bind(fixture.request_moderation)
    .bind(fixture.state)
    .bind(datetime::now())
    .bind(published_on)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test event")
}

/// Insert a participation request in the given status
pub async fn create_request(
    pool: &PgPool,
    event_id: i64,
    requester_id: i64,
    status: RequestStatus,
) -> ParticipationRequest {
    sqlx::query_as::<_, ParticipationRequest>(
        r#"
        INSERT INTO participation_requests (event_id, requester_id, status, created)
        VALUES ($1, $2, $3, $4)
        RETURNING id, event_id, requester_id, status, created
        "#,
    )
    .bind(event_id)
    .bind(requester_id)
    .bind(status)
    .bind(datetime::now())
    .fetch_one(pool)
    .await
    .expect("Failed to insert test request")
}

/// Current status of one request, fetched directly
pub async fn request_status(pool: &PgPool, request_id: i64) -> RequestStatus {
    let row: (RequestStatus,) =
        sqlx::query_as("SELECT status FROM participation_requests WHERE id = $1")
            .bind(request_id)
            .fetch_one(pool)
            .await
            .expect("Failed to fetch request status");
    row.0
}
