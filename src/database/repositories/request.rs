//! Participation request repository implementation
//!
//! Also hosts the capacity ledger: the confirmed count per event is always a
//! derived query over this table, never a stored counter.

use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::models::request::{ParticipationRequest, RequestStatus};
use crate::utils::errors::Result;

const REQUEST_COLUMNS: &str = "id, event_id, requester_id, status, created";

#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new request with its admission status
    pub async fn create(
        &self,
        event_id: i64,
        requester_id: i64,
        status: RequestStatus,
        created: NaiveDateTime,
    ) -> Result<ParticipationRequest> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            r#"
            INSERT INTO participation_requests (event_id, requester_id, status, created)
            VALUES ($1, $2, $3, $4)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(requester_id)
        .bind(status)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Find request by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Load requests by id set; unknown ids are silently absent
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// All requests submitted by one requester
    pub async fn find_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE requester_id = $1 ORDER BY id"
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// All requests targeting one event
    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE event_id = $1 ORDER BY id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Whether a (requester, event) pair already has a request
    pub async fn exists_by_requester_and_event(
        &self,
        requester_id: i64,
        event_id: i64,
    ) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests WHERE requester_id = $1 AND event_id = $2",
        )
        .bind(requester_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Capacity ledger: confirmed participants of one event
    pub async fn count_confirmed(&self, event_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(RequestStatus::Confirmed)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Transition one request to a new status
    pub async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<ParticipationRequest> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            r#"
            UPDATE participation_requests
            SET status = $2
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Transition a set of requests to a new status
    pub async fn update_status_many(
        &self,
        ids: &[i64],
        status: RequestStatus,
    ) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            r#"
            UPDATE participation_requests
            SET status = $2
            WHERE id = ANY($1)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(ids)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Cascade: reject every still-pending request of one event, returning
    /// the number of rows affected
    pub async fn reject_all_pending(&self, event_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE participation_requests SET status = $2 WHERE event_id = $1 AND status = $3",
        )
        .bind(event_id)
        .bind(RequestStatus::Rejected)
        .bind(RequestStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
