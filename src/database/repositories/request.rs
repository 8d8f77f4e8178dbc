//! Participation request repository implementation

use std::collections::HashMap;
use std::time::Instant;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use crate::models::event::Event;
use crate::models::request::{
    NewParticipationRequest, ParticipationRequest, RequestStatus, RequestStatusUpdateResult,
};
use crate::utils::errors::{EwmError, Result};
use crate::utils::logging::log_database_operation;
use super::event::EVENT_COLUMNS;

const REQUEST_COLUMNS: &str = "id, requester_id, event_id, created, status";

/// Pure decision run by [`RequestStore::moderate`] against a locked snapshot
pub type Decision<'a> =
    &'a (dyn Fn(&Event, &[ParticipationRequest]) -> Result<RequestStatusUpdateResult> + Send + Sync);

/// Status for a new request, decided by [`RequestStore::submit`] against a locked snapshot
pub type Admission<'a> =
    &'a (dyn Fn(&Event, &[ParticipationRequest]) -> Result<RequestStatus> + Send + Sync);

#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create(&self, request: NewParticipationRequest) -> Result<ParticipationRequest>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>>;

    /// Requests of one event ordered by id
    async fn find_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>>;

    async fn find_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>>;

    async fn find_by_event_and_requester(&self, event_id: i64, requester_id: i64) -> Result<Option<ParticipationRequest>>;

    async fn save(&self, request: &ParticipationRequest) -> Result<ParticipationRequest>;

    async fn count_confirmed(&self, event_id: i64) -> Result<i64>;

    /// CONFIRMED counts for many events in one round trip; events without any are absent
    async fn count_confirmed_by_events(&self, event_ids: &[i64]) -> Result<HashMap<i64, i64>>;

    /// Run `decide` against the event and all of its requests while holding
    /// exclusive access to them, then persist every request in the returned
    /// result together with the event's confirmed counter. Nothing is written
    /// when `decide` fails.
    async fn moderate(&self, event_id: i64, decide: Decision<'_>) -> Result<RequestStatusUpdateResult>;

    /// Run `admit` under the same exclusive access as [`RequestStore::moderate`]
    /// and insert the request with the status it returns. Nothing is written
    /// when `admit` fails.
    async fn submit(&self, event_id: i64, requester_id: i64, admit: Admission<'_>) -> Result<ParticipationRequest>;
}

#[derive(Clone, Debug)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Recount the denormalized CONFIRMED total of an event
async fn sync_confirmed_counter(conn: &mut PgConnection, event_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE events
        SET confirmed_requests = (
            SELECT COUNT(*) FROM participation_requests WHERE event_id = $1 AND status = 'CONFIRMED'
        )
        WHERE id = $1
        "#
    )
    .bind(event_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Lock the event row and load its requests; concurrent writers of the same
/// event queue up behind the lock until the transaction ends
async fn lock_event(conn: &mut PgConnection, event_id: i64) -> Result<(Event, Vec<ParticipationRequest>)> {
    let event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {} FROM events WHERE id = $1 FOR UPDATE",
        EVENT_COLUMNS
    ))
    .bind(event_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(EwmError::EventNotFound { event_id })?;

    let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
        "SELECT {} FROM participation_requests WHERE event_id = $1 ORDER BY id",
        REQUEST_COLUMNS
    ))
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok((event, requests))
}

async fn insert_request(conn: &mut PgConnection, request: &NewParticipationRequest) -> Result<ParticipationRequest> {
    let created = sqlx::query_as::<_, ParticipationRequest>(&format!(
        "INSERT INTO participation_requests (requester_id, event_id, created, status) VALUES ($1, $2, NOW(), $3) RETURNING {}",
        REQUEST_COLUMNS
    ))
    .bind(request.requester_id)
    .bind(request.event_id)
    .bind(request.status)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| super::map_unique_violation(e, "Participation request"))?;

    if created.status == RequestStatus::Confirmed {
        sync_confirmed_counter(conn, created.event_id).await?;
    }
    Ok(created)
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn create(&self, request: NewParticipationRequest) -> Result<ParticipationRequest> {
        let mut tx = self.pool.begin().await?;
        let created = insert_request(&mut tx, &request).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {} FROM participation_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {} FROM participation_requests WHERE event_id = $1 ORDER BY id",
            REQUEST_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {} FROM participation_requests WHERE requester_id = $1 ORDER BY id",
            REQUEST_COLUMNS
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_by_event_and_requester(&self, event_id: i64, requester_id: i64) -> Result<Option<ParticipationRequest>> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {} FROM participation_requests WHERE event_id = $1 AND requester_id = $2",
            REQUEST_COLUMNS
        ))
        .bind(event_id)
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn save(&self, request: &ParticipationRequest) -> Result<ParticipationRequest> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "UPDATE participation_requests SET status = $2 WHERE id = $1 RETURNING {}",
            REQUEST_COLUMNS
        ))
        .bind(request.id)
        .bind(request.status)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EwmError::RequestNotFound { request_id: request.id })?;

        sync_confirmed_counter(&mut tx, saved.event_id).await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn count_confirmed(&self, event_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests WHERE event_id = $1 AND status = 'CONFIRMED'"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn count_confirmed_by_events(&self, event_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT event_id, COUNT(*)
            FROM participation_requests
            WHERE event_id = ANY($1) AND status = 'CONFIRMED'
            GROUP BY event_id
            "#
        )
        .bind(event_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn moderate(&self, event_id: i64, decide: Decision<'_>) -> Result<RequestStatusUpdateResult> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;
        let (event, requests) = lock_event(&mut tx, event_id).await?;

        let result = decide(&event, &requests)?;

        if !result.is_empty() {
            for request in result.mutated() {
                sqlx::query("UPDATE participation_requests SET status = $2 WHERE id = $1")
                    .bind(request.id)
                    .bind(request.status)
                    .execute(&mut *tx)
                    .await?;
            }
            sync_confirmed_counter(&mut tx, event_id).await?;
        }

        tx.commit().await?;
        log_database_operation(
            "moderate",
            "participation_requests",
            started.elapsed().as_millis() as u64,
            true,
        );

        Ok(result)
    }
    async fn submit(&self, event_id: i64, requester_id: i64, admit: Admission<'_>) -> Result<ParticipationRequest> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;
        let (event, requests) = lock_event(&mut tx, event_id).await?;

        let status = admit(&event, &requests)?;
        let created = insert_request(&mut tx, &NewParticipationRequest { requester_id, event_id, status }).await?;

        tx.commit().await?;
        log_database_operation(
            "submit",
            "participation_requests",
            started.elapsed().as_millis() as u64,
            true,
        );

        Ok(created)
    }
}
