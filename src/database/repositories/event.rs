//! Event repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use crate::models::event::{Event, EventFilter, EventSort, EventState, NewEventRecord};
use crate::models::page::Page;
use crate::utils::errors::Result;

pub(crate) const EVENT_COLUMNS: &str = "id, title, annotation, description, category_id, initiator_id, event_date, lat, lon, paid, participant_limit, request_moderation, created_on, published_on, state, confirmed_requests";

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new PENDING event
    async fn create(&self, record: NewEventRecord) -> Result<Event>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    async fn find_by_id_and_initiator(&self, id: i64, initiator_id: i64) -> Result<Option<Event>>;

    async fn find_published(&self, id: i64) -> Result<Option<Event>>;

    /// Persist every mutable column of an existing event
    async fn save(&self, event: &Event) -> Result<Event>;

    async fn find_by_initiator(&self, initiator_id: i64, page: Page) -> Result<Vec<Event>>;

    async fn find_by_filter(&self, filter: &EventFilter, page: Page) -> Result<Vec<Event>>;

    async fn exists_with_category(&self, category_id: i64) -> Result<bool>;
}

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate filter criteria into a single parameterized query
fn build_filter_query<'a>(filter: &'a EventFilter, page: Page) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM events WHERE TRUE", EVENT_COLUMNS));

    if let Some(ids) = filter.initiator_ids.as_ref().filter(|ids| !ids.is_empty()) {
        builder.push(" AND initiator_id = ANY(").push_bind(ids.clone()).push(")");
    }

    if let Some(states) = filter.states.as_ref().filter(|states| !states.is_empty()) {
        builder.push(" AND state IN (");
        let mut separated = builder.separated(", ");
        for state in states {
            separated.push_bind(*state);
        }
        separated.push_unseparated(")");
    }

    if let Some(ids) = filter.category_ids.as_ref().filter(|ids| !ids.is_empty()) {
        builder.push(" AND category_id = ANY(").push_bind(ids.clone()).push(")");
    }

    if let Some(start) = filter.range_start {
        builder.push(" AND event_date > ").push_bind(start);
    }

    if let Some(end) = filter.range_end {
        builder.push(" AND event_date < ").push_bind(end);
    }

    if let Some(text) = filter.text.as_ref().filter(|text| !text.is_empty()) {
        let pattern = format!("%{}%", text);
        builder
            .push(" AND (annotation ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(paid) = filter.paid {
        builder.push(" AND paid = ").push_bind(paid);
    }

    if filter.only_available {
        builder.push(" AND (participant_limit = 0 OR confirmed_requests < participant_limit)");
    }

    match filter.sort {
        EventSort::EventDate => builder.push(" ORDER BY event_date ASC, id ASC"),
        EventSort::Id => builder.push(" ORDER BY id ASC"),
    };

    builder.push(" LIMIT ").push_bind(page.size);
    builder.push(" OFFSET ").push_bind(page.from);

    builder
}

#[async_trait]
impl EventStore for EventRepository {
    async fn create(&self, record: NewEventRecord) -> Result<Event> {
        let NewEventRecord { event, initiator_id, created_on } = record;

        let created = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, annotation, description, category_id, initiator_id, event_date, lat, lon,
                                paid, participant_limit, request_moderation, created_on, state, confirmed_requests)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.title)
        .bind(event.annotation)
        .bind(event.description)
        .bind(event.category_id)
        .bind(initiator_id)
        .bind(event.event_date)
        .bind(event.location.lat)
        .bind(event.location.lon)
        .bind(event.paid)
        .bind(event.participant_limit)
        .bind(event.request_moderation)
        .bind(created_on)
        .bind(EventState::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn find_by_id_and_initiator(&self, id: i64, initiator_id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 AND initiator_id = $2",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(initiator_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_published(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1 AND state = $2",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(EventState::Published)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn save(&self, event: &Event) -> Result<Event> {
        let saved = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $2,
                annotation = $3,
                description = $4,
                category_id = $5,
                event_date = $6,
                lat = $7,
                lon = $8,
                paid = $9,
                participant_limit = $10,
                request_moderation = $11,
                published_on = $12,
                state = $13
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.annotation)
        .bind(&event.description)
        .bind(event.category_id)
        .bind(event.event_date)
        .bind(event.location.lat)
        .bind(event.location.lon)
        .bind(event.paid)
        .bind(event.participant_limit)
        .bind(event.request_moderation)
        .bind(event.published_on)
        .bind(event.state)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_initiator(&self, initiator_id: i64, page: Page) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE initiator_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            EVENT_COLUMNS
        ))
        .bind(initiator_id)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn find_by_filter(&self, filter: &EventFilter, page: Page) -> Result<Vec<Event>> {
        let mut builder = build_filter_query(filter, page);
        let events = builder
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn exists_with_category(&self, category_id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE category_id = $1)")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_filter_only_pages() {
        let filter = EventFilter::default();
        let builder = build_filter_query(&filter, Page::default());
        let sql = builder.sql();
        assert!(sql.ends_with("WHERE TRUE ORDER BY id ASC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_every_criterion_is_bound() {
        let filter = EventFilter {
            initiator_ids: Some(vec![1, 2]),
            states: Some(vec![EventState::Pending, EventState::Published]),
            category_ids: Some(vec![3]),
            range_start: Some(Utc::now()),
            range_end: Some(Utc::now()),
            text: Some("jazz".to_string()),
            paid: Some(true),
            only_available: true,
            sort: EventSort::EventDate,
        };
        let builder = build_filter_query(&filter, Page::default());
        let sql = builder.sql();

        assert!(sql.contains("initiator_id = ANY($1)"));
        assert!(sql.contains("state IN ($2, $3)"));
        assert!(sql.contains("category_id = ANY($4)"));
        assert!(sql.contains("event_date > $5"));
        assert!(sql.contains("event_date < $6"));
        assert!(sql.contains("annotation ILIKE $7 OR description ILIKE $8"));
        assert!(sql.contains("paid = $9"));
        assert!(sql.contains("confirmed_requests < participant_limit"));
        assert!(sql.contains("ORDER BY event_date ASC, id ASC LIMIT $10 OFFSET $11"));
    }

    #[test]
    fn test_empty_lists_are_ignored() {
        let filter = EventFilter {
            initiator_ids: Some(vec![]),
            states: Some(vec![]),
            ..Default::default()
        };
        let builder = build_filter_query(&filter, Page::default());
        assert!(!builder.sql().contains("ANY"));
        assert!(!builder.sql().contains(" IN ("));
    }
}
