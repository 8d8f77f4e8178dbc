//! In-memory implementation of every store
//!
//! Backs tests and offline runs. All tables live behind one lock so
//! `moderate` sees and writes events and requests atomically, the same
//! guarantee the Postgres store gets from its transaction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::models::category::{Category, NewCategory};
use crate::models::comment::{Comment, NewCommentRecord};
use crate::models::event::{Event, EventFilter, EventSort, EventState, NewEventRecord};
use crate::models::page::Page;
use crate::models::request::{
    NewParticipationRequest, ParticipationRequest, RequestStatus, RequestStatusUpdateResult,
};
use crate::models::report::{CommentReport, NewCommentReport};
use crate::models::user::{NewUser, User};
use crate::utils::errors::{EwmError, Result};
use super::repositories::{
    Admission, CategoryStore, CommentStore, Decision, EventStore, ReportStore, RequestStore, UserStore,
};
use super::Stores;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    events: BTreeMap<i64, Event>,
    requests: BTreeMap<i64, ParticipationRequest>,
    comments: BTreeMap<i64, Comment>,
    reports: BTreeMap<i64, CommentReport>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn confirmed_count(&self, event_id: i64) -> i64 {
        self.requests
            .values()
            .filter(|r| r.event_id == event_id && r.status == RequestStatus::Confirmed)
            .count() as i64
    }

    fn snapshot(&self, event_id: i64) -> Result<(Event, Vec<ParticipationRequest>)> {
        let event = self
            .events
            .get(&event_id)
            .cloned()
            .ok_or(EwmError::EventNotFound { event_id })?;
        let requests = self
            .requests
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        Ok((event, requests))
    }

    fn insert_request(&mut self, request: NewParticipationRequest) -> Result<ParticipationRequest> {
        let duplicate = self
            .requests
            .values()
            .any(|r| r.event_id == request.event_id && r.requester_id == request.requester_id);
        if duplicate {
            return Err(EwmError::Conflict("Participation request already exists".to_string()));
        }
        let id = self.next_id();
        let created = ParticipationRequest {
            id,
            requester_id: request.requester_id,
            event_id: request.event_id,
            created: Utc::now(),
            status: request.status,
        };
        self.requests.insert(id, created.clone());
        self.sync_confirmed_counter(created.event_id);
        Ok(created)
    }

    fn sync_confirmed_counter(&mut self, event_id: i64) {
        let count = self.confirmed_count(event_id);
        if let Some(event) = self.events.get_mut(&event_id) {
            event.confirmed_requests = count;
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire every store trait to this database
    pub fn stores(&self) -> Stores {
        let db = Arc::new(self.clone());
        Stores {
            users: db.clone(),
            categories: db.clone(),
            events: db.clone(),
            requests: db.clone(),
            comments: db.clone(),
            reports: db,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryDatabase {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(EwmError::Conflict(format!("User with email {} already exists", user.email)));
        }
        let id = tables.next_id();
        let created = User { id, name: user.name, email: user.email, comments_blocked: false };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.users.contains_key(&id))
    }

    async fn list(&self, ids: Option<&[i64]>, page: Page) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let users = tables
            .users
            .values()
            .filter(|u| match ids {
                Some(ids) if !ids.is_empty() => ids.contains(&u.id),
                _ => true,
            })
            .cloned()
            .collect();
        Ok(page.apply(users))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn set_comments_blocked(&self, ids: &[i64], blocked: bool) -> Result<Vec<User>> {
        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();
        for user in tables.users.values_mut().filter(|u| ids.contains(&u.id)) {
            user.comments_blocked = blocked;
            updated.push(user.clone());
        }
        Ok(updated)
    }
}

#[async_trait]
impl CategoryStore for InMemoryDatabase {
    async fn create(&self, category: NewCategory) -> Result<Category> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == category.name) {
            return Err(EwmError::Conflict(format!("Category {} already exists", category.name)));
        }
        let id = tables.next_id();
        let created = Category { id, name: category.name };
        tables.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.categories.contains_key(&id))
    }

    async fn update(&self, id: i64, category: NewCategory) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == category.name && c.id != id) {
            return Err(EwmError::Conflict(format!("Category {} already exists", category.name)));
        }
        Ok(tables.categories.get_mut(&id).map(|existing| {
            existing.name = category.name;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.categories.remove(&id).is_some())
    }

    async fn list(&self, page: Page) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(page.apply(tables.categories.values().cloned().collect()))
    }
}

#[async_trait]
impl EventStore for InMemoryDatabase {
    async fn create(&self, record: NewEventRecord) -> Result<Event> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let NewEventRecord { event, initiator_id, created_on } = record;
        let created = Event {
            id,
            title: event.title,
            annotation: event.annotation,
            description: event.description,
            category_id: event.category_id,
            initiator_id,
            event_date: event.event_date,
            location: event.location,
            paid: event.paid,
            participant_limit: event.participant_limit,
            request_moderation: event.request_moderation,
            created_on,
            published_on: None,
            state: EventState::Pending,
            confirmed_requests: 0,
        };
        tables.events.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn find_by_id_and_initiator(&self, id: i64, initiator_id: i64) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).filter(|e| e.initiator_id == initiator_id).cloned())
    }

    async fn find_published(&self, id: i64) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).filter(|e| e.state == EventState::Published).cloned())
    }

    async fn save(&self, event: &Event) -> Result<Event> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or(EwmError::EventNotFound { event_id: event.id })?;
        // The confirmed counter is owned by the request side
        let confirmed = stored.confirmed_requests;
        *stored = event.clone();
        stored.confirmed_requests = confirmed;
        Ok(stored.clone())
    }

    async fn find_by_initiator(&self, initiator_id: i64, page: Page) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .filter(|e| e.initiator_id == initiator_id)
            .cloned()
            .collect();
        Ok(page.apply(events))
    }

    async fn find_by_filter(&self, filter: &EventFilter, page: Page) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        if filter.sort == EventSort::EventDate {
            events.sort_by_key(|e| (e.event_date, e.id));
        }
        Ok(page.apply(events))
    }

    async fn exists_with_category(&self, category_id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.events.values().any(|e| e.category_id == category_id))
    }
}

#[async_trait]
impl RequestStore for InMemoryDatabase {
    async fn create(&self, request: NewParticipationRequest) -> Result<ParticipationRequest> {
        self.tables.write().await.insert_request(request)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<ParticipationRequest>> {
        let tables = self.tables.read().await;
        Ok(tables.requests.values().filter(|r| r.event_id == event_id).cloned().collect())
    }

    async fn find_by_requester(&self, requester_id: i64) -> Result<Vec<ParticipationRequest>> {
        let tables = self.tables.read().await;
        Ok(tables.requests.values().filter(|r| r.requester_id == requester_id).cloned().collect())
    }

    async fn find_by_event_and_requester(&self, event_id: i64, requester_id: i64) -> Result<Option<ParticipationRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .find(|r| r.event_id == event_id && r.requester_id == requester_id)
            .cloned())
    }

    async fn save(&self, request: &ParticipationRequest) -> Result<ParticipationRequest> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .requests
            .get_mut(&request.id)
            .ok_or(EwmError::RequestNotFound { request_id: request.id })?;
        stored.status = request.status;
        let saved = stored.clone();
        tables.sync_confirmed_counter(saved.event_id);
        Ok(saved)
    }

    async fn count_confirmed(&self, event_id: i64) -> Result<i64> {
        Ok(self.tables.read().await.confirmed_count(event_id))
    }

    async fn count_confirmed_by_events(&self, event_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for request in tables.requests.values() {
            if request.status == RequestStatus::Confirmed && event_ids.contains(&request.event_id) {
                *counts.entry(request.event_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn moderate(&self, event_id: i64, decide: Decision<'_>) -> Result<RequestStatusUpdateResult> {
        let mut tables = self.tables.write().await;
        let (event, requests) = tables.snapshot(event_id)?;

        let result = decide(&event, &requests)?;

        for request in result.mutated() {
            if let Some(stored) = tables.requests.get_mut(&request.id) {
                stored.status = request.status;
            }
        }
        tables.sync_confirmed_counter(event_id);

        Ok(result)
    }

    async fn submit(&self, event_id: i64, requester_id: i64, admit: Admission<'_>) -> Result<ParticipationRequest> {
        let mut tables = self.tables.write().await;
        let (event, requests) = tables.snapshot(event_id)?;

        let status = admit(&event, &requests)?;
        tables.insert_request(NewParticipationRequest { requester_id, event_id, status })
    }
}

#[async_trait]
impl CommentStore for InMemoryDatabase {
    async fn create(&self, comment: NewCommentRecord) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let created = Comment {
            id,
            text: comment.text,
            event_id: comment.event_id,
            author_id: comment.author_id,
            created: comment.created,
            edited: None,
        };
        tables.comments.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: &Comment) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&comment.id).map(|stored| {
            stored.text = comment.text.clone();
            stored.edited = comment.edited;
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.comments.remove(&id).is_some();
        tables.reports.retain(|_, r| r.comment_id != id);
        Ok(removed)
    }

    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables.comments.values().filter(|c| c.event_id == event_id).cloned().collect();
        comments.sort_by_key(|c| (c.created, c.id));
        Ok(page.apply(comments))
    }

    async fn find_by_event_and_author(&self, event_id: i64, author_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.event_id == event_id && c.author_id == author_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created, c.id));
        Ok(comments)
    }
}

#[async_trait]
impl ReportStore for InMemoryDatabase {
    async fn create(&self, report: NewCommentReport) -> Result<CommentReport> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .reports
            .values()
            .any(|r| r.comment_id == report.comment_id && r.reporter_id == report.reporter_id);
        if duplicate {
            return Err(EwmError::Conflict("Report of this comment already exists".to_string()));
        }
        let id = tables.next_id();
        let created = CommentReport {
            id,
            comment_id: report.comment_id,
            reporter_id: report.reporter_id,
            reported_user_id: report.reported_user_id,
            created: Utc::now(),
        };
        tables.reports.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_reported_user(&self, user_id: i64) -> Result<Vec<CommentReport>> {
        let tables = self.tables.read().await;
        Ok(tables.reports.values().filter(|r| r.reported_user_id == user_id).cloned().collect())
    }
}
