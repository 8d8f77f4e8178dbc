//! Event management service
//!
//! Initiator, admin and public operations on events. Every read that leaves
//! the service goes through [`EventAnnotator`] so views and confirmed totals
//! are always fresh.

use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};
use crate::config::Settings;
use crate::database::Stores;
use crate::models::event::{
    Event, EventChanges, EventFilter, EventView, NewEvent, NewEventRecord, PublicEventFilter,
    UpdateEventAdminRequest, UpdateEventUserRequest, EventState,
};
use crate::models::comment::CommentShort;
use crate::models::page::Page;
use crate::models::request::{ParticipationRequest, RequestStatusUpdate, RequestStatusUpdateResult};
use crate::moderation::{apply_admin_action, apply_user_action, approve};
use crate::utils::errors::{EwmError, Result};
use crate::utils::helpers::{ensure_lead_time, event_uri};
use crate::utils::logging::{log_admin_action, log_event_action, log_moderation_decision};
use super::annotation::EventAnnotator;
use super::stats::{EndpointHit, StatsClient};

const SEARCH_URI: &str = "/events";

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(EwmError::Validation(format!(
            "Field: {}. Error: length must be between {} and {}. Value: {}",
            field, min, max, len
        )));
    }
    Ok(())
}

fn check_limit(limit: i32) -> Result<()> {
    if limit < 0 {
        return Err(EwmError::Validation(format!(
            "Field: participantLimit. Error: must not be negative. Value: {}",
            limit
        )));
    }
    Ok(())
}

fn validate_new_event(event: &NewEvent) -> Result<()> {
    check_length("title", &event.title, 3, 120)?;
    check_length("annotation", &event.annotation, 20, 2000)?;
    check_length("description", &event.description, 20, 7000)?;
    check_limit(event.participant_limit)
}

fn validate_changes(changes: &EventChanges) -> Result<()> {
    if let Some(title) = &changes.title {
        check_length("title", title, 3, 120)?;
    }
    if let Some(annotation) = &changes.annotation {
        check_length("annotation", annotation, 20, 2000)?;
    }
    if let Some(description) = &changes.description {
        check_length("description", description, 20, 7000)?;
    }
    if let Some(limit) = changes.participant_limit {
        check_limit(limit)?;
    }
    Ok(())
}

fn validate_range(filter: &EventFilter) -> Result<()> {
    if let (Some(start), Some(end)) = (filter.range_start, filter.range_end) {
        if start > end {
            return Err(EwmError::Validation("rangeStart must not be after rangeEnd".to_string()));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct EventService {
    stores: Stores,
    stats: Arc<dyn StatsClient>,
    annotator: EventAnnotator,
    settings: Settings,
}

impl EventService {
    pub fn new(stores: Stores, stats: Arc<dyn StatsClient>, settings: Settings) -> Self {
        let annotator = EventAnnotator::new(stores.requests.clone(), stats.clone());
        Self {
            stores,
            stats,
            annotator,
            settings,
        }
    }

    async fn ensure_user(&self, user_id: i64) -> Result<()> {
        if !self.stores.users.exists_by_id(user_id).await? {
            return Err(EwmError::UserNotFound { user_id });
        }
        Ok(())
    }

    async fn ensure_category(&self, category_id: i64) -> Result<()> {
        if !self.stores.categories.exists_by_id(category_id).await? {
            return Err(EwmError::CategoryNotFound { category_id });
        }
        Ok(())
    }

    async fn initiator_event(&self, user_id: i64, event_id: i64) -> Result<Event> {
        self.stores
            .events
            .find_by_id_and_initiator(event_id, user_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })
    }

    /// A new limit may not drop below the participants already confirmed
    async fn ensure_limit_covers_confirmed(&self, event_id: i64, changes: &EventChanges) -> Result<()> {
        let Some(limit) = changes.participant_limit.filter(|limit| *limit > 0) else {
            return Ok(());
        };
        let confirmed = self.stores.requests.count_confirmed(event_id).await?;
        if confirmed > limit as i64 {
            return Err(EwmError::Conflict(format!(
                "The participant limit {} is below the {} confirmed participant(s)",
                limit, confirmed
            )));
        }
        Ok(())
    }

    async fn record_hit(&self, uri: String, ip: &str) -> Result<()> {
        let hit = EndpointHit {
            app: self.settings.app.name.clone(),
            uri,
            ip: ip.to_string(),
            timestamp: Utc::now(),
        };
        self.stats.record_hit(&hit).await
    }

    /// Create a PENDING event owned by `user_id`
    pub async fn add_event(&self, user_id: i64, event: NewEvent) -> Result<EventView> {
        self.ensure_user(user_id).await?;
        self.ensure_category(event.category_id).await?;
        validate_new_event(&event)?;

        let now = Utc::now();
        ensure_lead_time(event.event_date, now, self.settings.events.user_min_lead_hours)?;

        let created = self
            .stores
            .events
            .create(NewEventRecord { event, initiator_id: user_id, created_on: now })
            .await?;
        log_event_action(created.id, "create", user_id, Some(created.title.as_str()));

        Ok(EventView::new(created, 0))
    }

    pub async fn get_user_events(&self, user_id: i64, page: Page) -> Result<Vec<EventView>> {
        self.ensure_user(user_id).await?;
        let events = self.stores.events.find_by_initiator(user_id, page).await?;
        self.annotator.annotate(events).await
    }

    /// The initiator's own view also carries the comments they left on the event
    pub async fn get_user_event(&self, user_id: i64, event_id: i64) -> Result<EventView> {
        self.ensure_user(user_id).await?;
        let event = self.initiator_event(user_id, event_id).await?;
        let mut view = self.annotator.annotate_one(event).await?;
        view.comments = self
            .stores
            .comments
            .find_by_event_and_author(event_id, user_id)
            .await?
            .into_iter()
            .map(CommentShort::from)
            .collect();
        Ok(view)
    }

    /// Initiator edit; published events are frozen
    pub async fn update_event_by_user(
        &self,
        user_id: i64,
        event_id: i64,
        update: UpdateEventUserRequest,
    ) -> Result<EventView> {
        self.ensure_user(user_id).await?;
        let now = Utc::now();
        if let Some(event_date) = update.changes.event_date {
            ensure_lead_time(event_date, now, self.settings.events.user_min_lead_hours)?;
        }

        let mut event = self.initiator_event(user_id, event_id).await?;
        if event.state == EventState::Published {
            return Err(EwmError::Conflict(
                "The event cannot be updated because it has already been published".to_string(),
            ));
        }
        if let Some(category_id) = update.changes.category_id {
            self.ensure_category(category_id).await?;
        }
        validate_changes(&update.changes)?;
        self.ensure_limit_covers_confirmed(event_id, &update.changes).await?;

        update.changes.apply_to(&mut event);
        if let Some(action) = update.state_action {
            apply_user_action(&mut event, action, now)?;
        }

        let saved = self.stores.events.save(&event).await?;
        log_event_action(saved.id, "update", user_id, Some(saved.state.as_str()));
        self.annotator.annotate_one(saved).await
    }

    pub async fn search_events_admin(&self, filter: EventFilter, page: Page) -> Result<Vec<EventView>> {
        validate_range(&filter)?;
        let events = self.stores.events.find_by_filter(&filter, page).await?;
        debug!(found = events.len(), "Admin event search");
        self.annotator.annotate(events).await
    }

    /// Admin edit and moderation through PUBLISH_EVENT / REJECT_EVENT
    pub async fn update_event_by_admin(&self, event_id: i64, update: UpdateEventAdminRequest) -> Result<EventView> {
        let now = Utc::now();
        if let Some(event_date) = update.changes.event_date {
            ensure_lead_time(event_date, now, self.settings.events.admin_min_lead_hours)?;
        }

        let mut event = self
            .stores
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })?;

        if event.state == EventState::Published && !update.changes.is_empty() {
            return Err(EwmError::Conflict(
                "The event cannot be changed because it has already been published".to_string(),
            ));
        }
        if let Some(action) = update.state_action {
            apply_admin_action(&mut event, action, now)?;
        }
        if let Some(category_id) = update.changes.category_id {
            self.ensure_category(category_id).await?;
        }
        validate_changes(&update.changes)?;
        self.ensure_limit_covers_confirmed(event_id, &update.changes).await?;
        update.changes.apply_to(&mut event);

        let saved = self.stores.events.save(&event).await?;
        log_admin_action(
            "update_event",
            Some(event_id.to_string().as_str()),
            Some(saved.state.as_str()),
        );
        self.annotator.annotate_one(saved).await
    }

    /// Requests submitted to an event, visible to its initiator only
    pub async fn get_event_requests(&self, user_id: i64, event_id: i64) -> Result<Vec<ParticipationRequest>> {
        self.ensure_user(user_id).await?;
        let event = self
            .stores
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })?;
        if event.initiator_id != user_id {
            return Err(EwmError::PermissionDenied(format!(
                "User with id={} is not the initiator of event with id={}",
                user_id, event_id
            )));
        }
        self.stores.requests.find_by_event(event_id).await
    }

    /// Confirm or reject a batch of requests in one atomic step
    pub async fn approve_requests(
        &self,
        user_id: i64,
        event_id: i64,
        update: RequestStatusUpdate,
    ) -> Result<RequestStatusUpdateResult> {
        self.ensure_user(user_id).await?;

        let decide = |event: &Event, requests: &[ParticipationRequest]| approve(event, user_id, requests, &update);
        let result = self.stores.requests.moderate(event_id, &decide).await?;

        log_moderation_decision(event_id, user_id, &result);
        Ok(result)
    }

    /// Public read of a published event; the access is recorded as a hit
    pub async fn get_public_event(&self, event_id: i64, ip: &str) -> Result<EventView> {
        self.record_hit(event_uri(event_id), ip).await?;
        let event = self
            .stores
            .events
            .find_published(event_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })?;
        self.annotator.annotate_one(event).await
    }

    pub async fn search_events_public(&self, filter: PublicEventFilter, page: Page, ip: &str) -> Result<Vec<EventView>> {
        self.record_hit(SEARCH_URI.to_string(), ip).await?;

        let filter = filter.into_filter(Utc::now());
        validate_range(&filter)?;
        let events = self.stores.events.find_by_filter(&filter, page).await?;
        info!(found = events.len(), "Public event search");
        self.annotator.annotate(events).await
    }
}
