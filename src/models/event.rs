//! Event model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::models::comment::CommentShort;

/// Event lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "event_state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    Pending,
    Published,
    Canceled,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Pending => "PENDING",
            EventState::Published => "PUBLISHED",
            EventState::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(EventState::Pending),
            "PUBLISHED" => Ok(EventState::Published),
            "CANCELED" => Ok(EventState::Canceled),
            other => Err(format!("Unknown event state: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub annotation: String,
    pub description: String,
    pub category_id: i64,
    pub initiator_id: i64,
    pub event_date: DateTime<Utc>,
    #[sqlx(flatten)]
    pub location: Location,
    pub paid: bool,
    pub participant_limit: i32,
    pub request_moderation: bool,
    pub created_on: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub state: EventState,
    pub confirmed_requests: i64,
}

impl Event {
    /// Unlimited events and events without moderation never go through approval
    pub fn requires_approval(&self) -> bool {
        self.participant_limit > 0 && self.request_moderation
    }

    pub fn has_free_slots(&self, confirmed: i64) -> bool {
        self.participant_limit == 0 || confirmed < self.participant_limit as i64
    }
}

/// Event as returned to clients, with views and a freshly counted confirmed total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub views: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentShort>,
}

impl EventView {
    pub fn new(event: Event, views: i64) -> Self {
        Self { event, views, comments: Vec::new() }
    }
}

/// Event payload submitted by an initiator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub annotation: String,
    pub description: String,
    pub category_id: i64,
    pub event_date: DateTime<Utc>,
    pub location: Location,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub participant_limit: i32,
    #[serde(default = "default_request_moderation")]
    pub request_moderation: bool,
}

fn default_request_moderation() -> bool {
    true
}

/// Fully resolved event row to insert
#[derive(Debug, Clone)]
pub struct NewEventRecord {
    pub event: NewEvent,
    pub initiator_id: i64,
    pub created_on: DateTime<Utc>,
}

/// Initiator-side state actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStateAction {
    SendToReview,
    CancelReview,
}

/// Admin-side state actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStateAction {
    PublishEvent,
    RejectEvent,
}

impl std::str::FromStr for AdminStateAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUBLISH_EVENT" | "PUBLISH" => Ok(AdminStateAction::PublishEvent),
            "REJECT_EVENT" | "CANCEL" => Ok(AdminStateAction::RejectEvent),
            other => Err(format!("Unknown admin state action: {}", other)),
        }
    }
}

/// Partial update shared by initiator and admin edits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub annotation: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.annotation.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.event_date.is_none()
            && self.location.is_none()
            && self.paid.is_none()
            && self.participant_limit.is_none()
            && self.request_moderation.is_none()
    }

    /// Copy every provided field onto the event
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(annotation) = &self.annotation {
            event.annotation = annotation.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            event.category_id = category_id;
        }
        if let Some(event_date) = self.event_date {
            event.event_date = event_date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(paid) = self.paid {
            event.paid = paid;
        }
        if let Some(limit) = self.participant_limit {
            event.participant_limit = limit;
        }
        if let Some(moderation) = self.request_moderation {
            event.request_moderation = moderation;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventUserRequest {
    #[serde(flatten)]
    pub changes: EventChanges,
    pub state_action: Option<UserStateAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventAdminRequest {
    #[serde(flatten)]
    pub changes: EventChanges,
    pub state_action: Option<AdminStateAction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSort {
    EventDate,
    #[default]
    Id,
}

/// Criteria for the single filtered event query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub initiator_ids: Option<Vec<i64>>,
    pub states: Option<Vec<EventState>>,
    pub category_ids: Option<Vec<i64>>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub paid: Option<bool>,
    #[serde(default)]
    pub only_available: bool,
    #[serde(default)]
    pub sort: EventSort,
}

impl EventFilter {
    /// Check an event against the criteria; mirrors the SQL built by the Postgres store
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ids) = self.initiator_ids.as_ref().filter(|ids| !ids.is_empty()) {
            if !ids.contains(&event.initiator_id) {
                return false;
            }
        }
        if let Some(states) = self.states.as_ref().filter(|states| !states.is_empty()) {
            if !states.contains(&event.state) {
                return false;
            }
        }
        if let Some(ids) = self.category_ids.as_ref().filter(|ids| !ids.is_empty()) {
            if !ids.contains(&event.category_id) {
                return false;
            }
        }
        if let Some(start) = self.range_start {
            if event.event_date <= start {
                return false;
            }
        }
        if let Some(end) = self.range_end {
            if event.event_date >= end {
                return false;
            }
        }
        if let Some(text) = self.text.as_ref().filter(|text| !text.is_empty()) {
            let needle = text.to_lowercase();
            if !event.annotation.to_lowercase().contains(&needle)
                && !event.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(paid) = self.paid {
            if event.paid != paid {
                return false;
            }
        }
        if self.only_available && !event.has_free_slots(event.confirmed_requests) {
            return false;
        }
        true
    }
}

/// Public search parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicEventFilter {
    pub text: Option<String>,
    pub category_ids: Option<Vec<i64>>,
    pub paid: Option<bool>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub only_available: bool,
    #[serde(default)]
    pub sort: EventSort,
}

impl PublicEventFilter {
    /// Narrow to published events, defaulting to future events when no range is given
    pub fn into_filter(self, now: DateTime<Utc>) -> EventFilter {
        let range_start = if self.range_start.is_none() && self.range_end.is_none() {
            Some(now)
        } else {
            self.range_start
        };

        EventFilter {
            initiator_ids: None,
            states: Some(vec![EventState::Published]),
            category_ids: self.category_ids,
            range_start,
            range_end: self.range_end,
            text: self.text,
            paid: self.paid,
            only_available: self.only_available,
            sort: self.sort,
        }
    }
}
