//! Event moderation commands

use serde_json::Value;
use tracing::info;
use crate::models::event::{AdminStateAction, EventFilter, EventState, UpdateEventAdminRequest};
use crate::models::page::Page;
use crate::services::ServiceFactory;
use crate::utils::errors::{EwmError, Result};
use crate::utils::helpers::parse_timestamp;

/// Raw search flags as typed on the command line
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub users: Option<Vec<i64>>,
    pub states: Option<Vec<String>>,
    pub categories: Option<Vec<i64>>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SearchArgs {
    pub fn into_filter(self) -> Result<EventFilter> {
        let states = self
            .states
            .map(|states| {
                states
                    .iter()
                    .map(|s| s.parse::<EventState>().map_err(EwmError::Validation))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(EventFilter {
            initiator_ids: self.users,
            states,
            category_ids: self.categories,
            range_start: self.start.as_deref().map(parse_timestamp).transpose()?,
            range_end: self.end.as_deref().map(parse_timestamp).transpose()?,
            ..Default::default()
        })
    }
}

async fn moderate(services: &ServiceFactory, event_id: i64, action: AdminStateAction) -> Result<Value> {
    let update = UpdateEventAdminRequest {
        state_action: Some(action),
        ..Default::default()
    };
    let view = services.event_service.update_event_by_admin(event_id, update).await?;
    info!(event_id = event_id, state = %view.event.state, "Event moderated from the command line");
    Ok(serde_json::to_value(view)?)
}

pub async fn handle_publish(services: &ServiceFactory, event_id: i64) -> Result<Value> {
    moderate(services, event_id, AdminStateAction::PublishEvent).await
}

pub async fn handle_reject(services: &ServiceFactory, event_id: i64) -> Result<Value> {
    moderate(services, event_id, AdminStateAction::RejectEvent).await
}

pub async fn handle_search(services: &ServiceFactory, args: SearchArgs, page: Page) -> Result<Value> {
    let filter = args.into_filter()?;
    let views = services.event_service.search_events_admin(filter, page).await?;
    Ok(serde_json::to_value(views)?)
}
