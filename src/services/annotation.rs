//! View and confirmed-count annotation
//!
//! Turns stored events into [`EventView`]s with one stats call and one
//! confirmed-count query per list, whatever its length.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use crate::database::RequestStore;
use crate::models::event::{Event, EventView};
use crate::utils::errors::Result;
use crate::utils::helpers::{event_uri, parse_event_uri};
use super::stats::StatsClient;

#[derive(Clone)]
pub struct EventAnnotator {
    requests: Arc<dyn RequestStore>,
    stats: Arc<dyn StatsClient>,
}

impl EventAnnotator {
    pub fn new(requests: Arc<dyn RequestStore>, stats: Arc<dyn StatsClient>) -> Self {
        Self { requests, stats }
    }

    /// Annotate a list, preserving its order
    pub async fn annotate(&self, events: Vec<Event>) -> Result<Vec<EventView>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        let uris: Vec<String> = ids.iter().map(|&id| event_uri(id)).collect();

        let views: HashMap<i64, i64> = self
            .stats
            .get_views_batch(&uris)
            .await?
            .into_iter()
            .filter_map(|stat| parse_event_uri(&stat.uri).map(|id| (id, stat.hits)))
            .collect();
        let confirmed = self.requests.count_confirmed_by_events(&ids).await?;

        debug!(events = events.len(), with_views = views.len(), "Annotated event list");

        Ok(events
            .into_iter()
            .map(|mut event| {
                event.confirmed_requests = confirmed.get(&event.id).copied().unwrap_or(0);
                let views = views.get(&event.id).copied().unwrap_or(0);
                EventView::new(event, views)
            })
            .collect())
    }

    pub async fn annotate_one(&self, mut event: Event) -> Result<EventView> {
        let views = self.stats.get_views(&event_uri(event.id)).await?;
        event.confirmed_requests = self.requests.count_confirmed(event.id).await?;
        Ok(EventView::new(event, views))
    }
}
