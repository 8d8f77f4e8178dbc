//! Services module
//!
//! Business operations on top of the stores and the stats client

pub mod annotation;
pub mod category;
pub mod comment;
pub mod event;
pub mod report;
pub mod request;
pub mod stats;
pub mod user;

use std::sync::Arc;
use tracing::warn;

pub use annotation::EventAnnotator;
pub use category::CategoryService;
pub use comment::CommentService;
pub use event::EventService;
pub use report::ReportService;
pub use request::RequestService;
pub use stats::{EndpointHit, HttpStatsClient, StatsClient, ViewStats};
pub use user::UserService;

use crate::config::Settings;
use crate::database::Stores;
use crate::models::page::Page;
use crate::utils::helpers::event_uri;

/// Service factory wiring every service from one set of stores
#[derive(Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub request_service: RequestService,
    pub category_service: CategoryService,
    pub user_service: UserService,
    pub comment_service: CommentService,
    pub report_service: ReportService,
    stores: Stores,
    stats: Arc<dyn StatsClient>,
}

impl ServiceFactory {
    pub fn new(settings: Settings, stores: Stores, stats: Arc<dyn StatsClient>) -> Self {
        let event_service = EventService::new(stores.clone(), stats.clone(), settings);
        let request_service = RequestService::new(stores.users.clone(), stores.requests.clone());
        let category_service = CategoryService::new(stores.categories.clone(), stores.events.clone());
        let user_service = UserService::new(stores.users.clone());
        let comment_service = CommentService::new(
            stores.users.clone(),
            stores.events.clone(),
            stores.comments.clone(),
            stores.reports.clone(),
        );
        let report_service = ReportService::new(stores.reports.clone());

        Self {
            event_service,
            request_service,
            category_service,
            user_service,
            comment_service,
            report_service,
            stores,
            stats,
        }
    }

    /// Check the store and the stats service
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let store_healthy = match self.stores.users.list(None, Page { from: 0, size: 1 }).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Store health check failed");
                false
            }
        };
        let stats_healthy = match self.stats.get_views(&event_uri(0)).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Stats health check failed");
                false
            }
        };

        ServiceHealthStatus { store_healthy, stats_healthy }
    }
}

/// Health status for the service dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub store_healthy: bool,
    pub stats_healthy: bool,
}

impl ServiceHealthStatus {
    /// The store is critical; stats only degrade view counts
    pub fn is_healthy(&self) -> bool {
        self.store_healthy
    }

    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.store_healthy {
            issues.push("Store unavailable".to_string());
        }
        if !self.stats_healthy {
            issues.push("Stats service unavailable".to_string());
        }
        issues
    }
}
