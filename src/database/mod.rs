//! Database module
//!
//! Postgres repositories, the in-memory store used by tests, and the
//! trait-object bundle services are built from.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;

use std::sync::Arc;

pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use memory::InMemoryDatabase;
pub use repositories::{
    Admission, CategoryRepository, CategoryStore, CommentRepository, CommentStore, Decision,
    EventRepository, EventStore, ReportRepository, ReportStore, RequestRepository, RequestStore,
    UserRepository, UserStore,
};
pub use service::DatabaseService;

/// One handle per store, shared by every service
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub events: Arc<dyn EventStore>,
    pub requests: Arc<dyn RequestStore>,
    pub comments: Arc<dyn CommentStore>,
    pub reports: Arc<dyn ReportStore>,
}
