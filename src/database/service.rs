//! Postgres-backed wiring of every store

use std::sync::Arc;
use crate::database::{
    health_check, CategoryRepository, CommentRepository, DatabasePool, EventRepository,
    ReportRepository, RequestRepository, Stores, UserRepository,
};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub events: EventRepository,
    pub requests: RequestRepository,
    pub comments: CommentRepository,
    pub reports: ReportRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            requests: RequestRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            reports: ReportRepository::new(pool.clone()),
            pool,
        }
    }

    /// Erase the concrete repositories behind the store traits
    pub fn stores(&self) -> Stores {
        Stores {
            users: Arc::new(self.users.clone()),
            categories: Arc::new(self.categories.clone()),
            events: Arc::new(self.events.clone()),
            requests: Arc::new(self.requests.clone()),
            comments: Arc::new(self.comments.clone()),
            reports: Arc::new(self.reports.clone()),
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        health_check(&self.pool).await
    }
}
