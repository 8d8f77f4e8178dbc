//! Report lookup for moderators

use std::sync::Arc;
use tracing::debug;
use crate::database::ReportStore;
use crate::models::report::UserReport;
use crate::utils::errors::{EwmError, Result};

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportStore>) -> Self {
        Self { reports }
    }

    /// Every report filed against `user_id`'s comments
    pub async fn get_report_by_user_id(&self, user_id: i64) -> Result<UserReport> {
        let reports = self.reports.find_by_reported_user(user_id).await?;
        debug!(user_id = user_id, reports = reports.len(), "Loaded user reports");
        UserReport::fold(user_id, &reports).ok_or(EwmError::ReportNotFound { user_id })
    }
}
