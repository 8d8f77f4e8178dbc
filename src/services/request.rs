//! Participation request submission
//!
//! The requester side of the join flow. Requests land PENDING unless the
//! event needs no approval, in which case they are confirmed right away.

use std::sync::Arc;
use tracing::info;
use crate::database::{RequestStore, UserStore};
use crate::models::event::Event;
use crate::models::request::{ParticipationRequest, RequestStatus};
use crate::moderation::admit;
use crate::utils::errors::{EwmError, Result};

#[derive(Clone)]
pub struct RequestService {
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
}

impl RequestService {
    pub fn new(users: Arc<dyn UserStore>, requests: Arc<dyn RequestStore>) -> Self {
        Self { users, requests }
    }

    async fn ensure_user(&self, user_id: i64) -> Result<()> {
        if !self.users.exists_by_id(user_id).await? {
            return Err(EwmError::UserNotFound { user_id });
        }
        Ok(())
    }

    /// Admission is decided and stored atomically per event
    pub async fn submit(&self, user_id: i64, event_id: i64) -> Result<ParticipationRequest> {
        self.ensure_user(user_id).await?;

        let decide = |event: &Event, requests: &[ParticipationRequest]| admit(event, user_id, requests);
        let request = self.requests.submit(event_id, user_id, &decide).await?;
        info!(request_id = request.id, event_id = event_id, status = %request.status, "Participation request submitted");
        Ok(request)
    }

    /// Withdraw an open or confirmed request
    pub async fn cancel(&self, user_id: i64, request_id: i64) -> Result<ParticipationRequest> {
        self.ensure_user(user_id).await?;
        let mut request = self
            .requests
            .find_by_id(request_id)
            .await?
            .filter(|r| r.requester_id == user_id)
            .ok_or(EwmError::RequestNotFound { request_id })?;

        if matches!(request.status, RequestStatus::Canceled | RequestStatus::Rejected) {
            return Err(EwmError::InvalidRequestStatus { request_id, status: request.status });
        }

        request.status = RequestStatus::Canceled;
        let saved = self.requests.save(&request).await?;
        info!(request_id = request_id, user_id = user_id, "Participation request canceled");
        Ok(saved)
    }

    pub async fn get_user_requests(&self, user_id: i64) -> Result<Vec<ParticipationRequest>> {
        self.ensure_user(user_id).await?;
        self.requests.find_by_requester(user_id).await
    }
}
