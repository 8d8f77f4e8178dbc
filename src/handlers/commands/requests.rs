//! Participation request commands

use serde_json::Value;
use crate::models::request::{RequestStatus, RequestStatusUpdate};
use crate::services::ServiceFactory;
use crate::utils::errors::{EwmError, Result};

pub async fn handle_requests(services: &ServiceFactory, user_id: i64, event_id: i64) -> Result<Value> {
    let requests = services.event_service.get_event_requests(user_id, event_id).await?;
    Ok(serde_json::to_value(requests)?)
}

pub async fn handle_approve(
    services: &ServiceFactory,
    user_id: i64,
    event_id: i64,
    status: &str,
    request_ids: Vec<i64>,
) -> Result<Value> {
    let status: RequestStatus = status.parse().map_err(EwmError::Validation)?;
    let update = RequestStatusUpdate { request_ids, status };
    let result = services.event_service.approve_requests(user_id, event_id, update).await?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::handlers::commands::events::handle_publish;
    use crate::handlers::commands::test_support::seeded;
    use crate::models::user::NewUser;

    #[tokio::test]
    async fn test_approve_through_command() {
        let (services, stores, event) = seeded().await;
        handle_publish(&services, event.id).await.unwrap();

        let guest = stores
            .users
            .create(NewUser { name: "Guest".to_string(), email: "guest@example.com".to_string() })
            .await
            .unwrap();
        let request = services.request_service.submit(guest.id, event.id).await.unwrap();

        let value = handle_approve(&services, event.initiator_id, event.id, "confirmed", vec![request.id])
            .await
            .unwrap();
        assert_eq!(value["confirmedRequests"][0]["id"], request.id);

        let listed = handle_requests(&services, event.initiator_id, event.id).await.unwrap();
        assert_eq!(listed[0]["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (services, _, event) = seeded().await;
        let err = handle_approve(&services, event.initiator_id, event.id, "maybe", vec![1])
            .await
            .unwrap_err();
        assert_matches!(err, EwmError::Validation(_));
    }
}
