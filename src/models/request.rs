//! Participation request model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Confirmed => "CONFIRMED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Canceled => "CANCELED",
        }
    }

    /// Terminal requests cannot be re-decided by the approval workflow
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "CONFIRMED" => Ok(RequestStatus::Confirmed),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "CANCELED" => Ok(RequestStatus::Canceled),
            other => Err(format!("Unknown request status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParticipationRequest {
    pub id: i64,
    pub requester_id: i64,
    pub event_id: i64,
    pub created: DateTime<Utc>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone)]
pub struct NewParticipationRequest {
    pub requester_id: i64,
    pub event_id: i64,
    pub status: RequestStatus,
}

/// Initiator's batch decision over requests of one event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusUpdate {
    pub request_ids: Vec<i64>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusUpdateResult {
    pub confirmed_requests: Vec<ParticipationRequest>,
    pub rejected_requests: Vec<ParticipationRequest>,
}

impl RequestStatusUpdateResult {
    pub fn is_empty(&self) -> bool {
        self.confirmed_requests.is_empty() && self.rejected_requests.is_empty()
    }

    /// Every mutated request, confirmed first
    pub fn mutated(&self) -> impl Iterator<Item = &ParticipationRequest> {
        self.confirmed_requests.iter().chain(self.rejected_requests.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_is_open() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Confirmed.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_status_update_deserializes_from_wire_shape() {
        let json = r#"{"requestIds": [4, 2, 9], "status": "CONFIRMED"}"#;
        let update: RequestStatusUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.request_ids, vec![4, 2, 9]);
        assert_eq!(update.status, RequestStatus::Confirmed);
    }
}
