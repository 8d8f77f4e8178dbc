//! Participation request admission
//!
//! Decides the status a new request starts in, given the event and every
//! request already attached to it.

use crate::models::event::{Event, EventState};
use crate::models::request::{ParticipationRequest, RequestStatus};
use crate::utils::errors::{EwmError, Result};

pub fn admit(event: &Event, requester_id: i64, requests: &[ParticipationRequest]) -> Result<RequestStatus> {
    if event.initiator_id == requester_id {
        return Err(EwmError::Conflict("The initiator cannot request to join their own event".to_string()));
    }
    if event.state != EventState::Published {
        return Err(EwmError::Conflict("Cannot participate in an unpublished event".to_string()));
    }
    if requests.iter().any(|r| r.requester_id == requester_id) {
        return Err(EwmError::Conflict("Participation request already exists".to_string()));
    }

    let confirmed = requests.iter().filter(|r| r.status == RequestStatus::Confirmed).count() as i64;
    if !event.has_free_slots(confirmed) {
        return Err(EwmError::Conflict("The participant limit has been reached".to_string()));
    }

    Ok(if event.requires_approval() {
        RequestStatus::Pending
    } else {
        RequestStatus::Confirmed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use crate::models::event::Location;

    fn published(limit: i32, moderation: bool) -> Event {
        let now = Utc::now();
        Event {
            id: 3,
            title: "Climbing".to_string(),
            annotation: "Bouldering evening for beginners".to_string(),
            description: "Shoes can be rented on site".to_string(),
            category_id: 1,
            initiator_id: 1,
            event_date: now + Duration::days(3),
            location: Location { lat: 0.0, lon: 0.0 },
            paid: false,
            participant_limit: limit,
            request_moderation: moderation,
            created_on: now,
            published_on: Some(now),
            state: EventState::Published,
            confirmed_requests: 0,
        }
    }

    fn request(id: i64, requester_id: i64, status: RequestStatus) -> ParticipationRequest {
        ParticipationRequest { id, requester_id, event_id: 3, created: Utc::now(), status }
    }

    #[test]
    fn test_status_follows_approval_rules() {
        assert_eq!(admit(&published(2, true), 5, &[]).unwrap(), RequestStatus::Pending);
        assert_eq!(admit(&published(2, false), 5, &[]).unwrap(), RequestStatus::Confirmed);
        assert_eq!(admit(&published(0, true), 5, &[]).unwrap(), RequestStatus::Confirmed);
    }

    #[test]
    fn test_full_event_turns_requests_away() {
        let existing = [request(1, 7, RequestStatus::Confirmed), request(2, 8, RequestStatus::Pending)];
        let err = admit(&published(1, false), 5, &existing).unwrap_err();
        assert_matches!(err, EwmError::Conflict(msg) if msg.contains("limit"));
    }

    #[test]
    fn test_initiator_and_duplicates_are_conflicts() {
        let existing = [request(1, 5, RequestStatus::Canceled)];
        assert_matches!(admit(&published(0, false), 1, &[]), Err(EwmError::Conflict(_)));
        assert_matches!(admit(&published(0, false), 5, &existing), Err(EwmError::Conflict(_)));
    }

    #[test]
    fn test_unpublished_event_is_closed() {
        let mut event = published(0, false);
        event.state = EventState::Pending;
        assert_matches!(admit(&event, 5, &[]), Err(EwmError::Conflict(_)));
    }
}
