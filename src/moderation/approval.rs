//! Participation request approval
//!
//! Decides a batch of requests for one event. Checks run in a fixed order
//! and the first failure aborts the whole batch, so the returned result is
//! the complete set of mutations or nothing:
//!
//! 1. the caller must be the initiator
//! 2. the desired status must be CONFIRMED or REJECTED
//! 3. unlimited or unmoderated events short-circuit to an empty result
//! 4. every id must belong to the event
//! 5. every targeted request must still be PENDING
//! 6. the event must not already be at capacity
//!
//! Confirmation walks the ids in caller order and rejects whatever no
//! longer fits under the participant limit.

use std::collections::{HashMap, HashSet};
use crate::models::event::Event;
use crate::models::request::{
    ParticipationRequest, RequestStatus, RequestStatusUpdate, RequestStatusUpdateResult,
};
use crate::utils::errors::{EwmError, Result};

pub fn approve(
    event: &Event,
    initiator_id: i64,
    requests: &[ParticipationRequest],
    update: &RequestStatusUpdate,
) -> Result<RequestStatusUpdateResult> {
    if event.initiator_id != initiator_id {
        return Err(EwmError::PermissionDenied(format!(
            "User with id={} is not the initiator of event with id={}",
            initiator_id, event.id
        )));
    }

    if !matches!(update.status, RequestStatus::Confirmed | RequestStatus::Rejected) {
        return Err(EwmError::Validation(format!(
            "Requests can only be CONFIRMED or REJECTED, got {}",
            update.status
        )));
    }

    if !event.requires_approval() {
        return Ok(RequestStatusUpdateResult::default());
    }

    let by_id: HashMap<i64, &ParticipationRequest> = requests
        .iter()
        .filter(|request| request.event_id == event.id)
        .map(|request| (request.id, request))
        .collect();

    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(update.request_ids.len());
    for &request_id in &update.request_ids {
        if !seen.insert(request_id) {
            continue;
        }
        let request = by_id
            .get(&request_id)
            .ok_or(EwmError::RequestNotFound { request_id })?;
        targets.push(*request);
    }

    if let Some(decided) = targets.iter().find(|request| request.status.is_terminal()) {
        return Err(EwmError::InvalidRequestStatus {
            request_id: decided.id,
            status: decided.status,
        });
    }

    let limit = event.participant_limit as i64;
    let mut confirmed = requests
        .iter()
        .filter(|request| request.event_id == event.id && request.status == RequestStatus::Confirmed)
        .count() as i64;
    if confirmed >= limit {
        return Err(EwmError::CapacityExceeded {
            event_id: event.id,
            limit: event.participant_limit,
        });
    }

    let mut result = RequestStatusUpdateResult::default();
    for request in targets {
        let mut decided = request.clone();
        if update.status == RequestStatus::Confirmed && confirmed < limit {
            decided.status = RequestStatus::Confirmed;
            confirmed += 1;
            result.confirmed_requests.push(decided);
        } else {
            decided.status = RequestStatus::Rejected;
            result.rejected_requests.push(decided);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use crate::models::event::{EventState, Location};

    const INITIATOR: i64 = 1;

    fn event_with_limit(limit: i32) -> Event {
        let now = Utc::now();
        Event {
            id: 42,
            title: "Hackathon".to_string(),
            annotation: "48 hours of code".to_string(),
            description: "Teams of four".to_string(),
            category_id: 2,
            initiator_id: INITIATOR,
            event_date: now + Duration::days(10),
            location: Location { lat: 59.93, lon: 30.33 },
            paid: false,
            participant_limit: limit,
            request_moderation: true,
            created_on: now,
            published_on: Some(now),
            state: EventState::Published,
            confirmed_requests: 0,
        }
    }

    fn request(id: i64, status: RequestStatus) -> ParticipationRequest {
        ParticipationRequest {
            id,
            requester_id: 100 + id,
            event_id: 42,
            created: Utc::now(),
            status,
        }
    }

    fn pending(ids: &[i64]) -> Vec<ParticipationRequest> {
        ids.iter().map(|&id| request(id, RequestStatus::Pending)).collect()
    }

    fn update(ids: &[i64], status: RequestStatus) -> RequestStatusUpdate {
        RequestStatusUpdate { request_ids: ids.to_vec(), status }
    }

    fn ids(requests: &[ParticipationRequest]) -> Vec<i64> {
        requests.iter().map(|request| request.id).collect()
    }

    #[test]
    fn test_overflow_is_rejected_in_input_order() {
        let event = event_with_limit(3);
        let requests = pending(&[1, 2, 3, 4, 5]);

        let result = approve(&event, INITIATOR, &requests, &update(&[5, 3, 1, 2, 4], RequestStatus::Confirmed)).unwrap();

        assert_eq!(ids(&result.confirmed_requests), vec![5, 3, 1]);
        assert_eq!(ids(&result.rejected_requests), vec![2, 4]);
        assert!(result.confirmed_requests.iter().all(|r| r.status == RequestStatus::Confirmed));
        assert!(result.rejected_requests.iter().all(|r| r.status == RequestStatus::Rejected));
    }

    #[test]
    fn test_second_decision_on_same_ids_fails() {
        let event = event_with_limit(3);
        let requests = pending(&[1, 2, 3, 4, 5]);
        let batch = update(&[1, 2, 3, 4, 5], RequestStatus::Confirmed);
        let first = approve(&event, INITIATOR, &requests, &batch).unwrap();

        let decided: Vec<ParticipationRequest> = first.mutated().cloned().collect();
        let err = approve(&event, INITIATOR, &decided, &batch).unwrap_err();
        assert_matches!(err, EwmError::InvalidRequestStatus { request_id: 1, status: RequestStatus::Confirmed });
    }

    #[test]
    fn test_full_event_fails_with_capacity_exceeded() {
        let event = event_with_limit(2);
        let mut requests = vec![request(1, RequestStatus::Confirmed), request(2, RequestStatus::Confirmed)];
        requests.extend(pending(&[3, 4]));

        let err = approve(&event, INITIATOR, &requests, &update(&[3, 4], RequestStatus::Confirmed)).unwrap_err();
        assert_matches!(err, EwmError::CapacityExceeded { event_id: 42, limit: 2 });
    }

    #[test]
    fn test_unlimited_event_short_circuits() {
        let event = event_with_limit(0);
        let result = approve(&event, INITIATOR, &pending(&[1]), &update(&[1, 999], RequestStatus::Confirmed)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unmoderated_event_short_circuits() {
        let mut event = event_with_limit(5);
        event.request_moderation = false;
        let result = approve(&event, INITIATOR, &pending(&[1]), &update(&[1], RequestStatus::Rejected)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_id_is_named() {
        let event = event_with_limit(5);
        let err = approve(&event, INITIATOR, &pending(&[1, 2]), &update(&[1, 77, 2], RequestStatus::Confirmed)).unwrap_err();
        assert_matches!(err, EwmError::RequestNotFound { request_id: 77 });
    }

    #[test]
    fn test_request_of_other_event_is_not_found() {
        let event = event_with_limit(5);
        let mut foreign = request(9, RequestStatus::Pending);
        foreign.event_id = 43;
        let err = approve(&event, INITIATOR, &[foreign], &update(&[9], RequestStatus::Confirmed)).unwrap_err();
        assert_matches!(err, EwmError::RequestNotFound { request_id: 9 });
    }

    #[test]
    fn test_non_initiator_is_denied() {
        let event = event_with_limit(5);
        let err = approve(&event, 2, &pending(&[1]), &update(&[1], RequestStatus::Confirmed)).unwrap_err();
        assert_matches!(err, EwmError::PermissionDenied(_));
    }

    #[test]
    fn test_reject_marks_every_target() {
        let event = event_with_limit(1);
        let result = approve(&event, INITIATOR, &pending(&[1, 2, 3]), &update(&[2, 3], RequestStatus::Rejected)).unwrap();
        assert!(result.confirmed_requests.is_empty());
        assert_eq!(ids(&result.rejected_requests), vec![2, 3]);
    }

    #[test]
    fn test_canceled_request_cannot_be_decided() {
        let event = event_with_limit(5);
        let requests = vec![request(1, RequestStatus::Pending), request(2, RequestStatus::Canceled)];
        let err = approve(&event, INITIATOR, &requests, &update(&[1, 2], RequestStatus::Rejected)).unwrap_err();
        assert_matches!(err, EwmError::InvalidRequestStatus { request_id: 2, status: RequestStatus::Canceled });
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let event = event_with_limit(5);
        let err = approve(&event, INITIATOR, &pending(&[1]), &update(&[1], RequestStatus::Pending)).unwrap_err();
        assert_matches!(err, EwmError::Validation(_));
    }

    #[test]
    fn test_duplicate_ids_are_decided_once() {
        let event = event_with_limit(5);
        let result = approve(&event, INITIATOR, &pending(&[1, 2]), &update(&[2, 1, 2], RequestStatus::Confirmed)).unwrap();
        assert_eq!(ids(&result.confirmed_requests), vec![2, 1]);
    }
}
