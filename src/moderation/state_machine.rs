//! Event publication state machine
//!
//! Only PENDING events move: PUBLISH sets PUBLISHED and stamps
//! `published_on`, CANCEL sets CANCELED. Every other combination is an
//! `InvalidStateTransition` and leaves the event untouched.

use chrono::{DateTime, Utc};
use crate::models::event::{AdminStateAction, Event, EventState, UserStateAction};
use crate::utils::errors::{EwmError, Result};
use super::StateAction;

fn ensure_pending(event: &Event, action: StateAction) -> Result<()> {
    if event.state != EventState::Pending {
        return Err(EwmError::InvalidStateTransition {
            state: event.state,
            action,
        });
    }
    Ok(())
}

/// PUBLISH and CANCEL only; review requests go through [`apply_user_action`]
pub fn apply_state_action(event: &mut Event, action: StateAction, now: DateTime<Utc>) -> Result<()> {
    let target = match action {
        StateAction::Publish => EventState::Published,
        StateAction::Cancel => EventState::Canceled,
        StateAction::SendToReview => {
            return Err(EwmError::InvalidStateTransition {
                state: event.state,
                action,
            })
        }
    };
    ensure_pending(event, action)?;

    event.state = target;
    if target == EventState::Published {
        event.published_on = Some(now);
    }
    Ok(())
}

/// Admin moderation: PUBLISH_EVENT / REJECT_EVENT
pub fn apply_admin_action(event: &mut Event, action: AdminStateAction, now: DateTime<Utc>) -> Result<()> {
    let action = match action {
        AdminStateAction::PublishEvent => StateAction::Publish,
        AdminStateAction::RejectEvent => StateAction::Cancel,
    };
    apply_state_action(event, action, now)
}

/// Initiator edits: SEND_TO_REVIEW keeps the event pending, CANCEL_REVIEW withdraws it
pub fn apply_user_action(event: &mut Event, action: UserStateAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        UserStateAction::SendToReview => ensure_pending(event, StateAction::SendToReview),
        UserStateAction::CancelReview => apply_state_action(event, StateAction::Cancel, now),
    }
}
