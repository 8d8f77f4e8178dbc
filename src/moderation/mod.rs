//! Moderation rules
//!
//! Pure decision logic for event publication, participation request
//! admission and approval. Nothing here touches storage; services load the
//! inputs, run these functions and persist the outcome.

pub mod state_machine;
pub mod approval;
pub mod admission;

use std::fmt;
use serde::{Deserialize, Serialize};

pub use state_machine::{apply_state_action, apply_admin_action, apply_user_action};
pub use approval::approve;
pub use admission::admit;

/// Transition requested on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateAction {
    Publish,
    Cancel,
    SendToReview,
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Publish => f.write_str("PUBLISH"),
            StateAction::Cancel => f.write_str("CANCEL"),
            StateAction::SendToReview => f.write_str("SEND_TO_REVIEW"),
        }
    }
}
