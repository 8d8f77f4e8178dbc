//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod category;
pub mod event;
pub mod request;
pub mod page;
pub mod comment;
pub mod report;

// Re-export commonly used models
pub use user::{User, NewUser, CommentBanAction, CommentBanUpdate};
pub use category::{Category, NewCategory};
pub use event::{
    Event, EventView, EventState, Location, NewEvent, NewEventRecord, EventChanges,
    UpdateEventUserRequest, UpdateEventAdminRequest, UserStateAction, AdminStateAction,
    EventFilter, PublicEventFilter, EventSort,
};
pub use request::{
    ParticipationRequest, NewParticipationRequest, RequestStatus, RequestStatusUpdate,
    RequestStatusUpdateResult,
};
pub use page::Page;
pub use comment::{Comment, CommentShort, NewComment, NewCommentRecord};
pub use report::{CommentReport, NewCommentReport, UserReport};
