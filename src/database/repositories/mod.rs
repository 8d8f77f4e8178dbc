//! Database repositories module
//!
//! Each store is an async trait so services can be wired against Postgres in
//! production and the in-memory store in tests.

pub mod user;
pub mod category;
pub mod event;
pub mod request;
pub mod comment;
pub mod report;

// Re-export repositories
pub use user::{UserStore, UserRepository};
pub use category::{CategoryStore, CategoryRepository};
pub use event::{EventStore, EventRepository};
pub use request::{RequestStore, RequestRepository, Admission, Decision};
pub use comment::{CommentStore, CommentRepository};
pub use report::{ReportStore, ReportRepository};

use crate::utils::errors::EwmError;

const UNIQUE_VIOLATION: &str = "23505";

/// Turn a unique-constraint violation into a `Conflict`, pass anything else through
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> EwmError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return EwmError::Conflict(format!("{} already exists", what));
        }
    }
    EwmError::Database(err)
}
