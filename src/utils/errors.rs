//! Error handling for ewm-server
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use crate::models::event::EventState;
use crate::models::request::RequestStatus;
use crate::moderation::StateAction;

/// Main error type for ewm-server
#[derive(Error, Debug)]
pub enum EwmError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Stats service error: {0}")]
    Stats(#[from] StatsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User with id={user_id} was not found")]
    UserNotFound { user_id: i64 },

    #[error("Category with id={category_id} was not found")]
    CategoryNotFound { category_id: i64 },

    #[error("Event with id={event_id} was not found")]
    EventNotFound { event_id: i64 },

    #[error("Request with id={request_id} was not found")]
    RequestNotFound { request_id: i64 },

    #[error("Comment with id={comment_id} was not found")]
    CommentNotFound { comment_id: i64 },

    #[error("Report with reported user id={user_id} was not found")]
    ReportNotFound { user_id: i64 },

    #[error("Cannot {action} the event because it's not in the right state: {state}")]
    InvalidStateTransition { state: EventState, action: StateAction },

    #[error("Request with id={request_id} is already {status} and cannot be decided again")]
    InvalidRequestStatus { request_id: i64, status: RequestStatus },

    #[error("The participant limit of {limit} has been reached for event {event_id}")]
    CapacityExceeded { event_id: i64, limit: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Stats service specific errors
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Stats request failed: {0}")]
    RequestFailed(String),

    #[error("Stats request timeout")]
    Timeout,

    #[error("Invalid stats response: {0}")]
    InvalidResponse(String),

    #[error("Stats service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for ewm-server operations
pub type Result<T> = std::result::Result<T, EwmError>;

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidStateTransition,
    InvalidRequestStatus,
    CapacityExceeded,
    Validation,
    Conflict,
    Internal,
}

impl EwmError {
    /// Classify the error for callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            EwmError::UserNotFound { .. }
            | EwmError::CategoryNotFound { .. }
            | EwmError::EventNotFound { .. }
            | EwmError::RequestNotFound { .. }
            | EwmError::CommentNotFound { .. }
            | EwmError::ReportNotFound { .. } => ErrorKind::NotFound,
            EwmError::PermissionDenied(_) => ErrorKind::Forbidden,
            EwmError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            EwmError::InvalidRequestStatus { .. } => ErrorKind::InvalidRequestStatus,
            EwmError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            EwmError::Validation(_) => ErrorKind::Validation,
            EwmError::Conflict(_) => ErrorKind::Conflict,
            _ => ErrorKind::Internal,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EwmError::Database(_) => false,
            EwmError::Migration(_) => false,
            EwmError::Stats(_) => true,
            EwmError::Config(_) => false,
            EwmError::PermissionDenied(_) => false,
            EwmError::UserNotFound { .. } => false,
            EwmError::CategoryNotFound { .. } => false,
            EwmError::EventNotFound { .. } => false,
            EwmError::RequestNotFound { .. } => false,
            EwmError::CommentNotFound { .. } => false,
            EwmError::ReportNotFound { .. } => false,
            EwmError::InvalidStateTransition { .. } => false,
            EwmError::InvalidRequestStatus { .. } => false,
            EwmError::CapacityExceeded { .. } => false,
            EwmError::Validation(_) => false,
            EwmError::Conflict(_) => false,
            EwmError::Http(_) => true,
            EwmError::Serialization(_) => false,
            EwmError::Io(_) => true,
            EwmError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EwmError::Database(_) => ErrorSeverity::Critical,
            EwmError::Migration(_) => ErrorSeverity::Critical,
            EwmError::Config(_) => ErrorSeverity::Critical,
            EwmError::PermissionDenied(_) => ErrorSeverity::Warning,
            EwmError::CapacityExceeded { .. } => ErrorSeverity::Warning,
            EwmError::Validation(_) => ErrorSeverity::Info,
            EwmError::Conflict(_) => ErrorSeverity::Info,
            EwmError::InvalidRequestStatus { .. } => ErrorSeverity::Info,
            EwmError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
