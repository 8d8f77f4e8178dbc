//! Explore With Me event server
//!
//! Event lifecycle, participation request moderation and view annotation
//! on top of Postgres and an external stats service. The `ewm-server`
//! binary exposes the admin operations as a command line tool.

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod moderation;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EwmError, ErrorKind, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, InMemoryDatabase, Stores};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
