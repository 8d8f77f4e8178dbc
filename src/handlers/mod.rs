//! Command handlers
//!
//! Admin CLI commands, each mapped onto a service call and rendered as JSON

pub mod commands;

pub use commands::{handle_command, Command};
