//! Test helpers module
//!
//! Mock stats server, a recording stats double, fixture builders and a
//! context wiring services over the in-memory store.

#![allow(dead_code)]

pub mod stats_mock;
pub mod test_context;
pub mod test_data;

pub use stats_mock::*;
pub use test_context::*;
pub use test_data::*;
