//! Shared helpers for the backend test suites: one-time logging setup and
//! unique identifiers for players and connections.

pub mod logging;
pub mod unique_helpers;
