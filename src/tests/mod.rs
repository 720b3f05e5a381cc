//! Crate-internal test suites
//!
//! - `common`: shared fixtures
//! - `database`: course storage against a temporary SQLite file
//! - `unit`: provider HTTP behaviour against wiremock servers

mod common;
mod database;
mod unit;
