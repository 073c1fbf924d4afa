//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for timestamps, raw orders, and pending orders.
//! - [`report`] - Scripted [`RawOrderSource`](crate::port::outbound::report::RawOrderSource)
//!   and a failing report store.
//! - [`ledger`] - In-memory menu catalog and order ledger.
//! - [`db`] - In-memory SQLite pools and seeding helpers.
//! - [`config`] - Canonical TOML configurations.

pub mod config;
pub mod db;
pub mod domain;
pub mod ledger;
pub mod report;
