//! Orderdesk - order commits and report materialization for a multi-restaurant
//! ordering platform.
//!
//! Two concerns share one service:
//!
//! - **Reports.** Five aggregate report kinds (order mix, weekly income,
//!   on-time performance, quarter distribution, quarter income) are computed
//!   lazily from the order ledger and cached per key.
//! - **Orders.** Menus are loaded with a version snapshot; an order commits
//!   only if the live menu version still matches, and is priced with delivery
//!   fees, stored credit, and the early-order discount in one transaction.
//!   Receipts flag late deliveries and credit the customer.
//!
//! # Modules
//!
//! - [`domain`] - Periods, report keys and records, menus, orders, pricing
//! - [`port`] - Storage traits the application depends on
//! - [`application`] - Bucketizing, materialization, commit coordination
//! - [`adapter`] - SQLite and in-memory storage, TCP server, CLI
//! - [`infrastructure`] - Configuration, logging, wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use orderdesk::domain::report::ReportKey;
//! use orderdesk::infrastructure::bootstrap::build_service;
//! use orderdesk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("orderdesk.toml")?;
//!     let service = build_service(&config)?;
//!     let key = ReportKey::Performance {
//!         district: "north".into(),
//!         period: "3/2024".parse()?,
//!     };
//!     let report = service.reports().get_or_compute(&key)?;
//!     println!("{}", serde_json::to_string(&report)?);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
