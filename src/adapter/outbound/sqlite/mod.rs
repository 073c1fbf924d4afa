//! SQLite persistence adapters.
//!
//! Diesel-backed implementations of the report cache, the raw order feed,
//! the menu catalog, and the order ledger, all sharing one connection pool.

pub mod database;
pub mod ledger;
pub mod menu;
pub mod order_source;
pub mod report_store;

pub use ledger::SqliteOrderLedger;
pub use menu::SqliteMenuCatalog;
pub use order_source::SqliteOrderSource;
pub use report_store::SqliteReportStore;
