//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the storage the application depends on: the
//! report cache, the historical order ledger, and the menu catalog.

pub mod ledger;
pub mod menu;
pub mod report;
