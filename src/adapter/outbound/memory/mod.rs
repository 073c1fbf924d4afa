//! In-memory adapters.
//!
//! Useful for tests and for running the service without a report table.

mod report;

pub use report::MemoryReportStore;
