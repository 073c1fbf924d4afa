//! Storage-agnostic domain types and rules.
//!
//! Nothing here performs I/O. Report shapes, menu versions, pricing, and the
//! lateness rule are plain values and pure functions that the application
//! layer wires to ports.

pub mod error;
pub mod id;
pub mod menu;
pub mod order;
pub mod period;
pub mod pricing;
pub mod receipt;
pub mod report;
pub mod timestamp;
