//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod bucketize;
pub mod commit;
pub mod materializer;
pub mod receipt;
pub mod service;
