//! Infrastructure layer.
//!
//! Configuration, logging, and the composition root that wires ports to
//! adapters.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
