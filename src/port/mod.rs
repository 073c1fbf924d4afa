//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Report  │            │  Raw order  │              │  Menu +   │
//! │  store  │            │   source    │              │  ledger   │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;
