//! Domain validation errors.
//!
//! Raised by constructors and parsers before any I/O happens, so malformed
//! periods, order lines, or delivery details fail fast.
//!
//! ```
//! use orderdesk::domain::error::DomainError;
//! use orderdesk::domain::period::MonthYear;
//!
//! let result = "13/2024".parse::<MonthYear>();
//! assert!(matches!(result, Err(DomainError::InvalidPeriod { .. })));
//! ```

use thiserror::Error;

use super::report::ReportKind;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A month/year or quarter argument could not be understood.
    #[error("invalid period '{value}': {reason}")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// A dish category name is not one of the four known categories.
    #[error("unknown dish category '{0}'")]
    UnknownCategory(String),

    /// A delivery kind name is not recognised.
    #[error("unknown delivery kind '{0}'")]
    UnknownDeliveryKind(String),

    /// Orders must have at least one line.
    #[error("order has no line items")]
    EmptyOrder,

    /// Line quantities must be positive.
    #[error("quantity must be positive for dish {dish_id}, got {quantity}")]
    NonPositiveQuantity { dish_id: i32, quantity: i32 },

    /// Unit prices cannot be negative.
    #[error("unit price must not be negative for dish {dish_id}, got {price}")]
    NegativePrice { dish_id: i32, price: i32 },

    /// Shared deliveries need at least two participants.
    #[error("shared delivery needs at least 2 participants, got {0}")]
    TooFewParticipants(u32),

    /// Deliveries need somewhere to go and someone to call.
    #[error("delivery is missing {0}")]
    MissingDeliveryField(&'static str),

    /// A computed amount does not fit the stored integer column.
    #[error("amount {0} is out of range")]
    AmountOutOfRange(String),

    /// The menu snapshot was captured for a different restaurant.
    #[error("menu snapshot belongs to restaurant {snapshot}, order is for restaurant {order}")]
    SnapshotMismatch { snapshot: i32, order: i32 },

    /// A record of one report kind was offered for a key of another.
    #[error("report record of kind {record} does not match key of kind {key}")]
    ReportKindMismatch { key: ReportKind, record: ReportKind },
}
