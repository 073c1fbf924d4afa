use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::{CustomerNumber, OrderId, RestaurantNumber};
use crate::domain::menu::MenuVersion;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Order-commit and receipt errors.
#[derive(Error, Debug)]
pub enum CommitError {
    /// The menu changed, or is being edited, since the order's menu was loaded.
    #[error("menu of restaurant {restaurant} changed, please rebuild your order")]
    MenuChanged {
        restaurant: RestaurantNumber,
        snapshot: MenuVersion,
        live: MenuVersion,
    },

    #[error("unknown restaurant: {0}")]
    UnknownRestaurant(String),

    #[error("unknown customer: {0}")]
    UnknownCustomer(CustomerNumber),

    #[error("unknown order: {0}")]
    UnknownOrder(OrderId),

    #[error("order {0} was already received")]
    AlreadyReceived(OrderId),

    /// The customer's credit moved between pricing and the write.
    #[error("credit of customer {customer} changed during commit")]
    CreditChanged { customer: CustomerNumber },

    /// The write failed and nothing was persisted.
    #[error("order rolled back: {reason}")]
    RolledBack { reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Error::Connection(err.to_string())
    }
}
