//! Line-delimited JSON wire types.
//!
//! Each request is one JSON object on its own line, tagged by `command`.
//! Each response is one JSON object tagged by `status`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::id::{OrderId, RestaurantNumber};
use crate::domain::menu::MenuListing;
use crate::domain::order::{CommitReceipt, PendingOrder};
use crate::domain::receipt::LatenessVerdict;
use crate::domain::report::Materialized;
use crate::domain::timestamp::text;

/// An inbound request.
///
/// Report requests carry periods as text (`M/YYYY`, `Qn/YYYY`) and an
/// optional `refresh` flag that discards any cached row first. Timestamps
/// default to the server clock when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Request {
    OrderMix {
        district: String,
        restaurant: RestaurantNumber,
        month_year: String,
        #[serde(default)]
        refresh: bool,
    },
    Income {
        restaurant: RestaurantNumber,
        month_year: String,
        district: String,
        #[serde(default)]
        refresh: bool,
    },
    Performance {
        district: String,
        month_year: String,
        #[serde(default)]
        refresh: bool,
    },
    QuarterDistribution {
        restaurant: RestaurantNumber,
        quarter: String,
        #[serde(default)]
        refresh: bool,
    },
    QuarterIncome {
        restaurant: RestaurantNumber,
        quarter: String,
        #[serde(default)]
        refresh: bool,
    },
    BeginMenuEdit {
        restaurant: RestaurantNumber,
        #[serde(default, with = "text::option")]
        at: Option<NaiveDateTime>,
    },
    EndMenuEdit {
        restaurant: RestaurantNumber,
        #[serde(default, with = "text::option")]
        at: Option<NaiveDateTime>,
    },
    LoadMenu {
        restaurant_name: String,
    },
    CommitOrder {
        order: PendingOrder,
        /// Placement time; the server clock when absent.
        #[serde(default, with = "text::option")]
        now: Option<NaiveDateTime>,
    },
    ConfirmReceipt {
        order_id: OrderId,
        #[serde(default, with = "text::option")]
        received_at: Option<NaiveDateTime>,
    },
}

/// Successful payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Report(Materialized),
    Menu(MenuListing),
    Committed(CommitReceipt),
    Receipt(LatenessVerdict),
    Ack,
}

/// An outbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok(Payload),
    MenuChanged {
        restaurant: RestaurantNumber,
        message: String,
    },
    InvalidArgument {
        message: String,
    },
    NotFound {
        message: String,
    },
    Error {
        message: String,
    },
}

impl Response {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
