//! Delivery fees, customer credit, and the early-order discount.
//!
//! Settlement order is fixed: credit is consumed against the full amount
//! first and the early discount applies to whatever remains.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Fee for a regular delivery.
pub const REGULAR_DELIVERY_FEE: i32 = 25;

/// Fee for a shared delivery split between exactly two participants.
pub const SHARED_PAIR_FEE: i32 = 30;

/// Per-participant fee for larger shared deliveries.
pub const SHARED_PARTICIPANT_FEE: i32 = 10;

/// Discount rate for early orders.
pub const EARLY_DISCOUNT_RATE: Decimal = dec!(0.10);

/// Maximum whole hours between placement and requested time for an early order.
pub const EARLY_WINDOW_HOURS: i64 = 2;

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryKind {
    Pickup,
    Regular,
    Shared { participants: u32 },
    Robot,
}

impl DeliveryKind {
    /// Everything except pickup leaves the restaurant.
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        !matches!(self, Self::Pickup)
    }

    #[must_use]
    pub fn fee(&self) -> i32 {
        match self {
            Self::Pickup | Self::Robot => 0,
            Self::Regular => REGULAR_DELIVERY_FEE,
            Self::Shared { participants: 2 } => SHARED_PAIR_FEE,
            Self::Shared { participants } => {
                SHARED_PARTICIPANT_FEE.saturating_mul(i32::try_from(*participants).unwrap_or(i32::MAX))
            }
        }
    }

    #[must_use]
    pub fn participants(&self) -> u32 {
        match self {
            Self::Shared { participants } => *participants,
            _ => 1,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Regular => "regular",
            Self::Shared { .. } => "shared",
            Self::Robot => "robot",
        }
    }

    /// Rebuild a kind from its stored name and participant count.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownDeliveryKind`] for unknown names.
    pub fn from_parts(name: &str, participants: u32) -> Result<Self, DomainError> {
        match name.parse()? {
            Self::Shared { .. } => Ok(Self::Shared { participants }),
            other => Ok(other),
        }
    }
}

impl fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" | "take-away" | "takeaway" => Ok(Self::Pickup),
            "regular" => Ok(Self::Regular),
            "shared" => Ok(Self::Shared { participants: 2 }),
            "robot" => Ok(Self::Robot),
            _ => Err(DomainError::UnknownDeliveryKind(s.to_string())),
        }
    }
}

/// True when the requested time is later the same calendar day and at most
/// [`EARLY_WINDOW_HOURS`] whole hours after `now`.
#[must_use]
pub fn is_early_order(now: NaiveDateTime, requested_at: NaiveDateTime) -> bool {
    if now.date() != requested_at.date() || requested_at < now {
        return false;
    }
    (requested_at - now).num_hours() <= EARLY_WINDOW_HOURS
}

/// Money breakdown of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Items plus delivery fee.
    pub subtotal: Decimal,
    pub delivery_fee: i32,
    pub credit_used: i32,
    pub early: bool,
    pub discount: Decimal,
    /// Amount charged, rounded to whole units.
    pub total_price: i32,
}

/// Price an order.
///
/// Credit is consumed first, capped at the subtotal. An early order then gets
/// [`EARLY_DISCOUNT_RATE`] off the remainder.
///
/// # Errors
/// Returns [`DomainError::AmountOutOfRange`] when the charged amount does not
/// fit a whole-unit column.
pub fn settle(
    items_total: Decimal,
    delivery: &DeliveryKind,
    available_credit: i32,
    use_credit: bool,
    early: bool,
) -> Result<Settlement, DomainError> {
    let delivery_fee = delivery.fee();
    let subtotal = items_total + Decimal::from(delivery_fee);

    let credit_used = if use_credit && available_credit > 0 {
        let credit = Decimal::from(available_credit).min(subtotal.floor());
        credit
            .to_i32()
            .ok_or_else(|| DomainError::AmountOutOfRange(credit.to_string()))?
    } else {
        0
    };
    let remainder = subtotal - Decimal::from(credit_used);

    let discount = if early {
        remainder * EARLY_DISCOUNT_RATE
    } else {
        Decimal::ZERO
    };
    let charged = (remainder - discount).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let total_price = charged
        .to_i32()
        .ok_or_else(|| DomainError::AmountOutOfRange(charged.to_string()))?;

    Ok(Settlement {
        subtotal,
        delivery_fee,
        credit_used,
        early,
        discount,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp::parse_timestamp;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn delivery_fees() {
        assert_eq!(DeliveryKind::Pickup.fee(), 0);
        assert_eq!(DeliveryKind::Regular.fee(), 25);
        assert_eq!(DeliveryKind::Shared { participants: 2 }.fee(), 30);
        assert_eq!(DeliveryKind::Shared { participants: 3 }.fee(), 30);
        assert_eq!(DeliveryKind::Shared { participants: 5 }.fee(), 50);
        assert_eq!(DeliveryKind::Robot.fee(), 0);
    }

    #[test]
    fn robot_counts_as_delivery() {
        assert!(DeliveryKind::Robot.is_delivery());
        assert!(!DeliveryKind::Pickup.is_delivery());
    }

    #[test]
    fn stored_kind_roundtrips_with_participants() {
        let kind = DeliveryKind::from_parts("shared", 4).unwrap();
        assert_eq!(kind, DeliveryKind::Shared { participants: 4 });
        assert_eq!(DeliveryKind::from_parts("robot", 1).unwrap(), DeliveryKind::Robot);
        assert!(DeliveryKind::from_parts("drone", 1).is_err());
    }

    #[test]
    fn early_means_same_day_within_two_whole_hours() {
        let now = at("2024-03-05 12:00:00");
        assert!(is_early_order(now, at("2024-03-05 13:30:00")));
        assert!(is_early_order(now, at("2024-03-05 14:59:59")));
        assert!(!is_early_order(now, at("2024-03-05 15:00:00")));
        assert!(!is_early_order(now, at("2024-03-06 12:30:00")));
        assert!(!is_early_order(now, at("2024-03-05 11:00:00")));
    }

    #[test]
    fn credit_is_consumed_before_discount() {
        let s = settle(dec!(100), &DeliveryKind::Pickup, 40, true, true).unwrap();
        assert_eq!(s.credit_used, 40);
        assert_eq!(s.discount, dec!(6.0));
        assert_eq!(s.total_price, 54);
    }

    #[test]
    fn credit_is_capped_at_subtotal() {
        let s = settle(dec!(20), &DeliveryKind::Regular, 100, true, false).unwrap();
        assert_eq!(s.subtotal, dec!(45));
        assert_eq!(s.credit_used, 45);
        assert_eq!(s.total_price, 0);
    }

    #[test]
    fn credit_can_be_declined() {
        let s = settle(dec!(20), &DeliveryKind::Pickup, 100, false, false).unwrap();
        assert_eq!(s.credit_used, 0);
        assert_eq!(s.total_price, 20);
    }

    #[test]
    fn charged_amount_rounds_half_away_from_zero() {
        let s = settle(dec!(45), &DeliveryKind::Pickup, 0, true, true).unwrap();
        assert_eq!(s.discount, dec!(4.50));
        assert_eq!(s.total_price, 41);

        let s = settle(dec!(35), &DeliveryKind::Pickup, 0, true, true).unwrap();
        assert_eq!(s.total_price, 32);
    }
}
