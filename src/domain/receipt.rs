//! Delivery receipt and the lateness rule.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::id::{CustomerNumber, OrderId};

/// Minutes a regular order may take before it counts as late.
pub const REGULAR_GRACE_MINUTES: i64 = 60;

/// Minutes past the requested time an early order may arrive.
pub const EARLY_GRACE_MINUTES: i64 = 20;

/// A committed order awaiting receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredOrder {
    pub order_id: OrderId,
    pub customer: CustomerNumber,
    pub total_price: i32,
    pub is_early: bool,
    pub requested_at: NaiveDateTime,
    pub ordered_at: NaiveDateTime,
    pub received_at: Option<NaiveDateTime>,
}

/// Outcome of a receipt confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatenessVerdict {
    pub late: bool,
    pub credit_awarded: i32,
}

/// Decide whether `order` arrived late and how much credit it earns.
///
/// Early orders are measured from the requested time, others from the time
/// the order was placed. A late order earns half its charged total, rounded
/// down.
#[must_use]
pub fn assess_lateness(order: &DeliveredOrder, received_at: NaiveDateTime) -> LatenessVerdict {
    let (reference, grace) = if order.is_early {
        (order.requested_at, EARLY_GRACE_MINUTES)
    } else {
        (order.ordered_at, REGULAR_GRACE_MINUTES)
    };
    let late = received_at - reference > Duration::minutes(grace);
    LatenessVerdict {
        late,
        credit_awarded: if late { order.total_price / 2 } else { 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp::parse_timestamp;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn order(is_early: bool) -> DeliveredOrder {
        DeliveredOrder {
            order_id: 1,
            customer: 10,
            total_price: 75,
            is_early,
            requested_at: at("2024-03-05 13:00:00"),
            ordered_at: at("2024-03-05 12:00:00"),
            received_at: None,
        }
    }

    #[test]
    fn regular_order_gets_an_hour() {
        let v = assess_lateness(&order(false), at("2024-03-05 13:00:00"));
        assert_eq!(v, LatenessVerdict::default());

        let v = assess_lateness(&order(false), at("2024-03-05 13:00:01"));
        assert!(v.late);
        assert_eq!(v.credit_awarded, 37);
    }

    #[test]
    fn early_order_is_measured_from_requested_time() {
        let v = assess_lateness(&order(true), at("2024-03-05 13:20:00"));
        assert!(!v.late);

        let v = assess_lateness(&order(true), at("2024-03-05 13:21:00"));
        assert!(v.late);
        assert_eq!(v.credit_awarded, 37);
    }
}
