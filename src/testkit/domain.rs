//! Builders for domain values used across tests.

use chrono::NaiveDateTime;

use crate::domain::menu::MenuSnapshot;
use crate::domain::order::{CategoryQuantities, DeliveryRequest, DishCategory, OrderLine, PendingOrder};
use crate::domain::period::{MonthYear, QuarterPeriod};
use crate::domain::report::RawOrder;
use crate::domain::timestamp::parse_timestamp;

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Panics
/// Panics on malformed input.
pub fn at(value: &str) -> NaiveDateTime {
    parse_timestamp(value).expect("valid test timestamp")
}

/// Parse an `M/YYYY` period.
///
/// # Panics
/// Panics on malformed input.
pub fn month(value: &str) -> MonthYear {
    value.parse().expect("valid test month")
}

/// Parse a `Qn/YYYY` period.
///
/// # Panics
/// Panics on malformed input.
pub fn quarter(value: &str) -> QuarterPeriod {
    value.parse().expect("valid test quarter")
}

/// A raw order of customer 1 in district `north` at restaurant 1 with one
/// main course.
pub fn raw_order(ordered_at: &str, total_price: i32) -> RawOrder {
    RawOrder {
        order_id: 0,
        customer: 1,
        district: "north".to_string(),
        restaurant: 1,
        total_price,
        quantities: CategoryQuantities {
            main_course: 1,
            ..CategoryQuantities::default()
        },
        is_late: false,
        ordered_at: at(ordered_at),
    }
}

/// A single-line order line.
pub fn line(dish_id: i32, category: DishCategory, quantity: i32, unit_price: i32) -> OrderLine {
    OrderLine {
        dish_id,
        category,
        size: None,
        specification: None,
        quantity,
        unit_price,
    }
}

/// A pickup order by customer 10 with one salad at `unit_price`, requested
/// for 18:00 on 2024-03-05.
pub fn pending_order(snapshot: MenuSnapshot, unit_price: i32) -> PendingOrder {
    PendingOrder {
        customer: 10,
        restaurant: snapshot.restaurant,
        lines: vec![line(1, DishCategory::Salad, 1, unit_price)],
        delivery: DeliveryRequest::pickup(),
        requested_at: at("2024-03-05 18:00:00"),
        use_credit: true,
        snapshot,
    }
}
