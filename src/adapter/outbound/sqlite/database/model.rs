//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{
    customers, deliveries, dish_options, dish_prices, dishes, income_reports, order_items,
    order_mix_reports, orders, performance_reports, quarter_distribution_reports,
    quarter_income_reports, restaurants,
};

/// Database row for a customer.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerRow {
    pub customer_number: i32,
    pub district: String,
    pub status: String,
    pub credit: i32,
}

/// Database row for a restaurant and its menu version.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantRow {
    pub restaurant_number: i32,
    pub name: String,
    pub begin_update: Option<String>,
    pub end_update: Option<String>,
}

/// Database row for a dish.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DishRow {
    pub dish_id: i32,
    pub restaurant_number: i32,
    pub name: String,
    pub category: String,
}

/// Database row for a dish price per size.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = dish_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DishPriceRow {
    pub dish_id: i32,
    pub size: String,
    pub price: i32,
}

/// Database row for a dish option (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = dish_options)]
pub struct NewDishOptionRow {
    pub dish_id: i32,
    pub option_type: String,
    pub option_value: String,
}

/// Database row for a dish option (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = dish_options)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DishOptionRow {
    pub option_id: i32,
    pub dish_id: i32,
    pub option_type: String,
    pub option_value: String,
}

/// Database row for an order header (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer_number: i32,
    pub restaurant_number: i32,
    pub total_price: i32,
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
    pub is_delivery: i32,
    pub is_early_order: i32,
    pub is_late: i32,
    pub requested_at: String,
    pub ordered_at: String,
}

/// Database row for an order header (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub order_id: i32,
    pub customer_number: i32,
    pub restaurant_number: i32,
    pub total_price: i32,
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
    pub is_delivery: i32,
    pub is_early_order: i32,
    pub is_late: i32,
    pub requested_at: String,
    pub ordered_at: String,
    pub received_at: Option<String>,
}

/// Database row for an order line (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub dish_id: i32,
    pub size: String,
    pub specification: String,
    pub quantity: i32,
    pub unit_price: i32,
}

/// Database row for a delivery.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DeliveryRow {
    pub order_id: i32,
    pub kind: String,
    pub address: String,
    pub phone: String,
    pub participants: i32,
    pub status: String,
}

/// An order joined with its customer's district, as read by the report engine.
#[derive(Queryable, Debug, Clone)]
pub struct RawOrderRow {
    pub order_id: i32,
    pub customer_number: i32,
    pub district: String,
    pub restaurant_number: i32,
    pub total_price: i32,
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
    pub is_late: i32,
    pub ordered_at: String,
}

/// Database row for an order-mix report.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = order_mix_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderMixReportRow {
    pub district: String,
    pub restaurant_number: i32,
    pub month_year: String,
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
}

/// Database row for an income report.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = income_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncomeReportRow {
    pub restaurant_number: i32,
    pub month_year: String,
    pub district: String,
    pub week1: i32,
    pub week2: i32,
    pub week3: i32,
    pub week4: i32,
}

/// Database row for a performance report.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = performance_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceReportRow {
    pub district: String,
    pub month_year: String,
    pub week1: i32,
    pub week2: i32,
    pub week3: i32,
    pub week4: i32,
}

/// Database row for a quarter distribution report.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = quarter_distribution_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuarterDistributionRow {
    pub restaurant_number: i32,
    pub quarter: String,
    pub year: i32,
    pub max_orders_per_day: i32,
    pub intervals: String,
    pub counts: String,
}

/// Database row for a quarter income report.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = quarter_income_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuarterIncomeRow {
    pub restaurant_number: i32,
    pub quarter: String,
    pub year: i32,
    pub total_income: i32,
    pub weeks: String,
}
