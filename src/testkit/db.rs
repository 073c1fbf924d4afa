//! In-memory database fixtures.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations, DbPool};
use crate::adapter::outbound::sqlite::database::model::{
    CustomerRow, DishPriceRow, DishRow, NewDishOptionRow, NewOrderRow, RestaurantRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    customers, dish_options, dish_prices, dishes, orders, restaurants,
};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

/// A migrated single-connection in-memory pool.
///
/// # Panics
/// Panics if the pool cannot be created or migrated.
pub fn memory_pool() -> DbPool {
    let pool = create_pool(":memory:", 1).expect("in-memory pool");
    run_migrations(&pool).expect("migrations");
    pool
}

/// Insert a restaurant whose menu was never edited.
///
/// # Panics
/// Panics on insert failure.
pub fn seed_restaurant(conn: &mut SqliteConnection, number: i32, name: &str) {
    diesel::insert_into(restaurants::table)
        .values(&RestaurantRow {
            restaurant_number: number,
            name: name.to_string(),
            begin_update: None,
            end_update: None,
        })
        .execute(conn)
        .expect("seed restaurant");
}

/// Insert a customer.
///
/// # Panics
/// Panics on insert failure.
pub fn seed_customer(
    conn: &mut SqliteConnection,
    number: i32,
    district: &str,
    status: &str,
    credit: i32,
) {
    diesel::insert_into(customers::table)
        .values(&CustomerRow {
            customer_number: number,
            district: district.to_string(),
            status: status.to_string(),
            credit,
        })
        .execute(conn)
        .expect("seed customer");
}

/// Insert a dish with one price row per `(size, price)` pair.
///
/// # Panics
/// Panics on insert failure.
pub fn seed_dish(
    conn: &mut SqliteConnection,
    restaurant: i32,
    dish_id: i32,
    name: &str,
    category: &str,
    prices: &[(&str, i32)],
) {
    diesel::insert_into(dishes::table)
        .values(&DishRow {
            dish_id,
            restaurant_number: restaurant,
            name: name.to_string(),
            category: category.to_string(),
        })
        .execute(conn)
        .expect("seed dish");

    let rows: Vec<DishPriceRow> = prices
        .iter()
        .map(|(size, price)| DishPriceRow {
            dish_id,
            size: (*size).to_string(),
            price: *price,
        })
        .collect();
    diesel::insert_into(dish_prices::table)
        .values(&rows)
        .execute(conn)
        .expect("seed dish prices");
}

/// Insert a raw option row for a dish.
///
/// # Panics
/// Panics on insert failure.
pub fn seed_dish_option(conn: &mut SqliteConnection, dish_id: i32, option_type: &str, value: &str) {
    diesel::insert_into(dish_options::table)
        .values(&NewDishOptionRow {
            dish_id,
            option_type: option_type.to_string(),
            option_value: value.to_string(),
        })
        .execute(conn)
        .expect("seed dish option");
}

/// Insert a pickup order with one main course placed at `ordered_at`.
/// Returns the new order id.
///
/// # Panics
/// Panics on insert failure.
pub fn seed_order(
    conn: &mut SqliteConnection,
    customer: i32,
    restaurant: i32,
    total_price: i32,
    ordered_at: &str,
) -> i32 {
    diesel::insert_into(orders::table)
        .values(&NewOrderRow {
            customer_number: customer,
            restaurant_number: restaurant,
            total_price,
            salad: 0,
            main_course: 1,
            dessert: 0,
            drink: 0,
            is_delivery: 0,
            is_early_order: 0,
            is_late: 0,
            requested_at: ordered_at.to_string(),
            ordered_at: ordered_at.to_string(),
        })
        .execute(conn)
        .expect("seed order");

    diesel::sql_query("SELECT last_insert_rowid() AS id")
        .get_result::<LastInsertRowId>(conn)
        .map(|row| row.id)
        .expect("order id")
}

/// Flag an existing order as late.
///
/// # Panics
/// Panics on update failure.
pub fn mark_late(conn: &mut SqliteConnection, order_id: i32) {
    diesel::update(orders::table.find(order_id))
        .set(orders::is_late.eq(1))
        .execute(conn)
        .expect("mark late");
}
