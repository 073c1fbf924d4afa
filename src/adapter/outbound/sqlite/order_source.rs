//! SQLite raw order source.
//!
//! Reads the order ledger joined with customers. Timestamps are stored in a
//! sortable text layout, so the window filter compares text.

use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::RawOrderRow;
use crate::adapter::outbound::sqlite::database::schema::{customers, orders};
use crate::domain::order::CategoryQuantities;
use crate::domain::report::{LedgerQuery, RawOrder};
use crate::domain::timestamp::{format_timestamp, parse_timestamp};
use crate::error::{Error, Result};
use crate::port::outbound::report::RawOrderSource;

/// Status value of customers whose orders count toward monthly reports.
const ACTIVE_STATUS: &str = "active";

/// SQLite-backed raw order source.
pub struct SqliteOrderSource {
    pool: DbPool,
}

impl SqliteOrderSource {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn from_row(row: RawOrderRow) -> Result<RawOrder> {
        Ok(RawOrder {
            order_id: row.order_id,
            customer: row.customer_number,
            district: row.district,
            restaurant: row.restaurant_number,
            total_price: row.total_price,
            quantities: CategoryQuantities {
                salad: row.salad,
                main_course: row.main_course,
                dessert: row.dessert,
                drink: row.drink,
            },
            is_late: row.is_late != 0,
            ordered_at: parse_timestamp(&row.ordered_at)?,
        })
    }
}

impl RawOrderSource for SqliteOrderSource {
    fn orders(&self, query: &LedgerQuery) -> Result<Vec<RawOrder>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let mut select = orders::table
            .inner_join(customers::table)
            .filter(orders::ordered_at.ge(format_timestamp(&query.window.start)))
            .filter(orders::ordered_at.lt(format_timestamp(&query.window.end)))
            .select((
                orders::order_id,
                orders::customer_number,
                customers::district,
                orders::restaurant_number,
                orders::total_price,
                orders::salad,
                orders::main_course,
                orders::dessert,
                orders::drink,
                orders::is_late,
                orders::ordered_at,
            ))
            .into_boxed();

        if let Some(restaurant) = query.restaurant {
            select = select.filter(orders::restaurant_number.eq(restaurant));
        }
        if let Some(district) = &query.district {
            select = select.filter(customers::district.eq(district.clone()));
        }
        if query.active_customers_only {
            select = select.filter(customers::status.eq(ACTIVE_STATUS));
        }

        let rows: Vec<RawOrderRow> = select
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
