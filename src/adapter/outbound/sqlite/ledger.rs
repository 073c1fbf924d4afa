//! SQLite order ledger.
//!
//! Commits and receipts each run in a single transaction. A commit writes the
//! order header, its lines, the delivery row, and the customer's reduced
//! credit; if any statement fails the whole unit rolls back.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    CustomerRow, DeliveryRow, NewOrderItemRow, NewOrderRow, OrderRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    customers, deliveries, order_items, orders,
};
use crate::domain::id::{CustomerNumber, OrderId};
use crate::domain::order::{CustomerAccount, PreparedOrder};
use crate::domain::receipt::{DeliveredOrder, LatenessVerdict};
use crate::domain::timestamp::{format_timestamp, parse_timestamp};
use crate::error::{CommitError, Error, Result};
use crate::port::outbound::ledger::OrderLedger;

/// Delivery status once the customer confirmed receipt.
const RECEIVED_STATUS: &str = "received";

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

/// SQLite-backed order ledger.
pub struct SqliteOrderLedger {
    pool: DbPool,
}

impl SqliteOrderLedger {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn write_order(conn: &mut SqliteConnection, order: &PreparedOrder) -> Result<OrderId> {
        let credit_updated = diesel::update(
            customers::table
                .find(order.customer)
                .filter(customers::credit.eq(order.credit_before)),
        )
        .set(customers::credit.eq(order.credit_after()))
        .execute(conn)?;
        if credit_updated == 0 {
            let exists = customers::table
                .find(order.customer)
                .select(customers::customer_number)
                .first::<i32>(conn)
                .optional()?
                .is_some();
            return Err(if exists {
                CommitError::CreditChanged {
                    customer: order.customer,
                }
            } else {
                CommitError::UnknownCustomer(order.customer)
            }
            .into());
        }

        let header = NewOrderRow {
            customer_number: order.customer,
            restaurant_number: order.restaurant,
            total_price: order.settlement.total_price,
            salad: order.quantities.salad,
            main_course: order.quantities.main_course,
            dessert: order.quantities.dessert,
            drink: order.quantities.drink,
            is_delivery: i32::from(order.delivery.is_some()),
            is_early_order: i32::from(order.settlement.early),
            is_late: 0,
            requested_at: format_timestamp(&order.requested_at),
            ordered_at: format_timestamp(&order.ordered_at),
        };
        diesel::insert_into(orders::table)
            .values(&header)
            .execute(conn)?;

        let order_id = diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result::<LastInsertRowId>(conn)
            .map(|row| row.id)?;

        let items: Vec<NewOrderItemRow> = order
            .lines
            .iter()
            .map(|line| NewOrderItemRow {
                order_id,
                dish_id: line.dish_id,
                size: line.size().to_string(),
                specification: line.specification.clone().unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();
        diesel::insert_into(order_items::table)
            .values(&items)
            .execute(conn)?;

        if let Some(delivery) = &order.delivery {
            let row = DeliveryRow {
                order_id,
                kind: delivery.kind.as_str().to_string(),
                address: delivery.address.clone(),
                phone: delivery.phone.clone(),
                participants: i32::try_from(delivery.kind.participants()).unwrap_or(i32::MAX),
                status: "pending".to_string(),
            };
            diesel::insert_into(deliveries::table)
                .values(&row)
                .execute(conn)?;
        }

        Ok(order_id)
    }
}

impl OrderLedger for SqliteOrderLedger {
    fn customer(&self, number: CustomerNumber) -> Result<Option<CustomerAccount>> {
        let mut conn = self.connection()?;
        let row = customers::table
            .find(number)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|r| CustomerAccount {
            number: r.customer_number,
            district: r.district,
            status: r.status,
            credit: r.credit,
        }))
    }

    fn commit(&self, order: &PreparedOrder) -> Result<OrderId> {
        let mut conn = self.connection()?;

        let result = conn.transaction(|conn| Self::write_order(conn, order));

        match result {
            Ok(order_id) => {
                debug!(
                    order_id,
                    customer = order.customer,
                    restaurant = order.restaurant,
                    "Order written"
                );
                Ok(order_id)
            }
            Err(Error::Database(reason)) => {
                warn!(customer = order.customer, error = %reason, "Order transaction rolled back");
                Err(CommitError::RolledBack { reason }.into())
            }
            Err(e) => Err(e),
        }
    }

    fn record_receipt(
        &self,
        order_id: OrderId,
        received_at: NaiveDateTime,
        assess: &dyn Fn(&DeliveredOrder) -> LatenessVerdict,
    ) -> Result<LatenessVerdict> {
        let mut conn = self.connection()?;

        conn.transaction(|conn| {
            let row = orders::table
                .find(order_id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(CommitError::UnknownOrder(order_id))?;
            if row.received_at.is_some() {
                return Err(CommitError::AlreadyReceived(order_id).into());
            }

            let order = DeliveredOrder {
                order_id,
                customer: row.customer_number,
                total_price: row.total_price,
                is_early: row.is_early_order != 0,
                requested_at: parse_timestamp(&row.requested_at)?,
                ordered_at: parse_timestamp(&row.ordered_at)?,
                received_at: None,
            };
            let verdict = assess(&order);

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::received_at.eq(Some(format_timestamp(&received_at))),
                    orders::is_late.eq(i32::from(verdict.late)),
                ))
                .execute(conn)?;
            diesel::update(deliveries::table.find(order_id))
                .set(deliveries::status.eq(RECEIVED_STATUS))
                .execute(conn)?;
            if verdict.late {
                diesel::update(customers::table.find(order.customer))
                    .set(customers::credit.eq(customers::credit + verdict.credit_awarded))
                    .execute(conn)?;
            }

            Ok(verdict)
        })
    }
}
