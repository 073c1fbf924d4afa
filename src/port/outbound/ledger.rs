//! Order ledger port: the write side of orders.

use chrono::NaiveDateTime;

use crate::domain::id::{CustomerNumber, OrderId};
use crate::domain::order::{CustomerAccount, PreparedOrder};
use crate::domain::receipt::{DeliveredOrder, LatenessVerdict};
use crate::error::Result;

/// Transactional order writes.
pub trait OrderLedger: Send + Sync {
    /// Look up a customer for pricing.
    fn customer(&self, number: CustomerNumber) -> Result<Option<CustomerAccount>>;

    /// Write the order header, its lines, the delivery row, and the customer's
    /// reduced credit as one unit. On any failure nothing is persisted.
    fn commit(&self, order: &PreparedOrder) -> Result<OrderId>;

    /// Mark an order received at `received_at` and apply the verdict returned
    /// by `assess`, all in one transaction.
    fn record_receipt(
        &self,
        order_id: OrderId,
        received_at: NaiveDateTime,
        assess: &dyn Fn(&DeliveredOrder) -> LatenessVerdict,
    ) -> Result<LatenessVerdict>;
}
