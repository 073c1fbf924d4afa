//! Delivery receipt confirmation.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::id::OrderId;
use crate::domain::receipt::{assess_lateness, DeliveredOrder, LatenessVerdict};
use crate::error::Result;
use crate::port::outbound::ledger::OrderLedger;

/// Records receipts and credits customers for late orders.
pub struct ReceiptDesk {
    ledger: Arc<dyn OrderLedger>,
}

impl ReceiptDesk {
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }

    /// Mark `order_id` received at `received_at`.
    ///
    /// A late order is flagged and its customer credited half the charged
    /// total in the same transaction.
    ///
    /// # Errors
    /// Returns [`CommitError::UnknownOrder`](crate::error::CommitError::UnknownOrder)
    /// or [`CommitError::AlreadyReceived`](crate::error::CommitError::AlreadyReceived).
    pub fn confirm_receipt(
        &self,
        order_id: OrderId,
        received_at: NaiveDateTime,
    ) -> Result<LatenessVerdict> {
        let verdict = self.ledger.record_receipt(order_id, received_at, &|order: &DeliveredOrder| {
            assess_lateness(order, received_at)
        })?;
        info!(
            order_id,
            late = verdict.late,
            credit_awarded = verdict.credit_awarded,
            "Receipt confirmed"
        );
        Ok(verdict)
    }
}
