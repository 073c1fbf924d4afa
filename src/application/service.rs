//! The explicit service object shared by every inbound adapter.

use std::sync::Arc;

use crate::application::commit::OrderCommitCoordinator;
use crate::application::materializer::ReportMaterializer;
use crate::application::receipt::ReceiptDesk;
use crate::port::outbound::ledger::OrderLedger;
use crate::port::outbound::menu::MenuCatalog;
use crate::port::outbound::report::{RawOrderSource, ReportStore};

/// Reports, order commits, and receipts behind one handle.
///
/// Built once per process with its storage injected and shared by `Arc`.
pub struct Service {
    reports: ReportMaterializer,
    orders: OrderCommitCoordinator,
    receipts: ReceiptDesk,
}

impl Service {
    pub fn new(
        store: Arc<dyn ReportStore>,
        source: Arc<dyn RawOrderSource>,
        menus: Arc<dyn MenuCatalog>,
        ledger: Arc<dyn OrderLedger>,
    ) -> Self {
        Self {
            reports: ReportMaterializer::new(store, source),
            orders: OrderCommitCoordinator::new(menus, Arc::clone(&ledger)),
            receipts: ReceiptDesk::new(ledger),
        }
    }

    #[must_use]
    pub fn reports(&self) -> &ReportMaterializer {
        &self.reports
    }

    #[must_use]
    pub fn orders(&self) -> &OrderCommitCoordinator {
        &self.orders
    }

    #[must_use]
    pub fn receipts(&self) -> &ReceiptDesk {
        &self.receipts
    }
}
