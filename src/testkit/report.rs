//! Report-side test doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::report::{AggregateRecord, LedgerQuery, RawOrder, ReportKey};
use crate::error::{Error, Result};
use crate::port::outbound::report::{RawOrderSource, ReportStore};

/// Raw order source serving a fixed set of rows.
///
/// Rows are filtered by the query's window, restaurant, and district. Every
/// scripted row is treated as belonging to an active customer.
pub struct ScriptedOrderSource {
    orders: Vec<RawOrder>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedOrderSource {
    pub fn new(orders: Vec<RawOrder>) -> Self {
        Self {
            orders,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every query fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            orders: Vec::new(),
            failure: Some(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of queries served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RawOrderSource for ScriptedOrderSource {
    fn orders(&self, query: &LedgerQuery) -> Result<Vec<RawOrder>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(Error::Database(reason.clone()));
        }
        Ok(self
            .orders
            .iter()
            .filter(|o| query.window.contains(&o.ordered_at))
            .filter(|o| query.restaurant.map_or(true, |r| r == o.restaurant))
            .filter(|o| query.district.as_deref().map_or(true, |d| d == o.district))
            .cloned()
            .collect())
    }
}

/// Report store whose every call fails.
pub struct FailingReportStore;

impl ReportStore for FailingReportStore {
    fn get(&self, _key: &ReportKey) -> Result<Option<AggregateRecord>> {
        Err(Error::Connection("report store unavailable".into()))
    }

    fn upsert(&self, _key: &ReportKey, _record: &AggregateRecord) -> Result<()> {
        Err(Error::Connection("report store unavailable".into()))
    }

    fn evict(&self, _key: &ReportKey) -> Result<bool> {
        Err(Error::Connection("report store unavailable".into()))
    }
}
