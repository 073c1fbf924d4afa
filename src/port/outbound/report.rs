//! Report cache and raw ledger ports.

use crate::domain::report::{AggregateRecord, LedgerQuery, RawOrder, ReportKey};
use crate::error::Result;

/// Persistent key to aggregate table.
///
/// Implementations must make [`ReportStore::upsert`] an insert-or-replace on
/// the key so concurrent first computations of the same key leave one row.
pub trait ReportStore: Send + Sync {
    /// Fetch the cached aggregate for `key`, if any.
    fn get(&self, key: &ReportKey) -> Result<Option<AggregateRecord>>;

    /// Insert the aggregate, replacing any row stored under the same key.
    fn upsert(&self, key: &ReportKey, record: &AggregateRecord) -> Result<()>;

    /// Drop the cached aggregate. Returns whether a row existed.
    fn evict(&self, key: &ReportKey) -> Result<bool>;
}

/// Read-only access to historical orders.
pub trait RawOrderSource: Send + Sync {
    /// Every order matching `query`, in any order.
    fn orders(&self, query: &LedgerQuery) -> Result<Vec<RawOrder>>;
}
