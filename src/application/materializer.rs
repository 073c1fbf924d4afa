//! Report materialization: check the cache, else compute, store, and return.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::bucketize::{bucketize, zero};
use crate::domain::report::{Materialized, Provenance, ReportKey};
use crate::error::Result;
use crate::port::outbound::report::{RawOrderSource, ReportStore};

/// Lazily computes and caches report aggregates.
///
/// Cached rows are trusted as-is. Two concurrent misses for one key may both
/// compute and upsert; computation is deterministic so the last write wins
/// with an identical row.
pub struct ReportMaterializer {
    store: Arc<dyn ReportStore>,
    source: Arc<dyn RawOrderSource>,
}

impl ReportMaterializer {
    pub fn new(store: Arc<dyn ReportStore>, source: Arc<dyn RawOrderSource>) -> Self {
        Self { store, source }
    }

    /// Return the cached aggregate for `key`, computing and storing it on a miss.
    ///
    /// A failing raw query yields a zero record tagged
    /// [`Provenance::ComputationFailed`] that is not stored.
    ///
    /// # Errors
    /// Propagates report store failures.
    pub fn get_or_compute(&self, key: &ReportKey) -> Result<Materialized> {
        if let Some(report) = self.store.get(key)? {
            debug!(key = %key, "Report cache hit");
            return Ok(Materialized {
                provenance: Provenance::Cached,
                report,
            });
        }
        self.compute_and_store(key)
    }

    /// Compute `key` from raw rows and overwrite any cached row.
    ///
    /// # Errors
    /// Propagates report store failures.
    pub fn recompute(&self, key: &ReportKey) -> Result<Materialized> {
        self.compute_and_store(key)
    }

    /// Serve `key` from the cache, or discard the cached row and recompute
    /// when `refresh` is set.
    ///
    /// # Errors
    /// Propagates report store failures.
    pub fn materialize(&self, key: &ReportKey, refresh: bool) -> Result<Materialized> {
        if refresh {
            self.evict(key)?;
            return self.recompute(key);
        }
        self.get_or_compute(key)
    }

    /// Drop the cached row for `key`. Returns whether one existed.
    ///
    /// # Errors
    /// Propagates report store failures.
    pub fn evict(&self, key: &ReportKey) -> Result<bool> {
        let evicted = self.store.evict(key)?;
        if evicted {
            info!(key = %key, "Report evicted");
        }
        Ok(evicted)
    }

    fn compute_and_store(&self, key: &ReportKey) -> Result<Materialized> {
        let orders = match self.source.orders(&key.ledger_query()) {
            Ok(orders) => orders,
            Err(e) => {
                warn!(key = %key, error = %e, "Raw order query failed, returning zero report");
                return Ok(Materialized {
                    provenance: Provenance::ComputationFailed,
                    report: zero(key),
                });
            }
        };

        let report = bucketize(key, &orders);
        self.store.upsert(key, &report)?;

        let provenance = if orders.is_empty() {
            Provenance::Empty
        } else {
            Provenance::Computed
        };
        info!(key = %key, rows = orders.len(), provenance = ?provenance, "Report computed");
        Ok(Materialized { provenance, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryReportStore;
    use crate::domain::period::{MonthYear, QuarterPeriod};
    use crate::domain::report::{AggregateRecord, IncomeReport};
    use crate::testkit::domain::raw_order;
    use crate::testkit::report::{FailingReportStore, ScriptedOrderSource};

    fn income_key() -> ReportKey {
        ReportKey::Income {
            restaurant: 1,
            period: MonthYear::new(3, 2024).unwrap(),
            district: "north".into(),
        }
    }

    type Fixture = (
        ReportMaterializer,
        Arc<MemoryReportStore>,
        Arc<ScriptedOrderSource>,
    );

    fn setup(source: ScriptedOrderSource) -> Fixture {
        let store = Arc::new(MemoryReportStore::new());
        let source = Arc::new(source);
        let materializer = ReportMaterializer::new(store.clone(), source.clone());
        (materializer, store, source)
    }

    #[test]
    fn miss_computes_and_stores() {
        let (m, store, _) = setup(ScriptedOrderSource::new(vec![
            raw_order("2024-03-02 12:00:00", 40),
            raw_order("2024-03-10 12:00:00", 60),
        ]));
        let key = income_key();

        let result = m.get_or_compute(&key).unwrap();
        assert_eq!(result.provenance, Provenance::Computed);
        assert_eq!(
            result.report,
            AggregateRecord::Income(IncomeReport {
                weeks: [40, 60, 0, 0]
            })
        );
        assert_eq!(store.get(&key).unwrap(), Some(result.report));
    }

    #[test]
    fn hit_skips_raw_query() {
        let (m, _, source) = setup(ScriptedOrderSource::new(vec![raw_order(
            "2024-03-02 12:00:00",
            40,
        )]));
        let key = income_key();

        let first = m.get_or_compute(&key).unwrap();
        let second = m.get_or_compute(&key).unwrap();
        assert_eq!(second.provenance, Provenance::Cached);
        assert_eq!(first.report, second.report);
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn eviction_then_recompute_is_identical() {
        let (m, _, source) = setup(ScriptedOrderSource::new(vec![
            raw_order("2024-03-02 12:00:00", 40),
            raw_order("2024-03-20 12:00:00", 15),
        ]));
        let key = income_key();

        let first = m.get_or_compute(&key).unwrap();
        assert!(m.evict(&key).unwrap());
        assert!(!m.evict(&key).unwrap());
        let again = m.get_or_compute(&key).unwrap();
        assert_eq!(again.provenance, Provenance::Computed);
        assert_eq!(again.report, first.report);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn empty_window_stores_zero_record() {
        let (m, store, _) = setup(ScriptedOrderSource::new(vec![]));
        let key = ReportKey::QuarterIncome {
            restaurant: 1,
            period: QuarterPeriod::parse("Q1", 2024).unwrap(),
        };
        let result = m.get_or_compute(&key).unwrap();
        assert_eq!(result.provenance, Provenance::Empty);
        assert!(store.get(&key).unwrap().is_some());
    }

    #[test]
    fn failed_query_returns_zero_without_storing() {
        let (m, store, _) = setup(ScriptedOrderSource::failing("ledger offline"));
        let key = income_key();

        let result = m.get_or_compute(&key).unwrap();
        assert_eq!(result.provenance, Provenance::ComputationFailed);
        assert_eq!(result.report, AggregateRecord::Income(IncomeReport::default()));
        assert_eq!(store.get(&key).unwrap(), None);
    }

    #[test]
    fn recompute_overwrites_cached_row() {
        let store = Arc::new(MemoryReportStore::new());
        let key = income_key();
        store
            .upsert(
                &key,
                &AggregateRecord::Income(IncomeReport {
                    weeks: [1, 1, 1, 1],
                }),
            )
            .unwrap();
        let source = Arc::new(ScriptedOrderSource::new(vec![raw_order(
            "2024-03-02 12:00:00",
            9,
        )]));
        let m = ReportMaterializer::new(store.clone(), source);

        let refreshed = m.recompute(&key).unwrap();
        assert_eq!(
            refreshed.report,
            AggregateRecord::Income(IncomeReport {
                weeks: [9, 0, 0, 0]
            })
        );
        assert_eq!(store.get(&key).unwrap(), Some(refreshed.report));
    }

    #[test]
    fn store_failures_propagate() {
        let m = ReportMaterializer::new(
            Arc::new(FailingReportStore),
            Arc::new(ScriptedOrderSource::new(vec![])),
        );
        assert!(m.get_or_compute(&income_key()).is_err());
    }
}
