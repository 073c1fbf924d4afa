//! In-memory report store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::report::{AggregateRecord, ReportKey};
use crate::error::Result;
use crate::port::outbound::report::ReportStore;

/// Report cache backed by a map.
#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<ReportKey, AggregateRecord>>,
}

impl MemoryReportStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached aggregates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for MemoryReportStore {
    fn get(&self, key: &ReportKey) -> Result<Option<AggregateRecord>> {
        Ok(self.reports.read().get(key).cloned())
    }

    fn upsert(&self, key: &ReportKey, record: &AggregateRecord) -> Result<()> {
        record.ensure_matches(key)?;
        self.reports.write().insert(key.clone(), record.clone());
        Ok(())
    }

    fn evict(&self, key: &ReportKey) -> Result<bool> {
        Ok(self.reports.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::MonthYear;
    use crate::domain::report::{OrderMixReport, PerformanceReport};
    use crate::error::Error;

    fn key() -> ReportKey {
        ReportKey::Performance {
            district: "north".into(),
            period: MonthYear::new(5, 2024).unwrap(),
        }
    }

    #[test]
    fn upsert_replaces_instead_of_appending() {
        let store = MemoryReportStore::new();
        store
            .upsert(&key(), &AggregateRecord::Performance(PerformanceReport { weeks: [1, 2, 3, 4] }))
            .unwrap();
        store
            .upsert(&key(), &AggregateRecord::Performance(PerformanceReport { weeks: [5, 6, 7, 8] }))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&key()).unwrap(),
            Some(AggregateRecord::Performance(PerformanceReport { weeks: [5, 6, 7, 8] }))
        );
    }

    #[test]
    fn mismatched_record_is_rejected() {
        let store = MemoryReportStore::new();
        let err = store
            .upsert(&key(), &AggregateRecord::OrderMix(OrderMixReport::default()))
            .unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn evict_reports_presence() {
        let store = MemoryReportStore::new();
        assert!(!store.evict(&key()).unwrap());
        store
            .upsert(&key(), &AggregateRecord::Performance(PerformanceReport::default()))
            .unwrap();
        assert!(store.evict(&key()).unwrap());
        assert_eq!(store.get(&key()).unwrap(), None);
    }
}
