//! SQLite report cache.
//!
//! One table per report kind, keyed by the report's dimensions. Writes use
//! `REPLACE INTO`, so recomputing a key overwrites its row.

use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    IncomeReportRow, OrderMixReportRow, PerformanceReportRow, QuarterDistributionRow,
    QuarterIncomeRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    income_reports, order_mix_reports, performance_reports, quarter_distribution_reports,
    quarter_income_reports,
};
use crate::domain::error::DomainError;
use crate::domain::report::{
    AggregateRecord, IncomeReport, OrderMixReport, PerformanceReport, QuarterDistribution,
    QuarterIncome, ReportKey,
};
use crate::error::{Error, Result};
use crate::port::outbound::report::ReportStore;

/// SQLite-backed report store.
pub struct SqliteReportStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteReportStore {
    /// Create a new SQLite report store with the given connection pool.
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
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Parse(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| Error::Parse(e.to_string()))
}

impl ReportStore for SqliteReportStore {
    fn get(&self, key: &ReportKey) -> Result<Option<AggregateRecord>> {
        let mut conn = self.connection()?;

        let record = match key {
            ReportKey::OrderMix {
                district,
                restaurant,
                period,
            } => order_mix_reports::table
                .find((district.as_str(), *restaurant, period.to_string()))
                .select(OrderMixReportRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?
                .map(|row| {
                    AggregateRecord::OrderMix(OrderMixReport {
                        salad: row.salad,
                        main_course: row.main_course,
                        dessert: row.dessert,
                        drink: row.drink,
                    })
                }),
            ReportKey::Income {
                restaurant,
                period,
                district,
            } => income_reports::table
                .find((*restaurant, period.to_string(), district.as_str()))
                .select(IncomeReportRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?
                .map(|row| {
                    AggregateRecord::Income(IncomeReport {
                        weeks: [row.week1, row.week2, row.week3, row.week4],
                    })
                }),
            ReportKey::Performance { district, period } => performance_reports::table
                .find((district.as_str(), period.to_string()))
                .select(PerformanceReportRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?
                .map(|row| {
                    AggregateRecord::Performance(PerformanceReport {
                        weeks: [row.week1, row.week2, row.week3, row.week4],
                    })
                }),
            ReportKey::QuarterDistribution { restaurant, period } => {
                let row: Option<QuarterDistributionRow> = quarter_distribution_reports::table
                    .find((*restaurant, period.quarter().as_str(), period.year()))
                    .select(QuarterDistributionRow::as_select())
                    .first(&mut conn)
                    .optional()
                    .map_err(|e| Error::Database(e.to_string()))?;
                row.map(|row| -> Result<AggregateRecord> {
                    Ok(AggregateRecord::QuarterDistribution(QuarterDistribution {
                        max_orders_per_day: row.max_orders_per_day,
                        intervals: from_json(&row.intervals)?,
                        counts: from_json(&row.counts)?,
                    }))
                })
                .transpose()?
            }
            ReportKey::QuarterIncome { restaurant, period } => {
                let row: Option<QuarterIncomeRow> = quarter_income_reports::table
                    .find((*restaurant, period.quarter().as_str(), period.year()))
                    .select(QuarterIncomeRow::as_select())
                    .first(&mut conn)
                    .optional()
                    .map_err(|e| Error::Database(e.to_string()))?;
                row.map(|row| -> Result<AggregateRecord> {
                    Ok(AggregateRecord::QuarterIncome(QuarterIncome {
                        total_income: row.total_income,
                        weeks: from_json(&row.weeks)?,
                    }))
                })
                .transpose()?
            }
        };

        Ok(record)
    }

    fn upsert(&self, key: &ReportKey, record: &AggregateRecord) -> Result<()> {
        let mut conn = self.connection()?;

        let written = match (key, record) {
            (
                ReportKey::OrderMix {
                    district,
                    restaurant,
                    period,
                },
                AggregateRecord::OrderMix(report),
            ) => diesel::replace_into(order_mix_reports::table)
                .values(&OrderMixReportRow {
                    district: district.clone(),
                    restaurant_number: *restaurant,
                    month_year: period.to_string(),
                    salad: report.salad,
                    main_course: report.main_course,
                    dessert: report.dessert,
                    drink: report.drink,
                })
                .execute(&mut conn),
            (
                ReportKey::Income {
                    restaurant,
                    period,
                    district,
                },
                AggregateRecord::Income(report),
            ) => {
                let [week1, week2, week3, week4] = report.weeks;
                diesel::replace_into(income_reports::table)
                    .values(&IncomeReportRow {
                        restaurant_number: *restaurant,
                        month_year: period.to_string(),
                        district: district.clone(),
                        week1,
                        week2,
                        week3,
                        week4,
                    })
                    .execute(&mut conn)
            }
            (ReportKey::Performance { district, period }, AggregateRecord::Performance(report)) => {
                let [week1, week2, week3, week4] = report.weeks;
                diesel::replace_into(performance_reports::table)
                    .values(&PerformanceReportRow {
                        district: district.clone(),
                        month_year: period.to_string(),
                        week1,
                        week2,
                        week3,
                        week4,
                    })
                    .execute(&mut conn)
            }
            (
                ReportKey::QuarterDistribution { restaurant, period },
                AggregateRecord::QuarterDistribution(report),
            ) => diesel::replace_into(quarter_distribution_reports::table)
                .values(&QuarterDistributionRow {
                    restaurant_number: *restaurant,
                    quarter: period.quarter().to_string(),
                    year: period.year(),
                    max_orders_per_day: report.max_orders_per_day,
                    intervals: to_json(&report.intervals)?,
                    counts: to_json(&report.counts)?,
                })
                .execute(&mut conn),
            (
                ReportKey::QuarterIncome { restaurant, period },
                AggregateRecord::QuarterIncome(report),
            ) => diesel::replace_into(quarter_income_reports::table)
                .values(&QuarterIncomeRow {
                    restaurant_number: *restaurant,
                    quarter: period.quarter().to_string(),
                    year: period.year(),
                    total_income: report.total_income,
                    weeks: to_json(&report.weeks)?,
                })
                .execute(&mut conn),
            _ => {
                return Err(DomainError::ReportKindMismatch {
                    key: key.kind(),
                    record: record.kind(),
                }
                .into())
            }
        };

        written.map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn evict(&self, key: &ReportKey) -> Result<bool> {
        let mut conn = self.connection()?;

        let deleted = match key {
            ReportKey::OrderMix {
                district,
                restaurant,
                period,
            } => diesel::delete(order_mix_reports::table.find((
                district.as_str(),
                *restaurant,
                period.to_string(),
            )))
            .execute(&mut conn),
            ReportKey::Income {
                restaurant,
                period,
                district,
            } => diesel::delete(income_reports::table.find((
                *restaurant,
                period.to_string(),
                district.as_str(),
            )))
            .execute(&mut conn),
            ReportKey::Performance { district, period } => diesel::delete(
                performance_reports::table.find((district.as_str(), period.to_string())),
            )
            .execute(&mut conn),
            ReportKey::QuarterDistribution { restaurant, period } => {
                diesel::delete(quarter_distribution_reports::table.find((
                    *restaurant,
                    period.quarter().as_str(),
                    period.year(),
                )))
                .execute(&mut conn)
            }
            ReportKey::QuarterIncome { restaurant, period } => {
                diesel::delete(quarter_income_reports::table.find((
                    *restaurant,
                    period.quarter().as_str(),
                    period.year(),
                )))
                .execute(&mut conn)
            }
        }
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bucketize::quarter_distribution;
    use crate::testkit::db::memory_pool;
    use crate::testkit::domain::{month, quarter};

    fn store() -> SqliteReportStore {
        SqliteReportStore::new(memory_pool())
    }

    #[test]
    fn missing_key_reads_none() {
        let key = ReportKey::Performance {
            district: "north".into(),
            period: month("3/2024"),
        };
        assert_eq!(store().get(&key).unwrap(), None);
    }

    #[test]
    fn every_kind_reads_back_what_was_written() {
        let store = store();
        let cases = vec![
            (
                ReportKey::OrderMix {
                    district: "north".into(),
                    restaurant: 1,
                    period: month("3/2024"),
                },
                AggregateRecord::OrderMix(OrderMixReport {
                    salad: 1,
                    main_course: 2,
                    dessert: 3,
                    drink: 4,
                }),
            ),
            (
                ReportKey::Income {
                    restaurant: 1,
                    period: month("3/2024"),
                    district: "north".into(),
                },
                AggregateRecord::Income(IncomeReport {
                    weeks: [10, 20, 30, 40],
                }),
            ),
            (
                ReportKey::Performance {
                    district: "north".into(),
                    period: month("3/2024"),
                },
                AggregateRecord::Performance(PerformanceReport {
                    weeks: [0, 50, 100, 33],
                }),
            ),
            (
                ReportKey::QuarterDistribution {
                    restaurant: 1,
                    period: quarter("Q1/2024"),
                },
                AggregateRecord::QuarterDistribution(quarter_distribution(&[])),
            ),
            (
                ReportKey::QuarterIncome {
                    restaurant: 1,
                    period: quarter("Q1/2024"),
                },
                AggregateRecord::QuarterIncome(QuarterIncome {
                    total_income: 78,
                    weeks: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
                }),
            ),
        ];

        for (key, record) in cases {
            store.upsert(&key, &record).unwrap();
            assert_eq!(store.get(&key).unwrap(), Some(record), "{key}");
        }
    }

    #[test]
    fn upsert_overwrites_existing_row() {
        let store = store();
        let key = ReportKey::Income {
            restaurant: 2,
            period: month("4/2024"),
            district: "south".into(),
        };
        store
            .upsert(&key, &AggregateRecord::Income(IncomeReport { weeks: [1, 1, 1, 1] }))
            .unwrap();
        store
            .upsert(&key, &AggregateRecord::Income(IncomeReport { weeks: [2, 2, 2, 2] }))
            .unwrap();
        assert_eq!(
            store.get(&key).unwrap(),
            Some(AggregateRecord::Income(IncomeReport { weeks: [2, 2, 2, 2] }))
        );
    }

    #[test]
    fn keys_differing_in_year_do_not_collide() {
        let store = store();
        let q2023 = ReportKey::QuarterIncome {
            restaurant: 1,
            period: quarter("Q1/2023"),
        };
        let q2024 = ReportKey::QuarterIncome {
            restaurant: 1,
            period: quarter("Q1/2024"),
        };
        store
            .upsert(&q2023, &AggregateRecord::QuarterIncome(QuarterIncome::default()))
            .unwrap();
        assert_eq!(store.get(&q2024).unwrap(), None);
    }

    #[test]
    fn evict_removes_row() {
        let store = store();
        let key = ReportKey::Performance {
            district: "north".into(),
            period: month("3/2024"),
        };
        store
            .upsert(&key, &AggregateRecord::Performance(PerformanceReport::default()))
            .unwrap();
        assert!(store.evict(&key).unwrap());
        assert!(!store.evict(&key).unwrap());
        assert_eq!(store.get(&key).unwrap(), None);
    }

    #[test]
    fn mismatched_record_is_rejected() {
        let key = ReportKey::Performance {
            district: "north".into(),
            period: month("3/2024"),
        };
        let err = store()
            .upsert(&key, &AggregateRecord::Income(IncomeReport::default()))
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::ReportKindMismatch { .. })));
    }
}
