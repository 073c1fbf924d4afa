//! Report keys, aggregate records, and the raw ledger rows they are built from.
//!
//! Every report kind has its own key shape. A key determines the time window
//! and the ledger filter its aggregate is computed over, so two requests for
//! the same key always read the same raw rows.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{CustomerNumber, OrderId, RestaurantNumber};
use super::order::CategoryQuantities;
use super::period::{MonthYear, QuarterPeriod};
use super::timestamp::TimeWindow;

/// Number of buckets in the quarter distribution.
pub const DISTRIBUTION_BUCKETS: usize = 10;

/// Number of seven-day windows in the quarter income report.
pub const QUARTER_WEEKS: usize = 12;

/// Number of week buckets in monthly reports.
pub const MONTH_WEEKS: usize = 4;

/// The five report families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    OrderMix,
    Income,
    Performance,
    QuarterDistribution,
    QuarterIncome,
}

impl ReportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderMix => "order-mix",
            Self::Income => "income",
            Self::Performance => "performance",
            Self::QuarterDistribution => "quarter-distribution",
            Self::QuarterIncome => "quarter-income",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one cached aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportKey {
    OrderMix {
        district: String,
        restaurant: RestaurantNumber,
        period: MonthYear,
    },
    Income {
        restaurant: RestaurantNumber,
        period: MonthYear,
        district: String,
    },
    Performance {
        district: String,
        period: MonthYear,
    },
    QuarterDistribution {
        restaurant: RestaurantNumber,
        period: QuarterPeriod,
    },
    QuarterIncome {
        restaurant: RestaurantNumber,
        period: QuarterPeriod,
    },
}

impl ReportKey {
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::OrderMix { .. } => ReportKind::OrderMix,
            Self::Income { .. } => ReportKind::Income,
            Self::Performance { .. } => ReportKind::Performance,
            Self::QuarterDistribution { .. } => ReportKind::QuarterDistribution,
            Self::QuarterIncome { .. } => ReportKind::QuarterIncome,
        }
    }

    /// The time range whose orders feed this report.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        match self {
            Self::OrderMix { period, .. }
            | Self::Income { period, .. }
            | Self::Performance { period, .. } => period.window(),
            Self::QuarterDistribution { period, .. } | Self::QuarterIncome { period, .. } => {
                period.window()
            }
        }
    }

    /// Ledger filter for the raw rows of this report.
    ///
    /// Monthly reports only count orders of active customers in the key's
    /// district; quarter reports count every order of the restaurant.
    #[must_use]
    pub fn ledger_query(&self) -> LedgerQuery {
        let window = self.window();
        match self {
            Self::OrderMix {
                district,
                restaurant,
                ..
            }
            | Self::Income {
                district,
                restaurant,
                ..
            } => LedgerQuery {
                window,
                restaurant: Some(*restaurant),
                district: Some(district.clone()),
                active_customers_only: true,
            },
            Self::Performance { district, .. } => LedgerQuery {
                window,
                restaurant: None,
                district: Some(district.clone()),
                active_customers_only: true,
            },
            Self::QuarterDistribution { restaurant, .. } | Self::QuarterIncome { restaurant, .. } => {
                LedgerQuery {
                    window,
                    restaurant: Some(*restaurant),
                    district: None,
                    active_customers_only: false,
                }
            }
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderMix {
                district,
                restaurant,
                period,
            } => write!(f, "order-mix[{district}, {restaurant}, {period}]"),
            Self::Income {
                restaurant,
                period,
                district,
            } => write!(f, "income[{restaurant}, {period}, {district}]"),
            Self::Performance { district, period } => {
                write!(f, "performance[{district}, {period}]")
            }
            Self::QuarterDistribution { restaurant, period } => {
                write!(f, "quarter-distribution[{restaurant}, {period}]")
            }
            Self::QuarterIncome { restaurant, period } => {
                write!(f, "quarter-income[{restaurant}, {period}]")
            }
        }
    }
}

/// Filter applied to the order ledger when computing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerQuery {
    pub window: TimeWindow,
    pub restaurant: Option<RestaurantNumber>,
    pub district: Option<String>,
    pub active_customers_only: bool,
}

/// One historical order as seen by the report engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOrder {
    pub order_id: OrderId,
    pub customer: CustomerNumber,
    pub district: String,
    pub restaurant: RestaurantNumber,
    /// Charged amount in whole currency units.
    pub total_price: i32,
    pub quantities: CategoryQuantities,
    pub is_late: bool,
    pub ordered_at: NaiveDateTime,
}

/// Dish counts per category for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMixReport {
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
}

/// Income per aligned week of month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
    pub weeks: [i32; MONTH_WEEKS],
}

/// Late-delivery percentage per day range of the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub weeks: [i32; MONTH_WEEKS],
}

/// How many days of the quarter fell into each orders-per-day bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterDistribution {
    pub max_orders_per_day: i32,
    pub intervals: [String; DISTRIBUTION_BUCKETS],
    pub counts: [i32; DISTRIBUTION_BUCKETS],
}

/// Income per seven-day window of the quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterIncome {
    pub total_income: i32,
    pub weeks: [i32; QUARTER_WEEKS],
}

/// Any one of the five report shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AggregateRecord {
    OrderMix(OrderMixReport),
    Income(IncomeReport),
    Performance(PerformanceReport),
    QuarterDistribution(QuarterDistribution),
    QuarterIncome(QuarterIncome),
}

impl AggregateRecord {
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::OrderMix(_) => ReportKind::OrderMix,
            Self::Income(_) => ReportKind::Income,
            Self::Performance(_) => ReportKind::Performance,
            Self::QuarterDistribution(_) => ReportKind::QuarterDistribution,
            Self::QuarterIncome(_) => ReportKind::QuarterIncome,
        }
    }

    /// Check that this record can be stored under `key`.
    ///
    /// # Errors
    /// Returns [`DomainError::ReportKindMismatch`] when the kinds differ.
    pub fn ensure_matches(&self, key: &ReportKey) -> Result<(), DomainError> {
        if self.kind() == key.kind() {
            Ok(())
        } else {
            Err(DomainError::ReportKindMismatch {
                key: key.kind(),
                record: self.kind(),
            })
        }
    }
}

/// Where a returned aggregate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Found in the report store.
    Cached,
    /// Computed from raw rows and stored.
    Computed,
    /// The window had no rows; a zero record was stored.
    Empty,
    /// The raw query failed; a zero record is returned and nothing is stored.
    ComputationFailed,
}

/// An aggregate together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Materialized {
    pub provenance: Provenance,
    pub report: AggregateRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn march() -> MonthYear {
        MonthYear::new(3, 2024).unwrap()
    }

    #[test]
    fn monthly_keys_filter_active_customers_of_district() {
        let key = ReportKey::OrderMix {
            district: "north".into(),
            restaurant: 7,
            period: march(),
        };
        let query = key.ledger_query();
        assert_eq!(query.restaurant, Some(7));
        assert_eq!(query.district.as_deref(), Some("north"));
        assert!(query.active_customers_only);
    }

    #[test]
    fn performance_spans_all_restaurants() {
        let key = ReportKey::Performance {
            district: "south".into(),
            period: march(),
        };
        let query = key.ledger_query();
        assert_eq!(query.restaurant, None);
        assert!(query.active_customers_only);
    }

    #[test]
    fn quarter_keys_ignore_district_and_status() {
        let key = ReportKey::QuarterIncome {
            restaurant: 3,
            period: QuarterPeriod::parse("Q2", 2024).unwrap(),
        };
        let query = key.ledger_query();
        assert_eq!(query.district, None);
        assert!(!query.active_customers_only);
        assert_eq!(
            query.window.start.date(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
    }

    #[test]
    fn record_kind_must_match_key() {
        let key = ReportKey::Performance {
            district: "south".into(),
            period: march(),
        };
        let record = AggregateRecord::Income(IncomeReport::default());
        assert_eq!(
            record.ensure_matches(&key),
            Err(DomainError::ReportKindMismatch {
                key: ReportKind::Performance,
                record: ReportKind::Income,
            })
        );
    }

    #[test]
    fn key_display_is_readable() {
        let key = ReportKey::Income {
            restaurant: 2,
            period: march(),
            district: "east".into(),
        };
        assert_eq!(key.to_string(), "income[2, 3/2024, east]");
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let record = AggregateRecord::OrderMix(OrderMixReport {
            salad: 1,
            main_course: 2,
            dessert: 3,
            drink: 4,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "order-mix");
        assert_eq!(json["main_course"], 2);
    }
}
