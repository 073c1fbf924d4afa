//! Report materialization against a file-backed SQLite ledger.

mod harness;

use harness::temp_db::TempDb;
use orderdesk::domain::period::{MonthYear, QuarterPeriod};
use orderdesk::domain::report::{
    AggregateRecord, IncomeReport, OrderMixReport, PerformanceReport, Provenance, ReportKey,
};
use orderdesk::infrastructure::bootstrap::sqlite_service;
use orderdesk::testkit::db::{mark_late, seed_customer, seed_order, seed_restaurant};

fn month(value: &str) -> MonthYear {
    value.parse().unwrap()
}

fn quarter(value: &str) -> QuarterPeriod {
    value.parse().unwrap()
}

fn seeded(name: &str) -> TempDb {
    let db = TempDb::create(name);
    let mut conn = db.conn();
    seed_restaurant(&mut conn, 1, "Grill");
    seed_restaurant(&mut conn, 2, "Deli");
    seed_customer(&mut conn, 10, "north", "active", 0);
    seed_customer(&mut conn, 11, "north", "inactive", 0);
    seed_customer(&mut conn, 12, "south", "active", 0);
    drop(conn);
    db
}

#[test]
fn income_buckets_by_aligned_week_and_drops_day_29_on() {
    let db = seeded("income");
    {
        let mut conn = db.conn();
        seed_order(&mut conn, 10, 1, 10, "2024-03-01 09:00:00");
        seed_order(&mut conn, 10, 1, 20, "2024-03-08 09:00:00");
        seed_order(&mut conn, 10, 1, 30, "2024-03-15 09:00:00");
        seed_order(&mut conn, 10, 1, 40, "2024-03-28 23:59:59");
        seed_order(&mut conn, 10, 1, 50, "2024-03-29 00:00:00");
        seed_order(&mut conn, 11, 1, 99, "2024-03-02 09:00:00");
        seed_order(&mut conn, 12, 1, 99, "2024-03-02 09:00:00");
    }
    let service = sqlite_service(db.pool());
    let key = ReportKey::Income {
        restaurant: 1,
        period: month("3/2024"),
        district: "north".into(),
    };

    let report = service.reports().get_or_compute(&key).unwrap();
    assert_eq!(report.provenance, Provenance::Computed);
    assert_eq!(
        report.report,
        AggregateRecord::Income(IncomeReport {
            weeks: [10, 20, 30, 40]
        })
    );
}

#[test]
fn order_mix_counts_active_district_orders() {
    let db = seeded("order-mix");
    {
        let mut conn = db.conn();
        seed_order(&mut conn, 10, 1, 10, "2024-03-01 09:00:00");
        seed_order(&mut conn, 10, 1, 10, "2024-03-20 09:00:00");
        seed_order(&mut conn, 11, 1, 10, "2024-03-20 09:00:00");
        seed_order(&mut conn, 10, 2, 10, "2024-03-20 09:00:00");
    }
    let service = sqlite_service(db.pool());
    let key = ReportKey::OrderMix {
        district: "north".into(),
        restaurant: 1,
        period: month("3/2024"),
    };

    let report = service.reports().get_or_compute(&key).unwrap();
    assert_eq!(
        report.report,
        AggregateRecord::OrderMix(OrderMixReport {
            main_course: 2,
            ..OrderMixReport::default()
        })
    );
}

#[test]
fn performance_stays_within_bounds() {
    let db = seeded("performance");
    {
        let mut conn = db.conn();
        let late = seed_order(&mut conn, 10, 1, 10, "2024-03-02 09:00:00");
        mark_late(&mut conn, late);
        seed_order(&mut conn, 10, 1, 10, "2024-03-03 09:00:00");
        seed_order(&mut conn, 10, 2, 10, "2024-03-04 09:00:00");
        let late = seed_order(&mut conn, 10, 2, 10, "2024-03-30 09:00:00");
        mark_late(&mut conn, late);
    }
    let service = sqlite_service(db.pool());
    let key = ReportKey::Performance {
        district: "north".into(),
        period: month("3/2024"),
    };

    let report = service.reports().get_or_compute(&key).unwrap();
    let AggregateRecord::Performance(PerformanceReport { weeks }) = report.report else {
        panic!("expected a performance report");
    };
    assert_eq!(weeks, [33, 0, 0, 100]);
    assert!(weeks.iter().all(|pct| (0..=100).contains(pct)));
}

#[test]
fn quarter_distribution_counts_every_active_day() {
    let db = seeded("distribution");
    {
        let mut conn = db.conn();
        for _ in 0..20 {
            seed_order(&mut conn, 10, 1, 5, "2024-01-10 12:00:00");
        }
        for _ in 0..3 {
            seed_order(&mut conn, 12, 1, 5, "2024-02-10 12:00:00");
        }
        seed_order(&mut conn, 11, 1, 5, "2024-03-31 12:00:00");
        seed_order(&mut conn, 10, 1, 5, "2024-04-01 00:00:00");
    }
    let service = sqlite_service(db.pool());
    let key = ReportKey::QuarterDistribution {
        restaurant: 1,
        period: quarter("Q1/2024"),
    };

    let report = service.reports().get_or_compute(&key).unwrap();
    let AggregateRecord::QuarterDistribution(distribution) = report.report else {
        panic!("expected a distribution");
    };
    assert_eq!(distribution.max_orders_per_day, 20);
    assert_eq!(distribution.intervals[0], "0-1");
    assert_eq!(distribution.intervals[1], "2-3");
    assert_eq!(distribution.intervals[9], "18-20");
    assert_eq!(distribution.counts[0], 1);
    assert_eq!(distribution.counts[1], 1);
    assert_eq!(distribution.counts[9], 1);
    assert_eq!(distribution.counts.iter().sum::<i32>(), 3);
}

#[test]
fn quarter_income_conserves_within_twelve_weeks() {
    let db = seeded("quarter-income");
    {
        let mut conn = db.conn();
        seed_order(&mut conn, 10, 1, 100, "2024-01-01 08:00:00");
        seed_order(&mut conn, 12, 1, 50, "2024-01-08 08:00:00");
        seed_order(&mut conn, 11, 1, 25, "2024-03-24 08:00:00");
        seed_order(&mut conn, 10, 1, 7, "2024-03-30 08:00:00");
    }
    let service = sqlite_service(db.pool());
    let key = ReportKey::QuarterIncome {
        restaurant: 1,
        period: quarter("Q1/2024"),
    };

    let report = service.reports().get_or_compute(&key).unwrap();
    let AggregateRecord::QuarterIncome(income) = report.report else {
        panic!("expected quarter income");
    };
    assert_eq!(income.total_income, 182);
    assert_eq!(income.weeks[0], 100);
    assert_eq!(income.weeks[1], 50);
    assert_eq!(income.weeks[11], 25);
    assert_eq!(income.weeks.iter().sum::<i32>(), 175);
}

#[test]
fn cached_rows_survive_a_new_service() {
    let db = seeded("cache");
    db_order(&db, "2024-03-05 10:00:00");
    let key = ReportKey::Income {
        restaurant: 1,
        period: month("3/2024"),
        district: "north".into(),
    };

    let first = sqlite_service(db.pool())
        .reports()
        .get_or_compute(&key)
        .unwrap();
    assert_eq!(first.provenance, Provenance::Computed);

    // New rows do not invalidate the cache.
    db_order(&db, "2024-03-06 10:00:00");

    let second = sqlite_service(db.pool())
        .reports()
        .get_or_compute(&key)
        .unwrap();
    assert_eq!(second.provenance, Provenance::Cached);
    assert_eq!(second.report, first.report);

    let refreshed = sqlite_service(db.pool())
        .reports()
        .materialize(&key, true)
        .unwrap();
    assert_eq!(refreshed.provenance, Provenance::Computed);
    assert_eq!(
        refreshed.report,
        AggregateRecord::Income(IncomeReport {
            weeks: [40, 0, 0, 0]
        })
    );
}

#[test]
fn eviction_then_recompute_is_identical() {
    let db = seeded("evict");
    db_order(&db, "2024-03-05 10:00:00");
    let service = sqlite_service(db.pool());
    let key = ReportKey::QuarterIncome {
        restaurant: 1,
        period: quarter("Q1/2024"),
    };

    let first = service.reports().get_or_compute(&key).unwrap();
    assert!(service.reports().evict(&key).unwrap());
    assert!(!service.reports().evict(&key).unwrap());
    let second = service.reports().get_or_compute(&key).unwrap();

    assert_eq!(second.provenance, Provenance::Computed);
    assert_eq!(first.report, second.report);
}

#[test]
fn empty_window_stores_zero_record() {
    let db = seeded("empty");
    let service = sqlite_service(db.pool());
    let key = ReportKey::OrderMix {
        district: "south".into(),
        restaurant: 2,
        period: month("12/2023"),
    };

    let first = service.reports().get_or_compute(&key).unwrap();
    assert_eq!(first.provenance, Provenance::Empty);
    assert_eq!(
        first.report,
        AggregateRecord::OrderMix(OrderMixReport::default())
    );

    let second = service.reports().get_or_compute(&key).unwrap();
    assert_eq!(second.provenance, Provenance::Cached);
}

fn db_order(db: &TempDb, ordered_at: &str) {
    let mut conn = db.conn();
    seed_order(&mut conn, 10, 1, 20, ordered_at);
}
