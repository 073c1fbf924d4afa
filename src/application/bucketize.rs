//! Pure functions turning raw ledger rows into report aggregates.
//!
//! Every function here depends only on its input rows, so recomputing a key
//! from the same rows reproduces the stored record exactly. Sums saturate at
//! `i32::MAX` instead of wrapping.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::report::{
    AggregateRecord, IncomeReport, OrderMixReport, PerformanceReport, QuarterDistribution,
    QuarterIncome, RawOrder, ReportKey, DISTRIBUTION_BUCKETS, MONTH_WEEKS,
};

const DAYS_PER_WEEK: i64 = 7;

/// Compute the aggregate for `key` from rows already filtered to its query.
#[must_use]
pub fn bucketize(key: &ReportKey, orders: &[RawOrder]) -> AggregateRecord {
    match key {
        ReportKey::OrderMix { .. } => AggregateRecord::OrderMix(order_mix(orders)),
        ReportKey::Income { .. } => AggregateRecord::Income(income(orders)),
        ReportKey::Performance { .. } => AggregateRecord::Performance(performance(orders)),
        ReportKey::QuarterDistribution { .. } => {
            AggregateRecord::QuarterDistribution(quarter_distribution(orders))
        }
        ReportKey::QuarterIncome { period, .. } => {
            AggregateRecord::QuarterIncome(quarter_income(period.first_day(), orders))
        }
    }
}

/// The all-zero record for `key`.
#[must_use]
pub fn zero(key: &ReportKey) -> AggregateRecord {
    bucketize(key, &[])
}

/// Sum dish quantities per category.
#[must_use]
pub fn order_mix(orders: &[RawOrder]) -> OrderMixReport {
    orders
        .iter()
        .fold(OrderMixReport::default(), |mut report, order| {
            report.salad = report.salad.saturating_add(order.quantities.salad);
            report.main_course = report.main_course.saturating_add(order.quantities.main_course);
            report.dessert = report.dessert.saturating_add(order.quantities.dessert);
            report.drink = report.drink.saturating_add(order.quantities.drink);
            report
        })
}

/// Week of the month counting from day 1: days 1–7 are week 1, 29–31 week 5.
#[must_use]
pub fn aligned_week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Income per aligned week; orders in week 5 are dropped.
#[must_use]
pub fn income(orders: &[RawOrder]) -> IncomeReport {
    let mut report = IncomeReport::default();
    for order in orders {
        let week = aligned_week_of_month(order.ordered_at.date()) as usize;
        if let Some(bucket) = report.weeks.get_mut(week - 1) {
            *bucket = bucket.saturating_add(order.total_price);
        }
    }
    report
}

/// Day range of the month: 1–7, 8–14, 15–21, then 22 to month end.
fn performance_range(date: NaiveDate) -> usize {
    (((date.day() - 1) / 7) as usize).min(MONTH_WEEKS - 1)
}

/// Percentage of late orders per day range, rounded half up.
#[must_use]
pub fn performance(orders: &[RawOrder]) -> PerformanceReport {
    let mut late = [0i64; MONTH_WEEKS];
    let mut total = [0i64; MONTH_WEEKS];
    for order in orders {
        let range = performance_range(order.ordered_at.date());
        total[range] += 1;
        if order.is_late {
            late[range] += 1;
        }
    }

    let mut report = PerformanceReport::default();
    for (slot, (late, total)) in report.weeks.iter_mut().zip(late.iter().zip(total.iter())) {
        *slot = late_percentage(*late, *total);
    }
    report
}

fn late_percentage(late: i64, total: i64) -> i32 {
    if total == 0 {
        return 0;
    }
    // round(100 * late / total) with halves going up
    let pct = (200 * late + total) / (2 * total);
    i32::try_from(pct).unwrap_or(100)
}

/// Inclusive `[lo, hi]` bounds of the ten distribution buckets.
///
/// Below ten orders per day the buckets are unit width and overlap at their
/// edges, and the last one is `9-max` even when `max < 9`.
#[must_use]
pub fn distribution_bounds(max_orders_per_day: i32) -> [(i32, i32); DISTRIBUTION_BUCKETS] {
    let mut bounds = [(0, 0); DISTRIBUTION_BUCKETS];
    let last = DISTRIBUTION_BUCKETS - 1;
    if max_orders_per_day < 10 {
        for (i, bound) in bounds.iter_mut().enumerate().take(last) {
            let lo = i as i32;
            *bound = (lo, lo + 1);
        }
        bounds[last] = (9, max_orders_per_day);
    } else {
        let size = max_orders_per_day / 10;
        for (i, bound) in bounds.iter_mut().enumerate().take(last) {
            let i = i as i32;
            *bound = (i * size, (i + 1) * size - 1);
        }
        bounds[last] = (9 * size, max_orders_per_day);
    }
    bounds
}

/// Orders per calendar day and how many days fall into each bucket.
#[must_use]
pub fn quarter_distribution(orders: &[RawOrder]) -> QuarterDistribution {
    let mut per_day: BTreeMap<NaiveDate, i32> = BTreeMap::new();
    for order in orders {
        let count = per_day.entry(order.ordered_at.date()).or_default();
        *count = count.saturating_add(1);
    }
    let max_orders_per_day = per_day.values().copied().max().unwrap_or(0);

    let bounds = distribution_bounds(max_orders_per_day);
    let mut report = QuarterDistribution {
        max_orders_per_day,
        ..QuarterDistribution::default()
    };
    for (i, (lo, hi)) in bounds.iter().enumerate() {
        report.intervals[i] = format!("{lo}-{hi}");
        let days = per_day
            .values()
            .filter(|count| (*lo..=*hi).contains(*count))
            .count();
        report.counts[i] = i32::try_from(days).unwrap_or(i32::MAX);
    }
    report
}

/// Income per seven-day window starting at `quarter_start`.
///
/// Orders past the twelfth window still count toward the total.
#[must_use]
pub fn quarter_income(quarter_start: NaiveDate, orders: &[RawOrder]) -> QuarterIncome {
    let mut report = QuarterIncome::default();
    for order in orders {
        report.total_income = report.total_income.saturating_add(order.total_price);
        let offset = (order.ordered_at.date() - quarter_start).num_days();
        if offset < 0 {
            continue;
        }
        let week = (offset / DAYS_PER_WEEK) as usize;
        if let Some(bucket) = report.weeks.get_mut(week) {
            *bucket = bucket.saturating_add(order.total_price);
        }
    }
    report
}
