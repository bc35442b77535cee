//! Trend tracking over weekly checkups.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::score::ScoreResult;

/// Maximum number of months reported by [`monthly_trend`].
pub const TREND_MONTHS: usize = 6;

/// Days between weekly checkups.
pub const CHECKUP_INTERVAL_DAYS: i64 = 7;

/// Percentage change from `previous` to `current`.
///
/// `None` when there is no previous figure or it is zero.
pub fn percent_change(current: f64, previous: Option<f64>) -> Option<f64> {
    match previous {
        Some(prev) if prev != 0.0 => Some((current - prev) / prev * 100.0),
        _ => None,
    }
}

/// A scored weekly checkup and the local date it was submitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    pub submitted_on: NaiveDate,
    pub result: ScoreResult,
}

impl WeeklyRecord {
    pub fn new(submitted_on: NaiveDate, result: ScoreResult) -> Self {
        Self {
            submitted_on,
            result,
        }
    }

    pub fn monthly_estimate(&self) -> f64 {
        self.result.monthly_footprint()
    }
}

/// Average monthly estimate for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// e.g. "Mar 2026"
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub average_estimate: f64,
    /// Number of checkups averaged
    pub weeks: usize,
}

/// Group checkups by calendar month and average their monthly estimates.
///
/// Returns the [`TREND_MONTHS`] most recent months, oldest first. An empty
/// input gives an empty trend.
pub fn monthly_trend(records: &[WeeklyRecord]) -> Vec<TrendPoint> {
    monthly_trend_limited(records, TREND_MONTHS)
}

pub fn monthly_trend_limited(records: &[WeeklyRecord], max_months: usize) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for record in records {
        let key = (record.submitted_on.year(), record.submitted_on.month());
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += record.monthly_estimate();
        entry.1 += 1;
    }

    let skip = groups.len().saturating_sub(max_months);
    groups
        .into_iter()
        .skip(skip)
        .filter_map(|((year, month), (sum, weeks))| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(TrendPoint {
                label: first.format("%b %Y").to_string(),
                year,
                month,
                average_estimate: sum / weeks as f64,
                weeks,
            })
        })
        .collect()
}

/// One row of the checkup history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub submitted_on: NaiveDate,
    pub adjusted_total: f64,
    /// Change against the checkup before this one
    pub percent_change: Option<f64>,
    pub monthly_estimate: f64,
}

/// History rows, newest first, each compared with the checkup preceding it.
///
/// `records` must be ordered oldest first.
pub fn checkup_history(records: &[WeeklyRecord]) -> Vec<HistoryRow> {
    let mut previous: Option<f64> = None;
    let mut rows: Vec<HistoryRow> = records
        .iter()
        .map(|record| {
            let total = record.result.adjusted_total;
            let row = HistoryRow {
                submitted_on: record.submitted_on,
                adjusted_total: total,
                percent_change: percent_change(total, previous),
                monthly_estimate: record.monthly_estimate(),
            };
            previous = Some(total);
            row
        })
        .collect();
    rows.reverse();
    rows
}

/// Chart series for the most recent checkups, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    /// e.g. "Mar 07"
    pub labels: Vec<String>,
    pub weekly_totals: Vec<f64>,
    pub monthly_estimates: Vec<f64>,
}

impl WeeklySeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The last `n` checkups (oldest first input), as chart series.
pub fn recent_series(records: &[WeeklyRecord], n: usize) -> WeeklySeries {
    let start = records.len().saturating_sub(n);
    let mut series = WeeklySeries::default();
    for record in &records[start..] {
        series.labels.push(record.submitted_on.format("%b %d").to_string());
        series.weekly_totals.push(record.result.adjusted_total);
        series.monthly_estimates.push(record.monthly_estimate());
    }
    series
}

/// When the next weekly checkup is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckupReminder {
    /// `None` before the first checkup
    pub days_since_last: Option<i64>,
    /// 0 means due now
    pub days_until_next: i64,
}

/// A first checkup is due immediately. A checkup dated after `today`
/// counts as taken today.
pub fn checkup_reminder(last_checkup: Option<NaiveDate>, today: NaiveDate) -> CheckupReminder {
    let days_since_last = last_checkup.map(|d| (today - d).num_days().max(0));
    let days_until_next = match days_since_last {
        Some(days) => (CHECKUP_INTERVAL_DAYS - days).max(0),
        None => 0,
    };
    CheckupReminder {
        days_since_last,
        days_until_next,
    }
}
