// Seasonal factors: per-bucket mean over overall mean, grouped by
// day-of-week, day-of-month bucket and month. A group only counts when its
// buckets actually deviate from flat.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::model::TimeSeriesPoint;
use crate::stats;

const MIN_DOW_POINTS: usize = 14;
const MIN_DOM_POINTS: usize = 60;
const MIN_MONTH_POINTS: usize = 365;
/// A factor group is dropped unless some bucket deviates from 1 by more.
const KEEP_DEVIATION: f64 = 0.05;

/// Computes the kept factor groups for a history. Keys are `dow_0..dow_6`
/// (Monday = 0), `dom_0..dom_5` (five-day buckets) and `month_1..month_12`.
pub fn seasonality_factors(history: &[TimeSeriesPoint]) -> HashMap<String, f64> {
    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let overall = stats::mean(&values);
    let mut factors = HashMap::new();
    if overall.abs() < f64::EPSILON {
        return factors;
    }

    if history.len() >= MIN_DOW_POINTS {
        merge(
            &mut factors,
            bucket_factors(history, overall, 7, "dow", 0, |p| {
                p.timestamp.weekday().num_days_from_monday() as usize
            }),
        );
    }
    if history.len() >= MIN_DOM_POINTS {
        merge(
            &mut factors,
            bucket_factors(history, overall, 6, "dom", 0, |p| {
                ((p.timestamp.day() - 1) / 5).min(5) as usize
            }),
        );
    }
    if history.len() >= MIN_MONTH_POINTS {
        merge(
            &mut factors,
            bucket_factors(history, overall, 12, "month", 1, |p| {
                p.timestamp.month0() as usize
            }),
        );
    }

    factors
}

/// Combined multiplier for one forecast date: the product of whichever
/// factor groups were kept.
pub fn seasonal_multiplier(factors: &HashMap<String, f64>, date: NaiveDate) -> f64 {
    let mut multiplier = 1.0;
    if let Some(f) = factors.get(&format!("dow_{}", date.weekday().num_days_from_monday())) {
        multiplier *= f;
    }
    let dom_bucket = ((date.day() - 1) / 5).min(5);
    if let Some(f) = factors.get(&format!("dom_{dom_bucket}")) {
        multiplier *= f;
    }
    if let Some(f) = factors.get(&format!("month_{}", date.month())) {
        multiplier *= f;
    }
    multiplier
}

fn merge(into: &mut HashMap<String, f64>, group: Option<HashMap<String, f64>>) {
    if let Some(group) = group {
        into.extend(group);
    }
}

/// One factor group. Empty buckets stay neutral at 1.0; the whole group is
/// dropped when every bucket is within `KEEP_DEVIATION` of flat.
fn bucket_factors<F>(
    history: &[TimeSeriesPoint],
    overall: f64,
    buckets: usize,
    prefix: &str,
    label_offset: usize,
    bucket_of: F,
) -> Option<HashMap<String, f64>>
where
    F: Fn(&TimeSeriesPoint) -> usize,
{
    let mut sums = vec![0.0; buckets];
    let mut counts = vec![0usize; buckets];
    for point in history {
        let bucket = bucket_of(point).min(buckets - 1);
        sums[bucket] += point.value;
        counts[bucket] += 1;
    }

    let ratios: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            if count == 0 {
                1.0
            } else {
                (sum / count as f64) / overall
            }
        })
        .collect();

    if ratios.iter().any(|f| (f - 1.0).abs() > KEEP_DEVIATION) {
        Some(
            ratios
                .iter()
                .enumerate()
                .map(|(i, &f)| (format!("{prefix}_{}", i + label_offset), f))
                .collect(),
        )
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc, Weekday};

    /// Daily series starting on a Monday so weekday buckets are predictable.
    fn daily_series(n: usize, value_of: impl Fn(usize, Weekday) -> f64) -> Vec<TimeSeriesPoint> {
        // 2026-08-03 is a Monday.
        let start = Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let timestamp = start + Duration::days(i as i64);
                TimeSeriesPoint::new(timestamp, value_of(i, timestamp.weekday()))
            })
            .collect()
    }

    #[test]
    fn weekend_bump_produces_dow_factors() {
        let history = daily_series(28, |_, weekday| {
            if matches!(weekday, Weekday::Sat | Weekday::Sun) {
                130.0
            } else {
                100.0
            }
        });
        let factors = seasonality_factors(&history);

        let saturday = factors.get("dow_5").copied().unwrap();
        let monday = factors.get("dow_0").copied().unwrap();
        assert!(saturday > 1.1);
        assert!(monday < 1.0);
        // 28 points is below the day-of-month and month thresholds.
        assert!(!factors.keys().any(|k| k.starts_with("dom_")));
        assert!(!factors.keys().any(|k| k.starts_with("month_")));
    }

    #[test]
    fn flat_history_keeps_no_groups() {
        let history = daily_series(90, |_, _| 100.0);
        assert!(seasonality_factors(&history).is_empty());
    }

    #[test]
    fn short_history_keeps_no_groups() {
        let history = daily_series(10, |_, weekday| {
            if weekday == Weekday::Sun { 200.0 } else { 100.0 }
        });
        assert!(seasonality_factors(&history).is_empty());
    }

    #[test]
    fn multiplier_combines_kept_groups() {
        let mut factors = HashMap::new();
        factors.insert("dow_5".to_string(), 1.3);
        factors.insert("dom_0".to_string(), 1.1);

        // 2026-08-01 is a Saturday and falls in the first day-of-month bucket.
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let multiplier = seasonal_multiplier(&factors, date);
        assert!((multiplier - 1.3 * 1.1).abs() < 1e-9);

        // A midweek date late in the month matches neither key.
        let other = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();
        assert!((seasonal_multiplier(&factors, other) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn day_of_month_buckets_cover_day_31() {
        let history: Vec<TimeSeriesPoint> = (0..90)
            .map(|i| {
                let timestamp =
                    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::days(i);
                // Spike at the start of every month.
                let value = if timestamp.day() <= 5 { 150.0 } else { 90.0 };
                TimeSeriesPoint::new(timestamp, value)
            })
            .collect();
        let factors = seasonality_factors(&history);
        assert!(factors.get("dom_0").copied().unwrap() > 1.0);
        assert!(factors.contains_key("dom_5"));
    }
}
