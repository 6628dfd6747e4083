// Windowed price-change detection for a single competitor.

use chrono::{Duration, Utc};

use crate::config::MonitorConfig;
use crate::model::{PriceChangeReport, PriceMovement, TimeSeriesPoint};
use crate::stats;

/// Analyzes the trailing `days` of a price history: overall change,
/// significance, the most recent single step at or above the threshold,
/// plus volatility and RSI of the window.
pub fn detect_changes(
    config: &MonitorConfig,
    competitor_id: &str,
    history: &[TimeSeriesPoint],
    days: u32,
) -> PriceChangeReport {
    let cutoff = Utc::now() - Duration::days(days as i64);
    let window: Vec<&TimeSeriesPoint> =
        history.iter().filter(|p| p.timestamp >= cutoff).collect();
    let prices: Vec<f64> = window.iter().map(|p| p.value).collect();

    let first_price = prices.first().copied().unwrap_or(0.0);
    let last_price = prices.last().copied().unwrap_or(0.0);
    let change_pct = if first_price.abs() < f64::EPSILON {
        0.0
    } else {
        (last_price - first_price) / first_price
    };

    PriceChangeReport {
        competitor_id: competitor_id.to_string(),
        window_days: days,
        first_price,
        last_price,
        change_pct,
        significant: change_pct.abs() >= config.price_change_threshold,
        last_change: last_significant_step(&window, config.price_change_threshold),
        volatility: stats::std_dev(&prices),
        rsi: stats::relative_strength_index(&prices),
    }
}

/// Scans backward for the most recent consecutive-point step whose relative
/// change meets the threshold.
fn last_significant_step(
    window: &[&TimeSeriesPoint],
    threshold: f64,
) -> Option<PriceMovement> {
    window
        .windows(2)
        .rev()
        .filter(|pair| pair[0].value.abs() > f64::EPSILON)
        .map(|pair| PriceMovement {
            occurred_at: pair[1].timestamp,
            from_price: pair[0].value,
            to_price: pair[1].value,
            change_pct: (pair[1].value - pair[0].value) / pair[0].value,
        })
        .find(|movement| movement.change_pct.abs() >= threshold)
}
