// Composite market scores: opportunity and competition level.

use crate::model::{DemandForecast, Trend, TrendDirection};

/// Equal-weight blend of growth, inverse competition, the sales-volume trend
/// and forecast growth. Always in [0, 1].
pub fn opportunity_score(
    growth_rate: f64,
    competition_level: f64,
    sales_trend: Option<&Trend>,
    forecast: Option<&DemandForecast>,
) -> f64 {
    let growth_score = normalize(growth_rate, -0.05, 0.15);
    let competition_score = 1.0 - competition_level;
    let trend_score = sales_trend.map(trend_score).unwrap_or(0.5);
    // Capped above only; a collapsing forecast keeps dragging the blend
    // down until the final clamp.
    let forecast_score = forecast
        .map(|f| (0.5 + f.growth_rate).min(1.0))
        .unwrap_or(0.5);

    (0.25 * growth_score + 0.25 * competition_score + 0.25 * trend_score + 0.25 * forecast_score)
        .clamp(0.0, 1.0)
}

/// Weighted blend of competitor count, HHI and price spread; 0.5 when there
/// is no competitor data to judge from. Always in [0, 1].
pub fn competition_level(
    competitor_count: usize,
    hhi: f64,
    average_price: f64,
    price_range: f64,
) -> f64 {
    if competitor_count == 0 {
        return 0.5;
    }

    let count_factor: f64 = match competitor_count {
        0..=5 => 0.2,
        6..=10 => 0.4,
        11..=20 => 0.6,
        21..=50 => 0.8,
        _ => 1.0,
    };
    // High concentration means few effective rivals.
    let hhi_factor: f64 = if hhi > 2500.0 {
        0.3
    } else if hhi > 1500.0 {
        0.5
    } else {
        0.8
    };
    let variation = if average_price.abs() < f64::EPSILON {
        f64::INFINITY
    } else {
        price_range / average_price
    };
    let price_factor: f64 = if variation < 0.2 {
        0.8
    } else if variation < 0.5 {
        0.6
    } else if variation < 1.0 {
        0.4
    } else {
        0.2
    };

    (0.3 * count_factor + 0.4 * hhi_factor + 0.3 * price_factor).clamp(0.0, 1.0)
}

fn trend_score(trend: &Trend) -> f64 {
    match trend.direction {
        TrendDirection::Increasing => 0.75 + 0.25 * trend.magnitude,
        TrendDirection::Decreasing => 0.5 - 0.5 * trend.magnitude,
        TrendDirection::Volatile => 0.3,
        TrendDirection::Stable => 0.5,
    }
}

fn normalize(value: f64, low: f64, high: f64) -> f64 {
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}
