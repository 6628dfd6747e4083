use chrono::{DateTime, Utc};

use crate::analyzer::seasonality;
use crate::config::TrendConfig;
use crate::model::{SeasonalityPattern, Trend, TrendDirection};
use crate::stats;

/// Classifies the direction, magnitude and confidence of a metric series.
///
/// Pure computation: no providers, no caching, safe to call from anywhere.
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Classifies one series. Series shorter than `min_data_points` come back
    /// Stable with zero confidence and an insufficient-data note.
    ///
    /// Direction comes from an OLS slope gated by an approximate two-sided
    /// p-value; an insignificant slope is Stable unless the series is noisy
    /// enough to count as Volatile.
    pub fn analyze_trend(
        &self,
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        metric: &str,
    ) -> Trend {
        let n = values.len();
        if n < self.config.min_data_points {
            return Trend {
                metric: metric.to_string(),
                direction: TrendDirection::Stable,
                magnitude: 0.0,
                confidence: 0.0,
                timeframe_days: Self::timeframe_days(timestamps),
                data_points: values.to_vec(),
                timestamps: timestamps.to_vec(),
                description: format!(
                    "{metric}: insufficient data ({n} points, need {})",
                    self.config.min_data_points
                ),
            };
        }

        let fit = stats::linear_fit(values);
        let r = stats::index_correlation(values);
        let t = stats::t_statistic(r, n);
        let p = stats::two_sided_p_value(t);

        let direction = self.classify_direction(values, fit.slope, p);

        let avg = stats::mean(values);
        let magnitude = if avg.abs() < f64::EPSILON {
            0.0
        } else {
            (fit.slope * n as f64 / avg).abs().min(1.0)
        };
        let confidence = (0.7 * r * r
            + 0.3 * (1.0 - (p / self.config.significance_level).min(1.0)))
        .clamp(0.0, 1.0);

        Trend {
            metric: metric.to_string(),
            direction,
            magnitude,
            confidence,
            timeframe_days: Self::timeframe_days(timestamps),
            data_points: values.to_vec(),
            timestamps: timestamps.to_vec(),
            description: Self::describe(metric, direction, magnitude, confidence),
        }
    }

    /// Autocorrelation-based seasonality detection on the detrended series.
    /// The reported period is in sample lags.
    pub fn detect_seasonality(&self, values: &[f64]) -> SeasonalityPattern {
        seasonality::detect(&self.config, values)
    }

    fn classify_direction(&self, values: &[f64], slope: f64, p_value: f64) -> TrendDirection {
        if p_value > self.config.significance_level {
            if Self::relative_volatility(values) > self.config.volatility_threshold {
                TrendDirection::Volatile
            } else {
                TrendDirection::Stable
            }
        } else if slope > self.config.trend_threshold {
            TrendDirection::Increasing
        } else if slope < -self.config.trend_threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Spread of successive differences relative to the series level.
    /// A zero-mean series with any spread counts as maximally volatile.
    fn relative_volatility(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let spread = stats::std_dev(&diffs);
        let avg = stats::mean(values);
        if avg.abs() < f64::EPSILON {
            return if spread > 0.0 { f64::INFINITY } else { 0.0 };
        }
        spread / avg.abs()
    }

    fn timeframe_days(timestamps: &[DateTime<Utc>]) -> u32 {
        match (timestamps.first(), timestamps.last()) {
            (Some(first), Some(last)) => (*last - *first).num_days().max(0) as u32,
            _ => 0,
        }
    }

    fn describe(
        metric: &str,
        direction: TrendDirection,
        magnitude: f64,
        confidence: f64,
    ) -> String {
        let strength = if magnitude < 0.1 {
            "slight"
        } else if magnitude < 0.3 {
            "moderate"
        } else if magnitude < 0.6 {
            "significant"
        } else {
            "strong"
        };
        let certainty = if confidence < 0.4 {
            "low"
        } else if confidence < 0.7 {
            "moderate"
        } else {
            "high"
        };
        format!("{metric} shows a {strength} {direction} trend ({certainty} confidence)")
    }
}
