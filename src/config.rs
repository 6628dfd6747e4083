use serde::Deserialize;
use std::fs;

/// Tuning knobs for trend and seasonality detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Minimum series length for a trend classification.
    pub min_data_points: usize,
    /// p-value cutoff below which a slope counts as a real trend.
    pub significance_level: f64,
    /// Absolute slope below which a significant fit is still Stable.
    pub trend_threshold: f64,
    /// Relative volatility above which an insignificant fit is Volatile.
    pub volatility_threshold: f64,
    /// Minimum series length for seasonality detection.
    pub min_seasonality_points: usize,
    /// Minimum ACF peak value for a detected period.
    pub seasonality_threshold: f64,
    /// Minimum ACF value for a lag to count as a peak at all.
    pub acf_peak_height: f64,
    /// Minimum lag distance between two peaks.
    pub acf_peak_spacing: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_data_points: 5,
            significance_level: 0.05,
            trend_threshold: 0.1,
            volatility_threshold: 0.5,
            min_seasonality_points: 12,
            seasonality_threshold: 0.2,
            acf_peak_height: 0.1,
            acf_peak_spacing: 2,
        }
    }
}

/// Tuning knobs for demand forecasting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Minimum history length for a real forecast; shorter series get the
    /// zero forecast.
    pub min_data_points: usize,
    /// Days of history fetched from the series provider.
    pub history_window_days: u32,
    pub cache_ttl_secs: u64,
    /// Multiplicative demand boost applied on calendar holidays.
    pub holiday_boost: f64,
    /// Per-day widening rate of the confidence intervals.
    pub interval_growth: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_data_points: 10,
            history_window_days: 90,
            cache_ttl_secs: 86_400,
            holiday_boost: 0.25,
            interval_growth: 0.05,
        }
    }
}

/// Tuning knobs for competitor monitoring.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Record cap when the caller does not name specific competitors.
    pub max_competitors: usize,
    pub cache_ttl_secs: u64,
    /// Fractional price move that counts as significant.
    pub price_change_threshold: f64,
    /// A competitor priced below this fraction of the peer average is
    /// classified as undercutting.
    pub undercut_ratio: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_competitors: 10,
            cache_ttl_secs: 21_600,
            price_change_threshold: 0.05,
            undercut_ratio: 0.95,
        }
    }
}

/// Tuning knobs for whole-market analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub cache_ttl_secs: u64,
    /// Days of history behind each per-metric trend.
    pub trend_window_days: u32,
    /// Horizon of the embedded demand forecast.
    pub forecast_days: u32,
    /// How many competitor snapshots the metrics carry.
    pub top_competitors: usize,
    /// Metrics trended for every analyzed category.
    pub trend_metrics: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 86_400,
            trend_window_days: 90,
            forecast_days: 30,
            top_competitors: 5,
            trend_metrics: vec![
                "price".to_string(),
                "sales_volume".to_string(),
                "listing_count".to_string(),
                "search_volume".to_string(),
                "conversion_rate".to_string(),
            ],
        }
    }
}

/// One category the demo binary analyzes.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTarget {
    pub category_id: String,
    pub marketplace: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trend: TrendConfig,
    pub forecast: ForecastConfig,
    pub monitor: MonitorConfig,
    pub market: MarketConfig,
    pub categories: Vec<CategoryTarget>,
}

pub fn load_config(path: &str) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    Ok(config)
}
