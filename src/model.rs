// Core data model: series points, trends, forecasts, competitor snapshots,
// market metrics. Everything here is plain data with serde derives; the
// transport layer (API, agents) is out of scope and just serializes these.
use crate::error::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One observation of a metric, ordered by timestamp within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Classified direction of a metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    Volatile,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
            Self::Volatile => write!(f, "volatile"),
        }
    }
}

/// Result of trend classification for a single metric.
///
/// `magnitude` and `confidence` are always clamped to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub metric: String,
    pub direction: TrendDirection,
    pub magnitude: f64,
    pub confidence: f64,
    pub timeframe_days: u32,
    pub data_points: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub description: String,
}

/// Result of autocorrelation-based seasonality detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityPattern {
    pub detected: bool,
    /// Dominant period in lags (samples), when detected.
    pub period: Option<usize>,
    pub strength: f64,
    pub confidence: f64,
    /// All autocorrelation peak lags that passed the picker.
    pub peak_lags: Vec<usize>,
}

impl SeasonalityPattern {
    pub fn none() -> Self {
        Self {
            detected: false,
            period: None,
            strength: 0.0,
            confidence: 0.0,
            peak_lags: Vec::new(),
        }
    }
}

/// Caller-supplied context that scales a demand forecast.
///
/// Promotion day offsets are relative to the forecast start (day 1 is the
/// first forecast date); the boost is applied only on days inside the window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalFactors {
    pub promotion_boost: Option<f64>,
    pub promotion_start_day: Option<i64>,
    pub promotion_end_day: Option<i64>,
    pub competition_increase: Option<f64>,
    pub market_growth: Option<f64>,
}

/// A demand-forecast request. Exactly one of `product_id` / `category_id`
/// must be set; anything else is an argument error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub product_id: Option<String>,
    pub category_id: Option<String>,
    pub timeframe_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<Vec<TimeSeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_factors: Option<ExternalFactors>,
}

/// The entity a forecast is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSubject<'a> {
    Product(&'a str),
    Category(&'a str),
}

impl<'a> ForecastSubject<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Product(id) | Self::Category(id) => id,
        }
    }

    /// Stable prefix used in cache keys.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Product(_) => "product",
            Self::Category(_) => "category",
        }
    }
}

impl ForecastRequest {
    /// Validates the exactly-one-id invariant.
    pub fn subject(&self) -> Result<ForecastSubject<'_>, EngineError> {
        match (self.product_id.as_deref(), self.category_id.as_deref()) {
            (Some(p), None) => Ok(ForecastSubject::Product(p)),
            (None, Some(c)) => Ok(ForecastSubject::Category(c)),
            (None, None) => Err(EngineError::InvalidArgument(
                "either product_id or category_id must be set".to_string(),
            )),
            (Some(_), Some(_)) => Err(EngineError::InvalidArgument(
                "product_id and category_id are mutually exclusive".to_string(),
            )),
        }
    }
}

/// Confidence bounds for one forecast day. Lower bounds are clamped ≥ 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInterval {
    pub date: NaiveDate,
    pub lower_80: f64,
    pub upper_80: f64,
    pub lower_95: f64,
    pub upper_95: f64,
}

/// Multi-day demand forecast.
///
/// `forecast_values`, `forecast_dates` and `timeframe_days` always agree in
/// length, including on the degraded all-zero path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    pub product_id: Option<String>,
    pub category_id: Option<String>,
    pub timeframe_days: u32,
    pub forecast_values: Vec<f64>,
    pub forecast_dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_intervals: Option<Vec<ForecastInterval>>,
    /// Kept seasonal factor groups, keyed `dow_*`, `dom_*`, `month_*`.
    pub seasonality_factors: HashMap<String, f64>,
    pub total_forecast: f64,
    pub growth_rate: f64,
    pub forecast_accuracy: f64,
    pub generated_at: DateTime<Utc>,
}

/// Raw competitor data as delivered by a [`CompetitorDataProvider`].
///
/// [`CompetitorDataProvider`]: crate::provider::CompetitorDataProvider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub competitor_id: String,
    pub price_history: Vec<TimeSeriesPoint>,
    pub product_count: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

/// Competitive position derived from market share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRank {
    Leader,
    Challenger,
    Follower,
    Niche,
}

impl fmt::Display for MarketRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leader => write!(f, "leader"),
            Self::Challenger => write!(f, "challenger"),
            Self::Follower => write!(f, "follower"),
            Self::Niche => write!(f, "niche"),
        }
    }
}

/// Price-band segment membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSegment {
    Budget,
    MidRange,
    Premium,
    Luxury,
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Budget => write!(f, "budget"),
            Self::MidRange => write!(f, "mid_range"),
            Self::Premium => write!(f, "premium"),
            Self::Luxury => write!(f, "luxury"),
        }
    }
}

/// Enriched view of one competitor at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorSnapshot {
    pub competitor_id: String,
    pub price_history: Vec<TimeSeriesPoint>,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub product_count: u32,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub market_share: f64,
    pub rank: MarketRank,
    pub segments: Vec<MarketSegment>,
    pub captured_at: DateTime<Utc>,
}

/// A single price step between consecutive observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMovement {
    pub occurred_at: DateTime<Utc>,
    pub from_price: f64,
    pub to_price: f64,
    pub change_pct: f64,
}

/// Windowed price-change analysis for one competitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChangeReport {
    pub competitor_id: String,
    pub window_days: u32,
    pub first_price: f64,
    pub last_price: f64,
    /// Overall relative change from first to last price in the window.
    pub change_pct: f64,
    pub significant: bool,
    /// Most recent single step at or above the significance threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_change: Option<PriceMovement>,
    /// Standard deviation of prices in the window.
    pub volatility: f64,
    /// Relative Strength Index of the window (50 = balanced).
    pub rsi: f64,
}

/// Classified competitor pricing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategyType {
    Undercutting,
    Skimming,
    Penetration,
    PromotionalPricing,
    StablePricing,
    InsufficientData,
}

impl fmt::Display for PricingStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undercutting => write!(f, "undercutting"),
            Self::Skimming => write!(f, "skimming"),
            Self::Penetration => write!(f, "penetration"),
            Self::PromotionalPricing => write!(f, "promotional_pricing"),
            Self::StablePricing => write!(f, "stable_pricing"),
            Self::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingStrategy {
    pub competitor_id: String,
    pub strategy: PricingStrategyType,
    pub confidence: f64,
}

/// Category-level market data as delivered by a [`MarketSnapshotProvider`].
///
/// [`MarketSnapshotProvider`]: crate::provider::MarketSnapshotProvider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub total_listings: u32,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub growth_rate: f64,
    pub price_elasticity: f64,
    pub seasonality_index: f64,
}

/// Share of the market held by each price segment. Shares sum to ≈ 1
/// whenever competitor data is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMix {
    pub budget: f64,
    pub mid_range: f64,
    pub premium: f64,
    pub luxury: f64,
}

impl Default for SegmentMix {
    /// Fixed fallback mix used when no competitor data is available.
    fn default() -> Self {
        Self {
            budget: 0.25,
            mid_range: 0.50,
            premium: 0.20,
            luxury: 0.05,
        }
    }
}

/// One of five equal-width price ranges spanning observed competitor prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBucket {
    pub range_start: f64,
    pub range_end: f64,
    pub count: usize,
}

/// Market concentration indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketConcentration {
    /// Herfindahl-Hirschman Index, Σ(share²)·10000, in [0, 10000].
    pub hhi: f64,
    /// Four-firm concentration ratio, in [0, 1].
    pub cr4: f64,
    /// Largest single market share, in [0, 1].
    pub top_share: f64,
}

/// Aggregated market intelligence for one (category, marketplace) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub category_id: String,
    pub marketplace: String,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_distribution: Vec<PriceBucket>,
    pub sales_velocity: f64,
    pub market_size: f64,
    pub growth_rate: f64,
    pub top_competitors: Vec<CompetitorSnapshot>,
    pub trends: Vec<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_forecast: Option<DemandForecast>,
    pub market_segments: SegmentMix,
    pub opportunity_score: f64,
    pub competition_level: f64,
    pub concentration: MarketConcentration,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_request_requires_exactly_one_id() {
        let neither = ForecastRequest {
            timeframe_days: 7,
            ..Default::default()
        };
        assert!(neither.subject().is_err());

        let both = ForecastRequest {
            product_id: Some("p-1".to_string()),
            category_id: Some("c-1".to_string()),
            timeframe_days: 7,
            ..Default::default()
        };
        assert!(both.subject().is_err());

        let product = ForecastRequest {
            product_id: Some("p-1".to_string()),
            timeframe_days: 7,
            ..Default::default()
        };
        let subject = product.subject().unwrap();
        assert_eq!(subject.id(), "p-1");
        assert_eq!(subject.kind(), "product");
    }

    #[test]
    fn strategy_type_serializes_to_snake_case() {
        let json = serde_json::to_string(&PricingStrategyType::PromotionalPricing).unwrap();
        assert_eq!(json, "\"promotional_pricing\"");
        let json = serde_json::to_string(&PricingStrategyType::Undercutting).unwrap();
        assert_eq!(json, "\"undercutting\"");
        let json = serde_json::to_string(&PricingStrategyType::StablePricing).unwrap();
        assert_eq!(json, "\"stable_pricing\"");
    }

    #[test]
    fn rank_and_direction_render_lowercase() {
        assert_eq!(MarketRank::Leader.to_string(), "leader");
        assert_eq!(TrendDirection::Volatile.to_string(), "volatile");
        assert_eq!(MarketSegment::MidRange.to_string(), "mid_range");
    }

    #[test]
    fn default_segment_mix_sums_to_one() {
        let mix = SegmentMix::default();
        let total = mix.budget + mix.mid_range + mix.premium + mix.luxury;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
