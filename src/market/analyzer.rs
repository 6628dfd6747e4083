use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use crate::analyzer::TrendAnalyzer;
use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::forecaster::DemandForecaster;
use crate::market::{concentration, scoring};
use crate::model::{ForecastRequest, MarketMetrics, MarketSnapshot};
use crate::monitor::CompetitorMonitor;
use crate::provider::{
    CompetitorDataProvider, HistoricalSeriesProvider, MarketSnapshotProvider,
};
use crate::stats;

/// Orchestrator: composes per-metric trends, the demand forecast and the
/// competitor snapshot set into one `MarketMetrics` record per
/// (category, marketplace) pair.
///
/// Leaf failures degrade: a failed series skips its trend, failed competitor
/// data yields an empty set, a failed forecast is omitted and a failed
/// snapshot zeroes the market aggregates. Only the cache plumbing can
/// surface an error.
pub struct MarketAnalyzer {
    series_provider: Arc<dyn HistoricalSeriesProvider>,
    snapshot_provider: Arc<dyn MarketSnapshotProvider>,
    trend_analyzer: TrendAnalyzer,
    forecaster: DemandForecaster,
    monitor: CompetitorMonitor,
    config: crate::config::MarketConfig,
    metrics_cache: TtlCache<MarketMetrics>,
}

impl MarketAnalyzer {
    pub fn new(
        series_provider: Arc<dyn HistoricalSeriesProvider>,
        competitor_provider: Arc<dyn CompetitorDataProvider>,
        snapshot_provider: Arc<dyn MarketSnapshotProvider>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            trend_analyzer: TrendAnalyzer::new(config.trend.clone()),
            forecaster: DemandForecaster::new(series_provider.clone(), config.forecast.clone()),
            monitor: CompetitorMonitor::new(competitor_provider, config.monitor.clone()),
            series_provider,
            snapshot_provider,
            config: config.market.clone(),
            metrics_cache: TtlCache::new(Duration::from_secs(config.market.cache_ttl_secs)),
        }
    }

    /// Full market analysis for one category on one marketplace, cached per
    /// (marketplace, category) key.
    pub async fn analyze_market(
        &self,
        category_id: &str,
        marketplace: &str,
    ) -> Result<MarketMetrics, EngineError> {
        let key = format!("{marketplace}|{category_id}");
        self.metrics_cache
            .get_or_try_insert_with(&key, || async {
                Ok(self.build_metrics(category_id, marketplace).await)
            })
            .await
    }

    async fn build_metrics(&self, category_id: &str, marketplace: &str) -> MarketMetrics {
        info!(category_id, marketplace, "analyzing market");

        let trend_fetches = self.config.trend_metrics.iter().map(|metric| async move {
            let series = self
                .series_provider
                .get_series(category_id, metric, self.config.trend_window_days)
                .await;
            (metric.as_str(), series)
        });

        let mut trends = Vec::new();
        for (metric, result) in join_all(trend_fetches).await {
            match result {
                Ok(series) => {
                    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
                    let timestamps: Vec<_> = series.iter().map(|p| p.timestamp).collect();
                    trends.push(self.trend_analyzer.analyze_trend(&values, &timestamps, metric));
                }
                Err(e) => warn!(metric, error = %e, "series unavailable, skipping trend"),
            }
        }

        let competitors = match self
            .monitor
            .monitor_competitors(category_id, marketplace, None)
            .await
        {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(error = %e, "competitor data unavailable");
                Vec::new()
            }
        };

        let request = ForecastRequest {
            category_id: Some(category_id.to_string()),
            timeframe_days: self.config.forecast_days,
            ..Default::default()
        };
        let demand_forecast = match self.forecaster.forecast_demand(&request).await {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!(error = %e, "demand forecast unavailable");
                None
            }
        };

        let snapshot = match self
            .snapshot_provider
            .get_market_data(category_id, marketplace)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "market snapshot unavailable");
                MarketSnapshot::default()
            }
        };

        let (average_price, min_price, max_price) = if competitors.is_empty() {
            (snapshot.average_price, snapshot.min_price, snapshot.max_price)
        } else {
            let averages: Vec<f64> = competitors.iter().map(|s| s.average_price).collect();
            (
                stats::mean(&averages),
                averages.iter().copied().fold(f64::INFINITY, f64::min),
                averages.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        let concentration_indices = concentration::concentration(&competitors);
        let price_distribution = concentration::price_buckets(&competitors);
        let market_segments = concentration::segment_mix(&competitors);

        let competition_level = scoring::competition_level(
            competitors.len(),
            concentration_indices.hhi,
            average_price,
            max_price - min_price,
        );

        let sales_trend = trends.iter().find(|t| t.metric == "sales_volume");
        let opportunity_score = scoring::opportunity_score(
            snapshot.growth_rate,
            competition_level,
            sales_trend,
            demand_forecast.as_ref(),
        );
        let sales_velocity = sales_trend
            .map(|t| {
                let tail = &t.data_points[t.data_points.len().saturating_sub(7)..];
                stats::mean(tail)
            })
            .unwrap_or(0.0);

        let mut top_competitors = competitors;
        top_competitors.sort_by(|a, b| b.market_share.total_cmp(&a.market_share));
        top_competitors.truncate(self.config.top_competitors);

        MarketMetrics {
            category_id: category_id.to_string(),
            marketplace: marketplace.to_string(),
            average_price,
            min_price,
            max_price,
            price_distribution,
            sales_velocity,
            market_size: snapshot.total_listings as f64 * average_price,
            growth_rate: snapshot.growth_rate,
            top_competitors,
            trends,
            demand_forecast,
            market_segments,
            opportunity_score,
            competition_level,
            concentration: concentration_indices,
            analyzed_at: Utc::now(),
        }
    }
}
