use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::MonitorConfig;
use crate::error::{EngineError, ProviderError};
use crate::model::{
    CompetitorRecord, CompetitorSnapshot, MarketRank, MarketSegment, PriceChangeReport,
    PricingStrategy,
};
use crate::monitor::{price_events, strategy};
use crate::provider::CompetitorDataProvider;
use crate::stats;

/// Maintains competitor snapshots per (marketplace, product), with market
/// share, rank and price-band segments derived from the raw records.
pub struct CompetitorMonitor {
    provider: Arc<dyn CompetitorDataProvider>,
    config: MonitorConfig,
    snapshot_cache: TtlCache<Vec<CompetitorSnapshot>>,
}

impl CompetitorMonitor {
    pub fn new(provider: Arc<dyn CompetitorDataProvider>, config: MonitorConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            provider,
            config,
            snapshot_cache: TtlCache::new(ttl),
        }
    }

    /// Returns enriched snapshots for the product's competitors, at most
    /// `max_competitors` (or exactly the requested ids). Snapshot sets are
    /// cached per key so repeat calls within the TTL hit the provider once.
    pub async fn monitor_competitors(
        &self,
        product_id: &str,
        marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> Result<Vec<CompetitorSnapshot>, EngineError> {
        let key = Self::cache_key(product_id, marketplace, competitor_ids);
        let limit = competitor_ids
            .map(|ids| ids.len())
            .unwrap_or(self.config.max_competitors);

        self.snapshot_cache
            .get_or_try_insert_with(&key, || async move {
                let mut records = self
                    .provider
                    .get_competitors(product_id, marketplace, competitor_ids)
                    .await?;
                records.truncate(limit);
                debug!(
                    product_id,
                    marketplace,
                    competitors = records.len(),
                    "building competitor snapshots"
                );
                Ok(Self::build_snapshots(records))
            })
            .await
    }

    /// Windowed price-change analysis for one competitor.
    /// Unknown competitors surface as `DataUnavailable`.
    pub async fn detect_price_changes(
        &self,
        competitor_id: &str,
        product_id: &str,
        marketplace: &str,
        days: u32,
    ) -> Result<PriceChangeReport, EngineError> {
        let snapshots = self
            .monitor_competitors(product_id, marketplace, None)
            .await?;
        let snapshot = Self::find_competitor(&snapshots, competitor_id)?;
        Ok(price_events::detect_changes(
            &self.config,
            competitor_id,
            &snapshot.price_history,
            days,
        ))
    }

    /// Classifies the competitor's pricing behavior against its peers.
    pub async fn analyze_pricing_strategy(
        &self,
        competitor_id: &str,
        product_id: &str,
        marketplace: &str,
    ) -> Result<PricingStrategy, EngineError> {
        let snapshots = self
            .monitor_competitors(product_id, marketplace, None)
            .await?;
        let snapshot = Self::find_competitor(&snapshots, competitor_id)?;

        let prices: Vec<f64> = snapshot.price_history.iter().map(|p| p.value).collect();
        let peer_averages: Vec<f64> = snapshots
            .iter()
            .filter(|s| s.competitor_id != competitor_id)
            .map(|s| s.average_price)
            .collect();

        Ok(strategy::classify_strategy(
            &self.config,
            competitor_id,
            &prices,
            &peer_averages,
        ))
    }

    fn find_competitor<'a>(
        snapshots: &'a [CompetitorSnapshot],
        competitor_id: &str,
    ) -> Result<&'a CompetitorSnapshot, EngineError> {
        snapshots
            .iter()
            .find(|s| s.competitor_id == competitor_id)
            .ok_or_else(|| {
                EngineError::DataUnavailable(ProviderError::NotFound(format!(
                    "competitor {competitor_id}"
                )))
            })
    }

    fn cache_key(
        product_id: &str,
        marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> String {
        match competitor_ids {
            Some(ids) => {
                let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
                sorted.sort_unstable();
                format!("{marketplace}|{product_id}|{}", sorted.join(","))
            }
            None => format!("{marketplace}|{product_id}"),
        }
    }

    fn build_snapshots(records: Vec<CompetitorRecord>) -> Vec<CompetitorSnapshot> {
        let total_products: u32 = records.iter().map(|r| r.product_count).sum();
        let top_count = records.iter().map(|r| r.product_count).max().unwrap_or(0);
        let captured_at = Utc::now();

        records
            .into_iter()
            .map(|record| {
                let prices: Vec<f64> = record.price_history.iter().map(|p| p.value).collect();
                let average_price = stats::mean(&prices);
                let min_price = prices.iter().copied().reduce(f64::min).unwrap_or(0.0);
                let max_price = prices.iter().copied().reduce(f64::max).unwrap_or(0.0);

                let market_share = if total_products == 0 {
                    0.0
                } else {
                    record.product_count as f64 / total_products as f64
                };
                let rank = Self::rank(record.product_count, top_count, market_share);
                let segments = Self::segments(average_price, min_price, max_price);

                CompetitorSnapshot {
                    competitor_id: record.competitor_id,
                    price_history: record.price_history,
                    average_price,
                    min_price,
                    max_price,
                    product_count: record.product_count,
                    rating: record.rating,
                    review_count: record.review_count,
                    market_share,
                    rank,
                    segments,
                    captured_at,
                }
            })
            .collect()
    }

    fn rank(product_count: u32, top_count: u32, share: f64) -> MarketRank {
        if product_count == top_count && share > 0.25 {
            MarketRank::Leader
        } else if share > 0.15 {
            MarketRank::Challenger
        } else if share < 0.05 {
            MarketRank::Niche
        } else {
            MarketRank::Follower
        }
    }

    fn price_band(price: f64) -> MarketSegment {
        if price < 30.0 {
            MarketSegment::Budget
        } else if price < 70.0 {
            MarketSegment::MidRange
        } else if price < 150.0 {
            MarketSegment::Premium
        } else {
            MarketSegment::Luxury
        }
    }

    /// Primary segment from the average price; a secondary segment when the
    /// competitor's own price range spans more than 20.
    fn segments(average: f64, min: f64, max: f64) -> Vec<MarketSegment> {
        let primary = Self::price_band(average);
        let mut segments = vec![primary];
        if max - min > 20.0 {
            let high = Self::price_band(max);
            if high != primary {
                segments.push(high);
            } else {
                let low = Self::price_band(min);
                if low != primary {
                    segments.push(low);
                }
            }
        }
        segments
    }
}
