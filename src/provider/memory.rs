// In-memory providers: fixtures with call counters for tests, plus a
// synthetic generator for the demo binary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Datelike, Duration, Utc, Weekday};
use rand::Rng;

use super::{CompetitorDataProvider, HistoricalSeriesProvider, MarketSnapshotProvider};
use crate::error::ProviderError;
use crate::model::{CompetitorRecord, MarketSnapshot, TimeSeriesPoint};

/// Fixture series provider. Counts calls so tests can assert cache behavior.
#[derive(Default)]
pub struct InMemorySeries {
    series: HashMap<String, Vec<TimeSeriesPoint>>,
    calls: AtomicUsize,
}

impl InMemorySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a series under an entity/metric pair. The stored points are
    /// returned as-is regardless of the requested window.
    pub fn with_series(
        mut self,
        entity_id: &str,
        metric: &str,
        points: Vec<TimeSeriesPoint>,
    ) -> Self {
        self.series.insert(format!("{entity_id}:{metric}"), points);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HistoricalSeriesProvider for InMemorySeries {
    async fn get_series(
        &self,
        entity_id: &str,
        metric: &str,
        _window_days: u32,
    ) -> Result<Vec<TimeSeriesPoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .get(&format!("{entity_id}:{metric}"))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("series {entity_id}:{metric}")))
    }
}

/// Fixture competitor provider keyed by (marketplace, product).
#[derive(Default)]
pub struct InMemoryCompetitors {
    records: HashMap<String, Vec<CompetitorRecord>>,
    calls: AtomicUsize,
}

impl InMemoryCompetitors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(
        mut self,
        product_id: &str,
        marketplace: &str,
        records: Vec<CompetitorRecord>,
    ) -> Self {
        self.records
            .insert(format!("{marketplace}|{product_id}"), records);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompetitorDataProvider for InMemoryCompetitors {
    async fn get_competitors(
        &self,
        product_id: &str,
        marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> Result<Vec<CompetitorRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self
            .records
            .get(&format!("{marketplace}|{product_id}"))
            .cloned()
            .unwrap_or_default();
        if let Some(ids) = competitor_ids {
            records.retain(|r| ids.contains(&r.competitor_id));
        }
        Ok(records)
    }
}

/// Fixture market-snapshot provider keyed by (marketplace, category).
#[derive(Default)]
pub struct InMemoryMarket {
    snapshots: HashMap<String, MarketSnapshot>,
    calls: AtomicUsize,
}

impl InMemoryMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(
        mut self,
        category_id: &str,
        marketplace: &str,
        snapshot: MarketSnapshot,
    ) -> Self {
        self.snapshots
            .insert(format!("{marketplace}|{category_id}"), snapshot);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MarketSnapshotProvider for InMemoryMarket {
    async fn get_market_data(
        &self,
        category_id: &str,
        marketplace: &str,
    ) -> Result<MarketSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .get(&format!("{marketplace}|{category_id}"))
            .cloned()
            .ok_or_else(|| {
                ProviderError::NotFound(format!("market {marketplace}|{category_id}"))
            })
    }
}

/// Generates plausible demo data: a mild upward trend, a weekend bump on
/// demand metrics and random noise. The only place in the crate where
/// randomness lives.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticMarketData {
    noise: f64,
}

impl SyntheticMarketData {
    pub fn new() -> Self {
        Self { noise: 0.08 }
    }

    fn base_level(metric: &str) -> f64 {
        match metric {
            "price" => 79.0,
            "sales_volume" => 140.0,
            "listing_count" => 460.0,
            "search_volume" => 3_100.0,
            "conversion_rate" => 0.034,
            _ => 100.0,
        }
    }
}

impl Default for SyntheticMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistoricalSeriesProvider for SyntheticMarketData {
    async fn get_series(
        &self,
        _entity_id: &str,
        metric: &str,
        window_days: u32,
    ) -> Result<Vec<TimeSeriesPoint>, ProviderError> {
        let mut rng = rand::rng();
        let base = Self::base_level(metric);
        let now = Utc::now();

        let points = (0..window_days)
            .map(|i| {
                let timestamp = now - Duration::days((window_days - 1 - i) as i64);
                let weekday = timestamp.weekday();
                let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun)
                    && matches!(metric, "sales_volume" | "search_volume");
                let weekend_factor = if weekend { 1.2 } else { 1.0 };
                let jitter = 1.0 + rng.random_range(-self.noise..=self.noise);
                let value = base * (1.0 + 0.002 * i as f64) * weekend_factor * jitter;
                TimeSeriesPoint::new(timestamp, value.max(0.0))
            })
            .collect();
        Ok(points)
    }
}

#[async_trait::async_trait]
impl CompetitorDataProvider for SyntheticMarketData {
    async fn get_competitors(
        &self,
        _product_id: &str,
        _marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> Result<Vec<CompetitorRecord>, ProviderError> {
        let mut rng = rand::rng();
        let now = Utc::now();
        let count = competitor_ids.map(|ids| ids.len()).unwrap_or(6);

        let records = (0..count)
            .map(|i| {
                let competitor_id = competitor_ids
                    .map(|ids| ids[i].clone())
                    .unwrap_or_else(|| format!("comp-{}", i + 1));
                let base_price = rng.random_range(25.0..140.0);
                let price_history = (0..30)
                    .map(|d| {
                        let timestamp = now - Duration::days(29 - d);
                        let jitter = 1.0 + rng.random_range(-self.noise..=self.noise);
                        TimeSeriesPoint::new(timestamp, base_price * jitter)
                    })
                    .collect();
                CompetitorRecord {
                    competitor_id,
                    price_history,
                    product_count: rng.random_range(5..80),
                    rating: Some(rng.random_range(3.2..5.0)),
                    review_count: Some(rng.random_range(10..2_000)),
                }
            })
            .collect();
        Ok(records)
    }
}

#[async_trait::async_trait]
impl MarketSnapshotProvider for SyntheticMarketData {
    async fn get_market_data(
        &self,
        _category_id: &str,
        _marketplace: &str,
    ) -> Result<MarketSnapshot, ProviderError> {
        let mut rng = rand::rng();
        let average_price = rng.random_range(40.0..110.0);
        Ok(MarketSnapshot {
            total_listings: rng.random_range(200..900),
            average_price,
            min_price: average_price * 0.4,
            max_price: average_price * 2.2,
            growth_rate: rng.random_range(-0.02..0.12),
            price_elasticity: -1.3,
            seasonality_index: rng.random_range(0.9..1.3),
        })
    }
}
