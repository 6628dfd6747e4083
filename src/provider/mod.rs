// Data-acquisition boundary. The engine never scrapes or polls anything
// itself; everything external arrives through these three traits.

pub mod http;
pub mod memory;

use crate::error::ProviderError;
use crate::model::{CompetitorRecord, MarketSnapshot, TimeSeriesPoint};

/// Source of historical metric series (sales volume, price, listings, ...).
#[async_trait::async_trait]
pub trait HistoricalSeriesProvider: Send + Sync {
    /// Returns up to `window_days` of history for one entity/metric pair,
    /// ordered by timestamp ascending.
    async fn get_series(
        &self,
        entity_id: &str,
        metric: &str,
        window_days: u32,
    ) -> Result<Vec<TimeSeriesPoint>, ProviderError>;
}

/// Source of competitor listings for a product on a marketplace.
#[async_trait::async_trait]
pub trait CompetitorDataProvider: Send + Sync {
    /// Returns competitor records, restricted to `competitor_ids` when given.
    async fn get_competitors(
        &self,
        product_id: &str,
        marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> Result<Vec<CompetitorRecord>, ProviderError>;
}

/// Source of category-level market aggregates.
#[async_trait::async_trait]
pub trait MarketSnapshotProvider: Send + Sync {
    async fn get_market_data(
        &self,
        category_id: &str,
        marketplace: &str,
    ) -> Result<MarketSnapshot, ProviderError>;
}
