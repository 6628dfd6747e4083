use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{CompetitorDataProvider, HistoricalSeriesProvider, MarketSnapshotProvider};
use crate::error::ProviderError;
use crate::model::{CompetitorRecord, MarketSnapshot, TimeSeriesPoint};

/// JSON client for a market-data service exposing `GET /series`,
/// `GET /competitors` and `GET /market`. One instance implements all three
/// provider traits.
pub struct HttpMarketDataClient {
    client: Client,
    base_url: String,
}

impl HttpMarketDataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("marketpulse/0.1")
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ProviderError::Http(format!("{url} responded {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::MalformedData(e.to_string()))
    }
}

#[async_trait::async_trait]
impl HistoricalSeriesProvider for HttpMarketDataClient {
    async fn get_series(
        &self,
        entity_id: &str,
        metric: &str,
        window_days: u32,
    ) -> Result<Vec<TimeSeriesPoint>, ProviderError> {
        self.get_json(
            "/series",
            &[
                ("entity_id", entity_id.to_string()),
                ("metric", metric.to_string()),
                ("window_days", window_days.to_string()),
            ],
        )
        .await
    }
}

#[async_trait::async_trait]
impl CompetitorDataProvider for HttpMarketDataClient {
    async fn get_competitors(
        &self,
        product_id: &str,
        marketplace: &str,
        competitor_ids: Option<&[String]>,
    ) -> Result<Vec<CompetitorRecord>, ProviderError> {
        let mut query = vec![
            ("product_id", product_id.to_string()),
            ("marketplace", marketplace.to_string()),
        ];
        if let Some(ids) = competitor_ids {
            query.push(("ids", ids.join(",")));
        }
        self.get_json("/competitors", &query).await
    }
}

#[async_trait::async_trait]
impl MarketSnapshotProvider for HttpMarketDataClient {
    async fn get_market_data(
        &self,
        category_id: &str,
        marketplace: &str,
    ) -> Result<MarketSnapshot, ProviderError> {
        self.get_json(
            "/market",
            &[
                ("category_id", category_id.to_string()),
                ("marketplace", marketplace.to_string()),
            ],
        )
        .await
    }
}
