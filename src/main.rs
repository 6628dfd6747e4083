use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use marketpulse::config::{CategoryTarget, EngineConfig, load_config};
use marketpulse::model::ForecastRequest;
use marketpulse::provider::memory::SyntheticMarketData;
use marketpulse::{DemandForecaster, MarketAnalyzer};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file, falling back to defaults so the demo
    // runs out of the box
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load error: {} (using defaults)", e);
            EngineConfig::default()
        }
    };

    // Synthetic data backs all three provider roles in the demo
    let data = Arc::new(SyntheticMarketData::new());
    let analyzer = Arc::new(MarketAnalyzer::new(
        data.clone(),
        data.clone(),
        data.clone(),
        &config,
    ));

    let categories = if config.categories.is_empty() {
        vec![
            CategoryTarget {
                category_id: "electronics-video-games".to_string(),
                marketplace: "amazon".to_string(),
            },
            CategoryTarget {
                category_id: "home-kitchen".to_string(),
                marketplace: "ebay".to_string(),
            },
        ]
    } else {
        config.categories.clone()
    };

    info!("🚀 MarketPulse started!");
    info!("Categories to analyze: {}", categories.len());

    // Analyze all categories concurrently
    let tasks: Vec<_> = categories
        .iter()
        .map(|target| analyze_category(target, analyzer.clone()))
        .collect();
    join_all(tasks).await;

    // One direct forecast to show the product-level API
    info!("Running a standalone product forecast...");
    let forecaster = DemandForecaster::new(data.clone(), config.forecast.clone());
    let request = ForecastRequest {
        product_id: Some("demo-product-1".to_string()),
        timeframe_days: 14,
        ..Default::default()
    };
    match forecaster.forecast_demand(&request).await {
        Ok(forecast) => info!(
            "14-day forecast for {}: total {:.0} units, growth {:+.1}%, accuracy {:.2}",
            request.product_id.as_deref().unwrap_or("?"),
            forecast.total_forecast,
            forecast.growth_rate * 100.0,
            forecast.forecast_accuracy
        ),
        Err(e) => warn!("Product forecast failed: {:?}", e),
    }

    info!("✅ All analyses finished.");
}

/// Analyzes a single category and prints the resulting metrics as JSON.
async fn analyze_category(target: &CategoryTarget, analyzer: Arc<MarketAnalyzer>) {
    info!(
        "Analyzing category: {} on {}",
        target.category_id, target.marketplace
    );

    let metrics = match analyzer
        .analyze_market(&target.category_id, &target.marketplace)
        .await
    {
        Ok(m) => m,
        Err(e) => {
            error!("Market analysis failed for {}: {:?}", target.category_id, e);
            return;
        }
    };

    info!(
        "{}: avg price {:.2}, opportunity {:.2}, competition {:.2}, {} competitors tracked",
        target.category_id,
        metrics.average_price,
        metrics.opportunity_score,
        metrics.competition_level,
        metrics.top_competitors.len()
    );
    for trend in &metrics.trends {
        info!("  {}", trend.description);
    }

    match serde_json::to_string_pretty(&metrics) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Serialization error: {:?}", e),
    }
}
