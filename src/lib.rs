//! Market intelligence engine for e-commerce marketplaces: statistical
//! trend analysis, demand forecasting, competitor monitoring and
//! category-level market aggregation, built on pluggable data providers.

pub mod analyzer;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod forecaster;
pub mod market;
pub mod model;
pub mod monitor;
pub mod provider;
pub mod stats;

pub use analyzer::TrendAnalyzer;
pub use config::{EngineConfig, load_config};
pub use error::{EngineError, ProviderError};
pub use forecaster::DemandForecaster;
pub use market::MarketAnalyzer;
pub use monitor::CompetitorMonitor;
