// Market module: composes trends, forecasts and competitor snapshots into
// aggregated market metrics per (category, marketplace).

pub mod analyzer;
pub mod concentration;
pub mod scoring;

pub use analyzer::MarketAnalyzer;
