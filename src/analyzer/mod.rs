// Analyzer module: trend classification and seasonality detection for a
// single metric series.

pub mod seasonality;
pub mod trend;

pub use trend::TrendAnalyzer;
