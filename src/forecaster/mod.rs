// Forecaster module: multi-day demand forecasts with seasonal factors,
// external adjustments and confidence intervals.

pub mod demand;
pub mod factors;

pub use demand::DemandForecaster;
