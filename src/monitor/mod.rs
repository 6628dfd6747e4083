// Monitor module: competitor snapshots, price-change events and pricing
// strategy classification.

pub mod competitor;
pub mod price_events;
pub mod strategy;

pub use competitor::CompetitorMonitor;
