// Pricing-strategy classification from a competitor's price sequence and
// its peers' average prices.

use crate::config::MonitorConfig;
use crate::model::{PricingStrategy, PricingStrategyType};
use crate::stats;

/// Minimum price points before any classification is attempted.
const MIN_PRICE_POINTS: usize = 5;
/// Minimum period-over-period changes for skimming/penetration counting.
const MIN_CHANGES: usize = 3;
/// Promotional cycle shape: a drop below -5% immediately followed by a rise
/// above +3%, seen at least twice.
const PROMO_DROP: f64 = -0.05;
const PROMO_RISE: f64 = 0.03;
const MIN_PROMO_CYCLES: usize = 2;

/// Tests the patterns in order of confidence and returns the first match:
/// undercutting (0.8), skimming (0.7), penetration (0.7), promotional (0.6),
/// else stable (0.5). `peer_averages` holds the average prices of the other
/// competitors in the same snapshot set.
pub fn classify_strategy(
    config: &MonitorConfig,
    competitor_id: &str,
    prices: &[f64],
    peer_averages: &[f64],
) -> PricingStrategy {
    let classified = |strategy, confidence| PricingStrategy {
        competitor_id: competitor_id.to_string(),
        strategy,
        confidence,
    };

    if prices.len() < MIN_PRICE_POINTS {
        return classified(PricingStrategyType::InsufficientData, 0.0);
    }

    // Undercutting needs at least three competitors in the set: this one
    // plus two peers.
    if peer_averages.len() >= 2 {
        let own_average = stats::mean(prices);
        let peer_average = stats::mean(peer_averages);
        if peer_average > 0.0 && own_average < config.undercut_ratio * peer_average {
            return classified(PricingStrategyType::Undercutting, 0.8);
        }
    }

    let changes: Vec<f64> = prices
        .windows(2)
        .filter(|w| w[0].abs() > f64::EPSILON)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if changes.len() >= MIN_CHANGES {
        let increases = changes.iter().filter(|&&c| c > 0.0).count();
        let decreases = changes.iter().filter(|&&c| c < 0.0).count();
        if decreases > 2 * increases {
            return classified(PricingStrategyType::Skimming, 0.7);
        }
        if increases > 2 * decreases {
            return classified(PricingStrategyType::Penetration, 0.7);
        }
    }

    let promo_cycles = changes
        .windows(2)
        .filter(|pair| pair[0] < PROMO_DROP && pair[1] > PROMO_RISE)
        .count();
    if promo_cycles >= MIN_PROMO_CYCLES {
        return classified(PricingStrategyType::PromotionalPricing, 0.6);
    }

    classified(PricingStrategyType::StablePricing, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(prices: &[f64], peers: &[f64]) -> PricingStrategy {
        classify_strategy(&MonitorConfig::default(), "c-1", prices, peers)
    }

    #[test]
    fn short_series_is_insufficient_data() {
        let result = classify(&[100.0, 99.0, 98.0, 97.0], &[]);
        assert_eq!(result.strategy, PricingStrategyType::InsufficientData);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn below_peer_average_is_undercutting() {
        // Monotonically decreasing and well under flat peers; undercutting
        // wins over skimming because it carries higher confidence.
        let prices = [100.0, 95.0, 90.0, 85.0, 80.0];
        let result = classify(&prices, &[120.0, 125.0]);
        assert_eq!(result.strategy, PricingStrategyType::Undercutting);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn undercutting_requires_three_competitors() {
        let prices = [100.0, 95.0, 90.0, 85.0, 80.0];
        // Only one peer: falls through to the change-pattern tests.
        let result = classify(&prices, &[200.0]);
        assert_eq!(result.strategy, PricingStrategyType::Skimming);
    }

    #[test]
    fn sustained_decline_is_skimming() {
        let result = classify(&[100.0, 98.0, 96.0, 94.0, 92.0, 90.0], &[]);
        assert_eq!(result.strategy, PricingStrategyType::Skimming);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn sustained_rise_is_penetration() {
        let result = classify(&[50.0, 52.0, 54.0, 56.0, 58.0, 60.0], &[]);
        assert_eq!(result.strategy, PricingStrategyType::Penetration);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn repeated_drop_and_rebound_is_promotional() {
        // Changes alternate -8%, +5%, -8%, +5%.
        let prices = [100.0, 92.0, 96.6, 88.87, 93.32];
        let result = classify(&prices, &[]);
        assert_eq!(result.strategy, PricingStrategyType::PromotionalPricing);
        assert_eq!(result.confidence, 0.6);
    }

    #[test]
    fn small_wiggles_are_stable_pricing() {
        let result = classify(&[100.0, 100.5, 99.8, 100.2, 99.9, 100.1], &[]);
        assert_eq!(result.strategy, PricingStrategyType::StablePricing);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn priced_at_peer_level_is_not_undercutting() {
        let prices = [100.0, 100.0, 100.0, 100.0, 100.0];
        let result = classify(&prices, &[101.0, 102.0]);
        assert_eq!(result.strategy, PricingStrategyType::StablePricing);
    }
}
