// Concentration indices, price distribution and segment mix over a
// competitor snapshot set.

use crate::model::{
    CompetitorSnapshot, MarketConcentration, MarketSegment, PriceBucket, SegmentMix,
};

const BUCKET_COUNT: usize = 5;

/// HHI, CR4 and the largest single share. Zeroed for an empty set.
pub fn concentration(snapshots: &[CompetitorSnapshot]) -> MarketConcentration {
    let mut shares: Vec<f64> = snapshots.iter().map(|s| s.market_share).collect();
    shares.sort_by(|a, b| b.total_cmp(a));

    MarketConcentration {
        hhi: shares.iter().map(|s| s * s).sum::<f64>() * 10_000.0,
        cr4: shares.iter().take(4).sum::<f64>().min(1.0),
        top_share: shares.first().copied().unwrap_or(0.0),
    }
}

/// Competitor average prices in five equal-width buckets spanning [min, max].
/// Identical prices all land in the first bucket.
pub fn price_buckets(snapshots: &[CompetitorSnapshot]) -> Vec<PriceBucket> {
    let prices: Vec<f64> = snapshots.iter().map(|s| s.average_price).collect();
    if prices.is_empty() {
        return Vec::new();
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / BUCKET_COUNT as f64;

    let mut buckets: Vec<PriceBucket> = (0..BUCKET_COUNT)
        .map(|i| PriceBucket {
            range_start: min + i as f64 * width,
            range_end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &price in &prices {
        let index = if width < f64::EPSILON {
            0
        } else {
            (((price - min) / width) as usize).min(BUCKET_COUNT - 1)
        };
        buckets[index].count += 1;
    }
    buckets
}

/// Product-count-weighted segment membership, normalized to shares.
/// Falls back to the fixed default mix when there is nothing to weigh.
pub fn segment_mix(snapshots: &[CompetitorSnapshot]) -> SegmentMix {
    let mut weights = [0.0_f64; 4];
    for snapshot in snapshots {
        let weight = snapshot.product_count as f64;
        for segment in &snapshot.segments {
            let index = match segment {
                MarketSegment::Budget => 0,
                MarketSegment::MidRange => 1,
                MarketSegment::Premium => 2,
                MarketSegment::Luxury => 3,
            };
            weights[index] += weight;
        }
    }

    let total: f64 = weights.iter().sum();
    if total < f64::EPSILON {
        return SegmentMix::default();
    }
    SegmentMix {
        budget: weights[0] / total,
        mid_range: weights[1] / total,
        premium: weights[2] / total,
        luxury: weights[3] / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketRank;
    use chrono::Utc;

    fn snapshot(id: &str, share: f64, average_price: f64, product_count: u32) -> CompetitorSnapshot {
        CompetitorSnapshot {
            competitor_id: id.to_string(),
            price_history: Vec::new(),
            average_price,
            min_price: average_price,
            max_price: average_price,
            product_count,
            rating: None,
            review_count: None,
            market_share: share,
            rank: MarketRank::Follower,
            segments: vec![MarketSegment::MidRange],
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn hhi_matches_hand_computed_value() {
        let snapshots = vec![
            snapshot("a", 0.5, 40.0, 50),
            snapshot("b", 0.4, 50.0, 40),
            snapshot("c", 0.1, 60.0, 10),
        ];
        let result = concentration(&snapshots);
        assert!((result.hhi - 4200.0).abs() < 1e-6);
        assert!((result.cr4 - 1.0).abs() < 1e-9);
        assert!((result.top_share - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cr4_sums_only_the_top_four() {
        let snapshots: Vec<CompetitorSnapshot> = (0..6)
            .map(|i| snapshot(&format!("c{i}"), 1.0 / 6.0, 50.0, 10))
            .collect();
        let result = concentration(&snapshots);
        assert!((result.cr4 - 4.0 / 6.0).abs() < 1e-9);
        assert!(result.hhi > 0.0 && result.hhi <= 10_000.0);
    }

    #[test]
    fn empty_set_has_zero_concentration() {
        let result = concentration(&[]);
        assert_eq!(result.hhi, 0.0);
        assert_eq!(result.cr4, 0.0);
        assert_eq!(result.top_share, 0.0);
    }

    #[test]
    fn buckets_span_min_to_max() {
        let snapshots = vec![
            snapshot("a", 0.25, 10.0, 10),
            snapshot("b", 0.25, 35.0, 10),
            snapshot("c", 0.25, 60.0, 10),
            snapshot("d", 0.25, 110.0, 10),
        ];
        let buckets = price_buckets(&snapshots);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].range_start, 10.0);
        assert_eq!(buckets[4].range_end, 110.0);
        // The max price lands in the last bucket, not one past it.
        assert_eq!(buckets[4].count, 1);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn identical_prices_collapse_into_first_bucket() {
        let snapshots = vec![snapshot("a", 0.5, 50.0, 10), snapshot("b", 0.5, 50.0, 10)];
        let buckets = price_buckets(&snapshots);
        assert_eq!(buckets[0].count, 2);
        assert!(buckets[1..].iter().all(|b| b.count == 0));
    }

    #[test]
    fn no_prices_no_buckets() {
        assert!(price_buckets(&[]).is_empty());
    }

    #[test]
    fn segment_mix_weighs_by_product_count() {
        let mut budget = snapshot("a", 0.75, 20.0, 75);
        budget.segments = vec![MarketSegment::Budget];
        let mut premium = snapshot("b", 0.25, 90.0, 25);
        premium.segments = vec![MarketSegment::Premium];

        let mix = segment_mix(&[budget, premium]);
        assert!((mix.budget - 0.75).abs() < 1e-9);
        assert!((mix.premium - 0.25).abs() < 1e-9);
        assert_eq!(mix.mid_range, 0.0);
        let total = mix.budget + mix.mid_range + mix.premium + mix.luxury;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dual_segment_membership_splits_weight() {
        let mut wide = snapshot("a", 1.0, 60.0, 10);
        wide.segments = vec![MarketSegment::MidRange, MarketSegment::Premium];

        let mix = segment_mix(&[wide]);
        assert!((mix.mid_range - 0.5).abs() < 1e-9);
        assert!((mix.premium - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_set_uses_default_mix() {
        let mix = segment_mix(&[]);
        assert_eq!(mix, SegmentMix::default());
    }
}
