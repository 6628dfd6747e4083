// Seasonality detection: autocorrelation of the detrended series with a
// local-maximum peak picker.

use crate::config::TrendConfig;
use crate::model::SeasonalityPattern;
use crate::stats;

/// Looks for a repeating period in `values`. Needs at least
/// `min_seasonality_points`; the strongest qualifying ACF peak sets the
/// period and strength.
pub fn detect(config: &TrendConfig, values: &[f64]) -> SeasonalityPattern {
    let n = values.len();
    if n < config.min_seasonality_points {
        return SeasonalityPattern::none();
    }

    let fit = stats::linear_fit(values);
    let detrended: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v - fit.value_at(i as f64))
        .collect();

    let acf = stats::autocorrelation(&detrended, n / 2);
    let peaks = find_peaks(&acf, config.acf_peak_height, config.acf_peak_spacing);

    let best = peaks
        .iter()
        .copied()
        .filter(|&lag| acf[lag] > config.seasonality_threshold)
        .max_by(|&a, &b| acf[a].total_cmp(&acf[b]));

    match best {
        Some(lag) => SeasonalityPattern {
            detected: true,
            period: Some(lag),
            strength: acf[lag],
            confidence: (1.5 * acf[lag]).min(1.0),
            peak_lags: peaks,
        },
        None => SeasonalityPattern {
            peak_lags: peaks,
            ..SeasonalityPattern::none()
        },
    }
}

/// Local maxima of the ACF at lags >= 1, at least `min_height` tall and
/// `min_spacing` lags apart.
fn find_peaks(acf: &[f64], min_height: f64, min_spacing: usize) -> Vec<usize> {
    let mut peaks: Vec<usize> = Vec::new();
    for lag in 1..acf.len().saturating_sub(1) {
        if acf[lag] < min_height {
            continue;
        }
        if acf[lag] > acf[lag - 1] && acf[lag] >= acf[lag + 1] {
            if peaks.last().is_none_or(|&prev| lag - prev >= min_spacing) {
                peaks.push(lag);
            }
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrendConfig {
        TrendConfig::default()
    }

    #[test]
    fn short_series_is_not_seasonal() {
        let values: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let pattern = detect(&config(), &values);
        assert!(!pattern.detected);
        assert_eq!(pattern.period, None);
        assert_eq!(pattern.strength, 0.0);
    }

    #[test]
    fn weekly_pattern_is_detected_at_lag_seven() {
        // Six weeks of daily data with a weekend bump on top of a mild trend.
        let values: Vec<f64> = (0..42)
            .map(|i| {
                let weekend = if i % 7 >= 5 { 40.0 } else { 0.0 };
                100.0 + 0.5 * i as f64 + weekend
            })
            .collect();
        let pattern = detect(&config(), &values);
        assert!(pattern.detected);
        assert_eq!(pattern.period, Some(7));
        assert!(pattern.strength > 0.2);
        assert!((pattern.confidence - (1.5 * pattern.strength).min(1.0)).abs() < 1e-9);
    }

    #[test]
    fn sawtooth_period_six_is_detected() {
        let values: Vec<f64> = (0..36).map(|i| 50.0 + (i % 6) as f64 * 8.0).collect();
        let pattern = detect(&config(), &values);
        assert!(pattern.detected);
        assert_eq!(pattern.period, Some(6));
    }

    #[test]
    fn straight_line_has_no_seasonality() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + 2.0 * i as f64).collect();
        let pattern = detect(&config(), &values);
        assert!(!pattern.detected);
    }

    #[test]
    fn peak_picker_respects_height_and_spacing() {
        let acf = vec![1.0, 0.05, 0.5, 0.3, 0.45, 0.2, 0.6, 0.1];
        let peaks = find_peaks(&acf, 0.1, 2);
        // Lags 2, 4 and 6 are local maxima two apart, all tall enough.
        assert_eq!(peaks, vec![2, 4, 6]);

        let sparse = find_peaks(&acf, 0.1, 3);
        assert_eq!(sparse, vec![2, 6]);
    }
}
