// Shared numeric helpers used across the analyzers. Pure functions, no I/O.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two points.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation (std dev / |mean|); 0.0 when the mean is ~0.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg.abs() < f64::EPSILON {
        return 0.0;
    }
    std_dev(values) / avg.abs()
}

/// Ordinary least-squares fit of value on index 0..n-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fitted value at the given (possibly fractional or future) index.
    pub fn value_at(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

/// Fits value on index via OLS. Degenerate inputs (fewer than two points,
/// zero index variance) yield a flat fit through the mean.
pub fn linear_fit(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: mean(values),
        };
    }
    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..n).map(|i| (i as f64).powi(2)).sum();

    let denominator = nf * sum_x2 - sum_x.powi(2);
    if denominator.abs() < f64::EPSILON {
        return LinearFit {
            slope: 0.0,
            intercept: mean(values),
        };
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    LinearFit { slope, intercept }
}

/// Pearson correlation coefficient between two slices.
/// Returns None if slices have different lengths, are empty, or either side
/// has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let numerator: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let denom_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let denom_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let denominator = (denom_x * denom_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Pearson r between a series and its index positions; 0.0 when undefined.
pub fn index_correlation(values: &[f64]) -> f64 {
    let indices: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    pearson(&indices, values).unwrap_or(0.0)
}

/// t-statistic for a correlation coefficient over n samples.
/// Saturates when r² ~ 1 (a perfect fit is maximally significant).
pub fn t_statistic(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 0.0;
    }
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return f64::INFINITY;
    }
    r * ((n - 2) as f64 / denom).sqrt()
}

/// Approximate two-sided p-value for a t-statistic.
///
/// Informal normal-tail approximation calibrated so |t| = 1.96 maps to
/// p ~ 0.05. The significance gates downstream are tuned to this curve;
/// swapping in an exact test would shift trend classifications.
pub fn two_sided_p_value(t: f64) -> f64 {
    let z = t.abs();
    (-0.717 * z - 0.416 * z * z).exp().clamp(0.0, 1.0)
}

/// Standard error of regression residuals with n-2 degrees of freedom;
/// 0.0 when there are not enough points to leave any freedom.
pub fn residual_std_error(values: &[f64], fit: &LinearFit) -> f64 {
    let n = values.len();
    if n <= 2 {
        return 0.0;
    }
    let sse: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - fit.value_at(i as f64)).powi(2))
        .sum();
    (sse / (n - 2) as f64).sqrt()
}

/// Autocorrelation function for lags 0..=max_lag (lag 0 is always 1).
/// A zero-variance series autocorrelates perfectly at every lag.
pub fn autocorrelation(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let avg = mean(values);
    let var: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    if var == 0.0 {
        return vec![1.0; max_lag + 1];
    }

    (0..=max_lag.min(n - 1))
        .map(|lag| {
            if lag == 0 {
                1.0
            } else {
                values
                    .iter()
                    .take(n - lag)
                    .zip(values.iter().skip(lag))
                    .map(|(a, b)| (a - avg) * (b - avg))
                    .sum::<f64>()
                    / var
            }
        })
        .collect()
}

/// Relative Strength Index over a price sequence.
/// Returns 0.0 for fewer than two points and 50.0 for a flat sequence.
pub fn relative_strength_index(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for w in prices.windows(2) {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    if gains + losses == 0.0 {
        return 50.0;
    }

    let rs = gains / losses.max(1e-6);
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fit_recovers_slope_and_intercept() {
        let values: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let fit = linear_fit(&values);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.value_at(12.0) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn linear_fit_degenerate_inputs_are_flat() {
        assert_eq!(linear_fit(&[]).slope, 0.0);
        let fit = linear_fit(&[5.0]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
    }

    #[test]
    fn pearson_perfect_correlation() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![10.0, 20.0, 30.0, 40.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_rejects_flat_and_mismatched_inputs() {
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_none());
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_none());
    }

    #[test]
    fn p_value_calibration() {
        // No signal: p = 1. At the classic 1.96 cutoff: p ~ 0.05.
        assert!((two_sided_p_value(0.0) - 1.0).abs() < 1e-9);
        let p = two_sided_p_value(1.96);
        assert!((p - 0.05).abs() < 0.005, "p(1.96) = {p}");
        assert!(two_sided_p_value(10.0) < 1e-6);
    }

    #[test]
    fn t_statistic_saturates_on_perfect_fit() {
        assert!(t_statistic(1.0, 30).is_infinite());
        assert_eq!(t_statistic(0.5, 2), 0.0);
        assert_eq!(two_sided_p_value(f64::INFINITY), 0.0);
    }

    #[test]
    fn autocorrelation_basics() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let acf = autocorrelation(&values, 3);
        assert_eq!(acf.len(), 4);
        assert_eq!(acf[0], 1.0);

        let flat = autocorrelation(&[2.0; 10], 4);
        assert!(flat.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn autocorrelation_finds_period_four_signal() {
        let values: Vec<f64> = (0..40).map(|i| (i % 4) as f64 * 10.0).collect();
        let acf = autocorrelation(&values, 10);
        assert!(acf[4] > 0.8);
        assert!(acf[4] > acf[3]);
        assert!(acf[4] > acf[5]);
    }

    #[test]
    fn rsi_extremes() {
        assert_eq!(relative_strength_index(&[10.0]), 0.0);
        assert_eq!(relative_strength_index(&[5.0, 5.0, 5.0]), 50.0);
        // Monotonic gains push RSI toward 100.
        assert!(relative_strength_index(&[1.0, 2.0, 3.0, 4.0]) > 99.0);
        // Monotonic losses push it toward 0.
        assert!(relative_strength_index(&[4.0, 3.0, 2.0, 1.0]) < 1.0);
    }

    #[test]
    fn residual_std_error_zero_for_perfect_line() {
        let values: Vec<f64> = (0..10).map(|i| 1.0 + 0.5 * i as f64).collect();
        let fit = linear_fit(&values);
        assert!(residual_std_error(&values, &fit) < 1e-9);
        assert_eq!(residual_std_error(&values[..2], &fit), 0.0);
    }

    #[test]
    fn coefficient_of_variation_guards_zero_mean() {
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), 0.0);
        let cv = coefficient_of_variation(&[8.0, 12.0]);
        assert!((cv - 0.2).abs() < 1e-9);
    }
}
