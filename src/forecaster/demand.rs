use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::cache::TtlCache;
use crate::calendar::{HolidayCalendar, UsRetailCalendar};
use crate::config::ForecastConfig;
use crate::error::EngineError;
use crate::forecaster::factors;
use crate::model::{
    DemandForecast, ExternalFactors, ForecastInterval, ForecastRequest, TimeSeriesPoint,
};
use crate::provider::HistoricalSeriesProvider;
use crate::stats;

/// Builds seasonality-aware demand forecasts from historical sales volume.
///
/// Provider-backed forecasts are cached per (target, timeframe); requests
/// that carry their own history bypass the cache entirely.
pub struct DemandForecaster {
    provider: Arc<dyn HistoricalSeriesProvider>,
    calendar: Arc<dyn HolidayCalendar>,
    config: ForecastConfig,
    forecast_cache: TtlCache<DemandForecast>,
}

impl DemandForecaster {
    pub fn new(provider: Arc<dyn HistoricalSeriesProvider>, config: ForecastConfig) -> Self {
        Self::with_calendar(provider, config, Arc::new(UsRetailCalendar))
    }

    pub fn with_calendar(
        provider: Arc<dyn HistoricalSeriesProvider>,
        config: ForecastConfig,
        calendar: Arc<dyn HolidayCalendar>,
    ) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            provider,
            calendar,
            config,
            forecast_cache: TtlCache::new(ttl),
        }
    }

    /// Forecasts demand over `request.timeframe_days` days starting tomorrow.
    ///
    /// Exactly one of `product_id` / `category_id` must be set. Short or
    /// missing history degrades to the all-zero forecast rather than failing;
    /// only argument errors and provider failures surface as `Err`.
    pub async fn forecast_demand(
        &self,
        request: &ForecastRequest,
    ) -> Result<DemandForecast, EngineError> {
        let subject = request.subject()?;

        if let Some(history) = &request.historical_data {
            return Ok(self.build_forecast(request, history));
        }

        let key = format!(
            "{}:{}|days:{}",
            subject.kind(),
            subject.id(),
            request.timeframe_days
        );
        self.forecast_cache
            .get_or_try_insert_with(&key, || async {
                let history = self
                    .provider
                    .get_series(
                        subject.id(),
                        "sales_volume",
                        self.config.history_window_days,
                    )
                    .await?;
                Ok(self.build_forecast(request, &history))
            })
            .await
    }

    fn build_forecast(
        &self,
        request: &ForecastRequest,
        history: &[TimeSeriesPoint],
    ) -> DemandForecast {
        let timeframe = request.timeframe_days as usize;
        let start = Utc::now().date_naive() + chrono::Duration::days(1);
        let dates: Vec<NaiveDate> = (0..timeframe)
            .map(|offset| start + chrono::Duration::days(offset as i64))
            .collect();

        if history.len() < self.config.min_data_points {
            debug!(
                points = history.len(),
                needed = self.config.min_data_points,
                "insufficient history, returning zero forecast"
            );
            return DemandForecast {
                product_id: request.product_id.clone(),
                category_id: request.category_id.clone(),
                timeframe_days: request.timeframe_days,
                forecast_values: vec![0.0; timeframe],
                forecast_dates: dates,
                confidence_intervals: None,
                seasonality_factors: Default::default(),
                total_forecast: 0.0,
                growth_rate: 0.0,
                forecast_accuracy: 0.0,
                generated_at: Utc::now(),
            };
        }

        let values: Vec<f64> = history.iter().map(|p| p.value).collect();
        let n = values.len();
        let fit = stats::linear_fit(&values);
        let seasonality = factors::seasonality_factors(history);
        let external = request.external_factors.as_ref();

        let forecast_values: Vec<f64> = dates
            .iter()
            .enumerate()
            .map(|(offset, &date)| {
                let day = offset as i64 + 1;
                let base = fit.value_at((n - 1) as f64 + day as f64);
                let seasonal = factors::seasonal_multiplier(&seasonality, date);
                (base * seasonal * self.external_multiplier(external, day, date)).max(0.0)
            })
            .collect();

        let se = stats::residual_std_error(&values, &fit);
        let intervals: Vec<ForecastInterval> = dates
            .iter()
            .zip(&forecast_values)
            .enumerate()
            .map(|(offset, (&date, &value))| {
                let day = offset as i64 + 1;
                let width = se * (1.0 + self.config.interval_growth * day as f64);
                ForecastInterval {
                    date,
                    lower_80: (value - width).max(0.0),
                    upper_80: value + width,
                    lower_95: (value - 1.96 * width).max(0.0),
                    upper_95: value + 1.96 * width,
                }
            })
            .collect();

        let total_forecast: f64 = forecast_values.iter().sum();
        let trailing_len = timeframe.min(n);
        let trailing: f64 = values[n - trailing_len..].iter().sum();
        let growth_rate = if trailing.abs() < f64::EPSILON {
            0.0
        } else {
            (total_forecast - trailing) / trailing
        };

        let cv = stats::coefficient_of_variation(&values);
        let forecast_accuracy =
            ((0.9 - cv * 0.4).max(0.5) + 0.1 * (n.min(100) as f64 / 100.0)).clamp(0.0, 1.0);

        DemandForecast {
            product_id: request.product_id.clone(),
            category_id: request.category_id.clone(),
            timeframe_days: request.timeframe_days,
            forecast_values,
            forecast_dates: dates,
            confidence_intervals: Some(intervals),
            seasonality_factors: seasonality,
            total_forecast,
            growth_rate,
            forecast_accuracy,
            generated_at: Utc::now(),
        }
    }

    /// Multiplier from caller context and the holiday calendar for one
    /// forecast day (`day` counts from 1).
    fn external_multiplier(
        &self,
        external: Option<&ExternalFactors>,
        day: i64,
        date: NaiveDate,
    ) -> f64 {
        let mut multiplier = 1.0;
        if let Some(factors) = external {
            if let (Some(boost), Some(start), Some(end)) = (
                factors.promotion_boost,
                factors.promotion_start_day,
                factors.promotion_end_day,
            ) {
                if day >= start && day <= end {
                    multiplier *= 1.0 + boost;
                }
            }
            if let Some(increase) = factors.competition_increase {
                multiplier *= (1.0 - increase).max(0.0);
            }
            if let Some(growth) = factors.market_growth {
                multiplier *= 1.0 + growth * day as f64 / 365.0;
            }
        }
        if self.calendar.is_holiday(date) {
            multiplier *= 1.0 + self.config.holiday_boost;
        }
        multiplier.max(0.0)
    }
}
