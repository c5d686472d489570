//! Forecast engine: strategy selection between the seasonal index estimator
//! and the seasonal ARIMA model

use crate::models::{ForecastMethod, ForecastPoint, Season, SeasonBucket, SeasonKey};

use super::sarima::SeasonalArima;
use super::stats::{mean, sample_std_dev, LinearTrend};
use super::{
    ForecastError, ForecastResult, ForecastSettings, CONFIDENCE_LEVEL, FORECAST_HORIZON, Z_95,
};

/// Predicted yields never drop below this value (kg per hectare)
pub const MIN_PREDICTED_YIELD: f64 = 100.0;

/// Buckets needed before a linear trend is applied
const MIN_TREND_BUCKETS: usize = 4;

/// Three forecast points and the strategy that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub points: Vec<ForecastPoint>,
    pub method: ForecastMethod,
}

fn point(
    year: i32,
    season: Season,
    predicted: f64,
    lower: f64,
    upper: f64,
    method: ForecastMethod,
) -> ForecastPoint {
    ForecastPoint {
        period: SeasonKey::new(year, season),
        season,
        year,
        predicted_yield: predicted,
        confidence_lower: lower,
        confidence_upper: upper,
        confidence_level: CONFIDENCE_LEVEL,
        method,
    }
}

/// Ratio of each season's average yield to the overall base
fn seasonal_factor(buckets: &[SeasonBucket], season: Season, base: f64) -> f64 {
    let matching: Vec<f64> = buckets
        .iter()
        .filter(|b| b.season == season)
        .map(|b| b.mean_yield)
        .collect();

    if matching.is_empty() || base <= 0.0 {
        return 1.0;
    }
    mean(&matching) / base
}

/// Trend plus seasonal index estimate with a normal-approximation band
///
/// `buckets` must be in chronological order. Always yields three points.
pub fn enhanced_seasonal_forecast(buckets: &[SeasonBucket], forecast_year: i32) -> Vec<ForecastPoint> {
    let yields: Vec<f64> = buckets.iter().map(|b| b.mean_yield).collect();
    let n = yields.len();
    let base = mean(&yields);
    let std_dev = sample_std_dev(&yields);

    let slope = if n >= MIN_TREND_BUCKETS {
        LinearTrend::fit(&yields).map(|t| t.slope).unwrap_or(0.0)
    } else {
        0.0
    };

    Season::ALL
        .iter()
        .take(FORECAST_HORIZON)
        .enumerate()
        .map(|(i, &season)| {
            let factor = seasonal_factor(buckets, season, base);
            let trended = base + slope * (n + i) as f64;
            let predicted = (trended * factor).max(MIN_PREDICTED_YIELD);
            let margin = Z_95 * std_dev;
            point(
                forecast_year,
                season,
                predicted,
                (predicted - margin).max(0.0),
                predicted + margin,
                ForecastMethod::EnhancedSeasonal,
            )
        })
        .collect()
}

/// Seasonal ARIMA forecast of the bucket series
///
/// Any fit or forecast failure comes back as `Err` for the caller to fall back on.
pub fn sarima_forecast(buckets: &[SeasonBucket], forecast_year: i32) -> ForecastResult<Vec<ForecastPoint>> {
    let series: Vec<f64> = buckets.iter().map(|b| b.mean_yield).collect();
    let fitted = SeasonalArima::default().fit(&series)?;
    let forecast = fitted.forecast(FORECAST_HORIZON, f64::from(CONFIDENCE_LEVEL) / 100.0)?;

    let points = Season::ALL
        .iter()
        .enumerate()
        .map(|(i, &season)| {
            let predicted = forecast.mean[i].max(MIN_PREDICTED_YIELD);
            let upper = forecast.upper[i].max(predicted);
            let lower = forecast.lower[i].max(0.0).min(predicted);
            point(forecast_year, season, predicted, lower, upper, ForecastMethod::Sarima)
        })
        .collect();

    Ok(points)
}

/// Forecast the three seasons of `forecast_year`
///
/// Refuses with `InsufficientSeasons` below `settings.min_seasons`. The
/// seasonal ARIMA result replaces the seasonal index estimate only when the
/// model fits.
pub fn forecast_seasons(
    buckets: &[SeasonBucket],
    forecast_year: i32,
    settings: &ForecastSettings,
) -> ForecastResult<ForecastOutcome> {
    if buckets.len() < settings.min_seasons {
        return Err(ForecastError::InsufficientSeasons {
            current: buckets.len(),
            required: settings.min_seasons,
        });
    }

    let mut ordered = buckets.to_vec();
    ordered.sort_by_key(|b| b.season_key);

    let enhanced = enhanced_seasonal_forecast(&ordered, forecast_year);

    if ordered.len() >= settings.min_sarima_seasons {
        match sarima_forecast(&ordered, forecast_year) {
            Ok(points) => {
                tracing::info!(seasons = ordered.len(), forecast_year, "Using seasonal ARIMA forecast");
                return Ok(ForecastOutcome {
                    points,
                    method: ForecastMethod::Sarima,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Seasonal ARIMA failed, falling back to enhanced seasonal");
            }
        }
    }

    tracing::info!(seasons = ordered.len(), forecast_year, "Using enhanced seasonal forecast");
    Ok(ForecastOutcome {
        points: enhanced,
        method: ForecastMethod::EnhancedSeasonal,
    })
}
