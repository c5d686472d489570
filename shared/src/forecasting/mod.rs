//! Seasonal yield forecasting
//!
//! Turns historical production records into per-season yield forecasts:
//! - Season assignment and aggregation into `(year, season)` buckets
//! - Data quality scoring with improvement recommendations
//! - Two forecasting strategies: an always-available trend + seasonal index
//!   estimator, and a seasonal ARIMA model used when enough seasons exist
//! - Rolling-origin cross-validation of forecast accuracy
//!
//! Everything here is pure computation over a read-only snapshot of records.

pub mod accuracy;
pub mod aggregate;
pub mod engine;
mod error;
mod optimize;
pub mod quality;
pub mod report;
pub mod sarima;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use accuracy::{cross_validate, summary_accuracy, time_series_split, FoldSplit};
pub use aggregate::{aggregate_by_season, SeasonalAggregate};
pub use engine::{enhanced_seasonal_forecast, forecast_seasons, ForecastOutcome};
pub use error::{ForecastError, ForecastResult};
pub use quality::assess_data_quality;
pub use report::{current_summary, forecast_report, validation_report};

/// Minimum distinct seasons (about two years of triple cropping) to forecast at all
pub const MIN_SEASONS_REQUIRED: usize = 6;

/// Minimum distinct seasons before the seasonal ARIMA model is attempted
pub const MIN_SARIMA_SEASONS: usize = 8;

/// Minimum valid yield values for cross-validation
pub const MIN_RECORDS_FOR_VALIDATION: usize = 8;

/// Confidence level of every reported interval, in percent
pub const CONFIDENCE_LEVEL: u8 = 95;

/// Two-sided 95% normal quantile used for the normal-approximation bands
pub const Z_95: f64 = 1.96;

/// Seasons forecast per run (one full year)
pub const FORECAST_HORIZON: usize = 3;

/// Thresholds that gate forecasting and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub min_seasons: usize,
    pub min_sarima_seasons: usize,
    pub min_validation_records: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            min_seasons: MIN_SEASONS_REQUIRED,
            min_sarima_seasons: MIN_SARIMA_SEASONS,
            min_validation_records: MIN_RECORDS_FOR_VALIDATION,
        }
    }
}
