//! Error types for the forecasting core

use thiserror::Error;

/// Forecasting failures
///
/// `InsufficientSeasons` and `InsufficientValidationSamples` are reportable
/// preconditions; `ModelFit` is always recovered from inside the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Insufficient historical data. Found {current} seasons, need at least {required} seasons")]
    InsufficientSeasons { current: usize, required: usize },

    #[error("Insufficient data for validation. Need at least {required} records.")]
    InsufficientValidationSamples { current: usize, required: usize },

    #[error("No valid cross-validation folds generated")]
    NoValidFolds,

    #[error("Invalid time series split: {0}")]
    InvalidSplit(String),

    #[error("Model fit failed: {0}")]
    ModelFit(String),

    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias for forecasting operations
pub type ForecastResult<T> = Result<T, ForecastError>;
