//! Rolling-origin cross-validation of forecast accuracy

use std::ops::Range;

use crate::models::{ValidationFold, ValidationReport, VALIDATION_METHOD};
use crate::types::round_to;

use super::stats::{mean, population_std_dev, LinearTrend};
use super::{ForecastError, ForecastResult, ForecastSettings, Z_95};

/// Upper bound on validation folds
pub const MAX_VALIDATION_FOLDS: usize = 5;

/// Upper bound on folds used for the summary accuracy figure
pub const MAX_SUMMARY_FOLDS: usize = 3;

/// One forward-chaining split: train is always a prefix ending where test starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Expanding-window split of `n` ordered samples into `k` folds
///
/// Test blocks have `n / (k + 1)` samples each and end at the last sample;
/// any remainder goes to the first training set.
pub fn time_series_split(n: usize, k: usize) -> ForecastResult<Vec<FoldSplit>> {
    if k == 0 {
        return Err(ForecastError::InvalidSplit(
            "Number of folds must be at least 1".to_string(),
        ));
    }
    if k + 1 > n {
        return Err(ForecastError::InvalidSplit(format!(
            "Cannot split {} samples into {} folds",
            n, k
        )));
    }

    let test_size = n / (k + 1);
    let first_test = n - k * test_size;

    Ok((0..k)
        .map(|i| {
            let start = first_test + i * test_size;
            FoldSplit {
                train: 0..start,
                test: start..start + test_size,
            }
        })
        .collect())
}

/// `max(0, 100 - MAPE)` rounded to one decimal; zero actuals are skipped
pub fn forecast_accuracy(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return 0.0;
    }

    let ape: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .collect();

    if ape.is_empty() {
        return 0.0;
    }

    round_to((100.0 - mean(&ape) * 100.0).max(0.0), 1)
}

fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let errors: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).collect();
    mean(&errors)
}

fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let squared: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).collect();
    mean(&squared).sqrt()
}

/// Linear trend extrapolated over the test positions, or the training mean
/// when the trend can't be fitted
fn trend_predictions(train: &[f64], test: &Range<usize>) -> Vec<f64> {
    match LinearTrend::fit(train) {
        Ok(trend) => test.clone().map(|pos| trend.predict(pos)).collect(),
        Err(_) => vec![mean(train); test.len()],
    }
}

/// Cross-validate a linear trend forecaster over a chronological yield series
pub fn cross_validate(yields: &[f64], settings: &ForecastSettings) -> ForecastResult<ValidationReport> {
    let n = yields.len();
    if n < settings.min_validation_records {
        return Err(ForecastError::InsufficientValidationSamples {
            current: n,
            required: settings.min_validation_records,
        });
    }

    let k = MAX_VALIDATION_FOLDS.min(n / 3);
    let splits = time_series_split(n, k)?;

    let mut folds = Vec::with_capacity(splits.len());
    for split in &splits {
        if split.train.is_empty() || split.test.is_empty() {
            continue;
        }
        let train = &yields[split.train.clone()];
        let actual = &yields[split.test.clone()];
        let predicted = trend_predictions(train, &split.test);

        folds.push(ValidationFold {
            fold: folds.len() + 1,
            accuracy: forecast_accuracy(actual, &predicted),
            mae: mean_absolute_error(actual, &predicted),
            rmse: root_mean_squared_error(actual, &predicted),
            test_size: actual.len(),
        });
    }

    if folds.is_empty() {
        return Err(ForecastError::NoValidFolds);
    }

    let accuracies: Vec<f64> = folds.iter().map(|f| f.accuracy).collect();
    let maes: Vec<f64> = folds.iter().map(|f| f.mae).collect();
    let rmses: Vec<f64> = folds.iter().map(|f| f.rmse).collect();

    let avg_accuracy = mean(&accuracies);
    let accuracy_std = population_std_dev(&accuracies);

    tracing::debug!(
        folds = folds.len(),
        samples = n,
        accuracy = avg_accuracy,
        "Cross-validation complete"
    );

    Ok(ValidationReport {
        accuracy_percentage: round_to(avg_accuracy, 1),
        accuracy_std: round_to(accuracy_std, 2),
        mae: round_to(mean(&maes), 2),
        rmse: round_to(mean(&rmses), 2),
        confidence_interval: [
            round_to((avg_accuracy - Z_95 * accuracy_std).max(0.0), 1),
            round_to((avg_accuracy + Z_95 * accuracy_std).min(100.0), 1),
        ],
        validation_method: VALIDATION_METHOD.to_string(),
        cross_validation_folds: folds.len(),
        total_samples: n,
        error: None,
        fold_results: folds
            .into_iter()
            .map(|f| ValidationFold {
                mae: round_to(f.mae, 2),
                rmse: round_to(f.rmse, 2),
                ..f
            })
            .collect(),
    })
}

/// Conservative accuracy figure when the summary folds can't be built
fn fallback_accuracy(valid_records: usize) -> f64 {
    match valid_records {
        n if n >= 10 => 75.0,
        n if n >= 5 => 60.0,
        _ => 45.0,
    }
}

/// Accuracy of a training-mean forecaster, used by the current summary
///
/// Below the validation threshold this is a flat low estimate rather than an error.
pub fn summary_accuracy(yields: &[f64], settings: &ForecastSettings) -> f64 {
    let n = yields.len();
    if n < settings.min_validation_records {
        return 30.0;
    }

    let splits = match time_series_split(n, MAX_SUMMARY_FOLDS.min(n / 3)) {
        Ok(splits) => splits,
        Err(e) => {
            tracing::warn!(error = %e, "Summary accuracy split failed, using estimate");
            return fallback_accuracy(n);
        }
    };

    let accuracies: Vec<f64> = splits
        .iter()
        .filter(|s| !s.train.is_empty() && !s.test.is_empty())
        .map(|s| {
            let actual = &yields[s.test.clone()];
            let predicted = vec![mean(&yields[s.train.clone()]); actual.len()];
            forecast_accuracy(actual, &predicted)
        })
        .collect();

    if accuracies.is_empty() {
        0.0
    } else {
        mean(&accuracies)
    }
}
