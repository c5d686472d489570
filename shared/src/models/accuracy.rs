//! Forecast accuracy validation models

use serde::{Deserialize, Serialize};

/// Name reported for the rolling-origin validation protocol
pub const VALIDATION_METHOD: &str = "Time Series Cross-Validation";

/// Metrics for one cross-validation split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFold {
    /// 1-based fold number
    pub fold: usize,
    /// 100 - MAPE, floored at 0
    pub accuracy: f64,
    pub mae: f64,
    pub rmse: f64,
    pub test_size: usize,
}

/// Aggregated cross-validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub accuracy_percentage: f64,
    pub accuracy_std: f64,
    pub mae: f64,
    pub rmse: f64,
    /// 95% interval on the accuracy estimate, clamped to [0, 100]
    pub confidence_interval: [f64; 2],
    pub validation_method: String,
    pub cross_validation_folds: usize,
    pub total_samples: usize,
    pub fold_results: Vec<ValidationFold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    /// Zeroed report for a validation that could not run
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            accuracy_percentage: 0.0,
            accuracy_std: 0.0,
            mae: 0.0,
            rmse: 0.0,
            confidence_interval: [0.0, 0.0],
            validation_method: VALIDATION_METHOD.to_string(),
            cross_validation_folds: 0,
            total_samples: 0,
            fold_results: Vec::new(),
            error: Some(error.into()),
        }
    }
}
