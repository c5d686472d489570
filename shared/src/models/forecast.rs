//! Seasonal forecast models

use serde::{Deserialize, Serialize};

use super::{Season, SeasonKey};

/// Aggregated yield for one harvest season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonBucket {
    pub season_key: SeasonKey,
    pub season: Season,
    pub year: i32,
    /// Mean yield per hectare across the season's observations
    pub mean_yield: f64,
    pub total_quantity: f64,
    pub observation_count: usize,
}

impl SeasonBucket {
    /// Build a bucket from its key; `season` and `year` mirror the key
    pub fn new(key: SeasonKey, mean_yield: f64, total_quantity: f64, observation_count: usize) -> Self {
        Self {
            season_key: key,
            season: key.season,
            year: key.year,
            mean_yield,
            total_quantity,
            observation_count,
        }
    }
}

/// Strategy that produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    EnhancedSeasonal,
    Sarima,
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastMethod::EnhancedSeasonal => write!(f, "enhanced_seasonal"),
            ForecastMethod::Sarima => write!(f, "sarima"),
        }
    }
}

/// Predicted yield for one upcoming season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: SeasonKey,
    pub season: Season,
    pub year: i32,
    pub predicted_yield: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub confidence_level: u8,
    pub method: ForecastMethod,
}

/// Coarse data sufficiency level attached to forecast and summary responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastDataQuality {
    High,
    Medium,
    Low,
    NoData,
    InvalidData,
    Error,
}

impl ForecastDataQuality {
    /// Classify by record and season counts
    pub fn from_counts(num_records: usize, num_seasons: usize) -> Self {
        if num_seasons >= 6 && num_records >= 20 {
            ForecastDataQuality::High
        } else if num_seasons >= 4 && num_records >= 10 {
            ForecastDataQuality::Medium
        } else {
            ForecastDataQuality::Low
        }
    }
}

/// Current vs. required season counts when forecasting is refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonShortfall {
    pub seasons: usize,
    pub records: usize,
    pub required_seasons: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetadata {
    pub total_seasons: usize,
    pub total_records: usize,
    pub variety: String,
    pub method: String,
    pub confidence_level: u8,
}

/// Response of the seasonal forecast query
///
/// An empty `forecast` is a normal outcome; `data_quality` and `warning`
/// explain why nothing was predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastPoint>,
    pub data_quality: ForecastDataQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_data: Option<SeasonShortfall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ForecastMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForecastResponse {
    /// Empty forecast with an explanatory warning
    pub fn empty(data_quality: ForecastDataQuality, warning: impl Into<String>) -> Self {
        Self {
            forecast: Vec::new(),
            data_quality,
            warning: Some(warning.into()),
            recommendation: None,
            current_data: None,
            metadata: None,
            error: None,
        }
    }

    /// Response for an unexpected failure while computing the forecast
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(
                ForecastDataQuality::Error,
                "An error occurred while generating the forecast. Please check your data and try again.",
            )
        }
    }
}

/// Yield summary over all production records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSummary {
    /// Average yield per hectare of the valid records
    pub total_yield: f64,
    pub total_records: usize,
    pub avg_production: f64,
    pub accuracy: f64,
    pub data_quality: ForecastDataQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CurrentSummary {
    /// Zeroed summary used when nothing can be computed
    pub fn zeroed(total_records: usize, data_quality: ForecastDataQuality) -> Self {
        Self {
            total_yield: 0.0,
            total_records,
            avg_production: 0.0,
            accuracy: 0.0,
            data_quality,
            valid_records: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::zeroed(0, ForecastDataQuality::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_quality_levels() {
        assert_eq!(ForecastDataQuality::from_counts(20, 6), ForecastDataQuality::High);
        assert_eq!(ForecastDataQuality::from_counts(19, 6), ForecastDataQuality::Medium);
        assert_eq!(ForecastDataQuality::from_counts(10, 4), ForecastDataQuality::Medium);
        assert_eq!(ForecastDataQuality::from_counts(10, 3), ForecastDataQuality::Low);
        assert_eq!(ForecastDataQuality::from_counts(0, 0), ForecastDataQuality::Low);
    }

    #[test]
    fn test_failed_response_serialization() {
        let response = ForecastResponse::failed("boom");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data_quality"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json["forecast"].as_array().unwrap().is_empty());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_method_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ForecastMethod::EnhancedSeasonal).unwrap(),
            "\"enhanced_seasonal\""
        );
        assert_eq!(ForecastMethod::Sarima.to_string(), "sarima");
    }
}
