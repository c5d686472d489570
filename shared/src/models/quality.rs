//! Data quality assessment models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality tier of the historical dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQualityLevel {
    Insufficient,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl DataQualityLevel {
    /// Map a 0-100 quality score to its tier
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => DataQualityLevel::Excellent,
            s if s >= 60 => DataQualityLevel::Good,
            s if s >= 40 => DataQualityLevel::Fair,
            s if s >= 20 => DataQualityLevel::Poor,
            _ => DataQualityLevel::Insufficient,
        }
    }
}

impl fmt::Display for DataQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataQualityLevel::Insufficient => "insufficient",
            DataQualityLevel::Poor => "poor",
            DataQualityLevel::Fair => "fair",
            DataQualityLevel::Good => "good",
            DataQualityLevel::Excellent => "excellent",
        };
        f.write_str(name)
    }
}

/// Detailed data quality assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub quality_level: DataQualityLevel,
    pub quality_score: u32,
    pub total_records: usize,
    pub valid_records: usize,
    /// Share of records with a usable yield, in percent
    pub data_completeness: f64,
    pub date_range_years: f64,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataQualityReport {
    /// Zeroed report for an assessment that could not run
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            quality_level: DataQualityLevel::Insufficient,
            quality_score: 0,
            total_records: 0,
            valid_records: 0,
            data_completeness: 0.0,
            date_range_years: 0.0,
            recommendations: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(DataQualityLevel::from_score(100), DataQualityLevel::Excellent);
        assert_eq!(DataQualityLevel::from_score(80), DataQualityLevel::Excellent);
        assert_eq!(DataQualityLevel::from_score(79), DataQualityLevel::Good);
        assert_eq!(DataQualityLevel::from_score(60), DataQualityLevel::Good);
        assert_eq!(DataQualityLevel::from_score(40), DataQualityLevel::Fair);
        assert_eq!(DataQualityLevel::from_score(20), DataQualityLevel::Poor);
        assert_eq!(DataQualityLevel::from_score(19), DataQualityLevel::Insufficient);
        assert_eq!(DataQualityLevel::from_score(0), DataQualityLevel::Insufficient);
    }

    #[test]
    fn test_failed_report_is_zeroed() {
        let json = serde_json::to_value(DataQualityReport::failed("db down")).unwrap();
        assert_eq!(json["quality_level"], "insufficient");
        assert_eq!(json["quality_score"], 0);
        assert_eq!(json["error"], "db down");
        assert!(json["recommendations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DataQualityLevel::Excellent).unwrap(),
            "\"excellent\""
        );
    }
}
