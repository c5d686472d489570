//! Data quality scoring

use crate::models::{DataQualityLevel, DataQualityReport, ProductionRecord};
use crate::types::{round_to, DateRange};

use super::stats::coefficient_of_variation;
use super::ForecastSettings;

/// Coefficient of variation below which yields count as consistent
const CONSISTENT_YIELD_CV: f64 = 0.5;

/// Inputs to the additive quality score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityInputs {
    pub valid_records: usize,
    pub total_records: usize,
    pub date_range_years: f64,
    /// `None` when there are no valid yields to measure
    pub coefficient_of_variation: Option<f64>,
}

impl QualityInputs {
    /// Share of records with a usable yield (0 when there are no records)
    pub fn completeness(&self) -> f64 {
        self.valid_records as f64 / self.total_records.max(1) as f64
    }
}

/// Additive 0-100 score: volume, time span, completeness and consistency
pub fn quality_score(inputs: &QualityInputs) -> u32 {
    let mut score = 0;

    score += match inputs.valid_records {
        n if n >= 20 => 40,
        n if n >= 10 => 20,
        n if n >= 5 => 10,
        _ => 0,
    };

    if inputs.date_range_years >= 2.0 {
        score += 30;
    } else if inputs.date_range_years >= 1.0 {
        score += 15;
    }

    let completeness = inputs.completeness();
    if completeness >= 0.8 {
        score += 20;
    } else if completeness >= 0.6 {
        score += 10;
    }

    if matches!(inputs.coefficient_of_variation, Some(cv) if cv < CONSISTENT_YIELD_CV) {
        score += 10;
    }

    score
}

/// Improvement advice: data volume, validation threshold, time span, then a closing remark
pub fn recommendations(
    level: DataQualityLevel,
    valid_records: usize,
    date_range_years: f64,
    min_validation_records: usize,
) -> Vec<String> {
    let mut advice = Vec::new();

    if matches!(level, DataQualityLevel::Insufficient | DataQualityLevel::Poor) {
        advice.push("Collect more production data to improve forecast accuracy".to_string());
    }

    if valid_records < min_validation_records {
        advice.push(format!(
            "Need at least {} valid records for reliable validation",
            min_validation_records
        ));
    }

    if date_range_years < 2.0 {
        advice.push(
            "Collect data over multiple seasons and years for better trend analysis".to_string(),
        );
    }

    match level {
        DataQualityLevel::Excellent => {
            advice.push("Data quality is excellent for accurate forecasting".to_string())
        }
        DataQualityLevel::Good => {
            advice.push("Data quality is good. Continue consistent data collection".to_string())
        }
        _ => {}
    }

    advice
}

/// Score every record of the dataset
///
/// The date span covers all records, valid or not; the coefficient of
/// variation only the valid yields.
pub fn assess_data_quality(
    records: &[ProductionRecord],
    settings: &ForecastSettings,
) -> DataQualityReport {
    let yields: Vec<f64> = records
        .iter()
        .filter_map(ProductionRecord::yield_per_hectare)
        .collect();

    let date_range_years = DateRange::spanning(records.iter().map(|r| r.harvest_date))
        .map(|range| range.years())
        .unwrap_or(0.0);

    let inputs = QualityInputs {
        valid_records: yields.len(),
        total_records: records.len(),
        date_range_years,
        coefficient_of_variation: coefficient_of_variation(&yields),
    };

    let score = quality_score(&inputs);
    let level = DataQualityLevel::from_score(score);

    tracing::debug!(
        score,
        level = %level,
        valid_records = inputs.valid_records,
        total_records = inputs.total_records,
        "Assessed data quality"
    );

    DataQualityReport {
        quality_level: level,
        quality_score: score,
        total_records: inputs.total_records,
        valid_records: inputs.valid_records,
        data_completeness: round_to(inputs.completeness() * 100.0, 1),
        date_range_years: round_to(date_range_years, 1),
        error: None,
        recommendations: recommendations(
            level,
            inputs.valid_records,
            date_range_years,
            settings.min_validation_records,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_perfect_score() {
        let inputs = QualityInputs {
            valid_records: 25,
            total_records: 25,
            date_range_years: 3.0,
            coefficient_of_variation: Some(0.2),
        };
        let score = quality_score(&inputs);
        assert_eq!(score, 100);
        assert_eq!(DataQualityLevel::from_score(score), DataQualityLevel::Excellent);
    }

    #[test]
    fn test_partial_scores() {
        let inputs = QualityInputs {
            valid_records: 12,
            total_records: 18,
            date_range_years: 1.5,
            coefficient_of_variation: Some(0.7),
        };
        // 20 (volume) + 15 (span) + 10 (completeness 0.67) + 0 (cv)
        assert_eq!(quality_score(&inputs), 45);
    }

    #[test]
    fn test_no_records_scores_zero() {
        let inputs = QualityInputs {
            valid_records: 0,
            total_records: 0,
            date_range_years: 0.0,
            coefficient_of_variation: None,
        };
        assert_eq!(quality_score(&inputs), 0);
    }

    #[test]
    fn test_recommendation_order() {
        let advice = recommendations(DataQualityLevel::Poor, 3, 0.5, 8);
        assert_eq!(
            advice,
            vec![
                "Collect more production data to improve forecast accuracy",
                "Need at least 8 valid records for reliable validation",
                "Collect data over multiple seasons and years for better trend analysis",
            ]
        );
    }

    #[test]
    fn test_excellent_recommendation() {
        let advice = recommendations(DataQualityLevel::Excellent, 30, 3.0, 8);
        assert_eq!(advice, vec!["Data quality is excellent for accurate forecasting"]);
    }

    #[test]
    fn test_assess_empty_dataset() {
        let report = assess_data_quality(&[], &ForecastSettings::default());
        assert_eq!(report.quality_level, DataQualityLevel::Insufficient);
        assert_eq!(report.quality_score, 0);
        assert_eq!(report.data_completeness, 0.0);
        assert_eq!(report.date_range_years, 0.0);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_assess_counts_invalid_records_in_span() {
        let records = vec![
            ProductionRecord {
                id: 1,
                variety_name: "IR64".to_string(),
                hectares: 1.0,
                quantity_harvested: 500.0,
                harvest_date: NaiveDate::from_ymd_opt(2022, 4, 1).unwrap(),
            },
            ProductionRecord {
                id: 2,
                variety_name: "IR64".to_string(),
                hectares: 0.0,
                quantity_harvested: 500.0,
                harvest_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            },
        ];
        let report = assess_data_quality(&records, &ForecastSettings::default());
        assert_eq!(report.valid_records, 1);
        assert_eq!(report.total_records, 2);
        assert_eq!(report.data_completeness, 50.0);
        assert_eq!(report.date_range_years, 2.0);
        // 0 (volume) + 30 (span) + 0 (completeness) + 10 (single yield, cv 0)
        assert_eq!(report.quality_score, 40);
        assert_eq!(report.quality_level, DataQualityLevel::Fair);
    }
}
