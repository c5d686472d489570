//! Query operations composed from the forecasting components

use crate::models::{
    CurrentSummary, ForecastDataQuality, ForecastMetadata, ForecastPoint, ForecastResponse,
    ProductionRecord, SeasonShortfall, ValidationReport,
};
use crate::types::round_to;

use super::accuracy::{cross_validate, summary_accuracy};
use super::aggregate::{aggregate_by_season, valid_observations};
use super::engine::forecast_seasons;
use super::{ForecastError, ForecastResult, ForecastSettings, CONFIDENCE_LEVEL};

pub const NO_RECORDS_WARNING: &str = "No production records found for the selected variety.";
pub const NO_VALID_YIELDS_WARNING: &str =
    "No valid yield records found (all yields are zero or negative).";
pub const COLLECT_MORE_DATA: &str =
    "Continue collecting production data. More historical data will improve forecast accuracy.";

fn rounded(point: ForecastPoint) -> ForecastPoint {
    ForecastPoint {
        predicted_yield: round_to(point.predicted_yield, 2),
        confidence_lower: round_to(point.confidence_lower, 2),
        confidence_upper: round_to(point.confidence_upper, 2),
        ..point
    }
}

/// Seasonal forecast for the next year of the given records
///
/// Missing, invalid or insufficient data produce an empty forecast with a
/// warning, never an error.
pub fn forecast_report(
    records: &[ProductionRecord],
    variety: &str,
    settings: &ForecastSettings,
) -> ForecastResult<ForecastResponse> {
    if records.is_empty() {
        return Ok(ForecastResponse::empty(ForecastDataQuality::NoData, NO_RECORDS_WARNING));
    }

    let observations = valid_observations(records);
    if observations.is_empty() {
        return Ok(ForecastResponse::empty(
            ForecastDataQuality::InvalidData,
            NO_VALID_YIELDS_WARNING,
        ));
    }

    let aggregate = aggregate_by_season(&observations);
    let data_quality = ForecastDataQuality::from_counts(aggregate.num_records, aggregate.num_seasons);

    tracing::debug!(
        variety,
        seasons = aggregate.num_seasons,
        records = aggregate.num_records,
        ?data_quality,
        "Aggregated production records"
    );

    let forecast_year = match aggregate.latest_year() {
        Some(year) => year + 1,
        None => {
            return Err(ForecastError::Computation(
                "Aggregation produced no seasons".to_string(),
            ))
        }
    };

    match forecast_seasons(&aggregate.buckets, forecast_year, settings) {
        Ok(outcome) => Ok(ForecastResponse {
            forecast: outcome.points.into_iter().map(rounded).collect(),
            data_quality,
            warning: None,
            recommendation: None,
            current_data: None,
            metadata: Some(ForecastMetadata {
                total_seasons: aggregate.num_seasons,
                total_records: aggregate.num_records,
                variety: variety.to_string(),
                method: outcome.method.to_string(),
                confidence_level: CONFIDENCE_LEVEL,
            }),
            error: None,
        }),
        Err(ForecastError::InsufficientSeasons { current, required }) => Ok(ForecastResponse {
            recommendation: Some(COLLECT_MORE_DATA.to_string()),
            current_data: Some(SeasonShortfall {
                seasons: current,
                records: aggregate.num_records,
                required_seasons: required,
            }),
            ..ForecastResponse::empty(
                data_quality,
                format!(
                    "Insufficient historical data. Found {} seasons, need at least {} seasons (2+ years) for accurate forecasting.",
                    current, required
                ),
            )
        }),
        Err(e) => Err(e),
    }
}

/// Averages over all records plus a cross-validated accuracy estimate
pub fn current_summary(records: &[ProductionRecord], settings: &ForecastSettings) -> CurrentSummary {
    if records.is_empty() {
        return CurrentSummary::zeroed(0, ForecastDataQuality::NoData);
    }

    let valid: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| r.yield_per_hectare().map(|y| (y, r.quantity_harvested)))
        .collect();
    if valid.is_empty() {
        return CurrentSummary::zeroed(records.len(), ForecastDataQuality::InvalidData);
    }

    let count = valid.len();
    let yields: Vec<f64> = valid.iter().map(|(y, _)| *y).collect();
    let avg_yield = yields.iter().sum::<f64>() / count as f64;
    let avg_production = valid.iter().map(|(_, q)| q).sum::<f64>() / count as f64;

    CurrentSummary {
        total_yield: round_to(avg_yield, 1),
        total_records: records.len(),
        avg_production: round_to(avg_production, 1),
        accuracy: round_to(summary_accuracy(&yields, settings), 1),
        // Seasons approximated as two valid records each
        data_quality: ForecastDataQuality::from_counts(records.len(), count / 2),
        valid_records: Some(count),
        error: None,
    }
}

/// Cross-validation over the chronological yield series
pub fn validation_report(
    records: &[ProductionRecord],
    settings: &ForecastSettings,
) -> ForecastResult<ValidationReport> {
    let mut ordered: Vec<&ProductionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| (r.harvest_date, r.id));

    let yields: Vec<f64> = ordered
        .into_iter()
        .filter_map(ProductionRecord::yield_per_hectare)
        .collect();

    cross_validate(&yields, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastMethod, Season};
    use chrono::NaiveDate;

    fn record(id: i32, date: (i32, u32, u32), hectares: f64, quantity: f64) -> ProductionRecord {
        ProductionRecord {
            id,
            variety_name: "IR64".to_string(),
            hectares,
            quantity_harvested: quantity,
            harvest_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    fn six_season_records() -> Vec<ProductionRecord> {
        vec![
            record(1, (2023, 4, 1), 1.0, 500.0),
            record(2, (2023, 7, 1), 1.0, 400.0),
            record(3, (2023, 10, 1), 1.0, 450.0),
            record(4, (2024, 4, 1), 1.0, 520.0),
            record(5, (2024, 7, 1), 1.0, 410.0),
            record(6, (2024, 10, 1), 1.0, 460.0),
        ]
    }

    #[test]
    fn test_no_records() {
        let response = forecast_report(&[], "All", &ForecastSettings::default()).unwrap();
        assert!(response.forecast.is_empty());
        assert_eq!(response.data_quality, ForecastDataQuality::NoData);
        assert_eq!(response.warning.as_deref(), Some(NO_RECORDS_WARNING));
    }

    #[test]
    fn test_only_invalid_records() {
        let records = vec![record(1, (2023, 4, 1), 0.0, 500.0)];
        let response = forecast_report(&records, "All", &ForecastSettings::default()).unwrap();
        assert!(response.forecast.is_empty());
        assert_eq!(response.data_quality, ForecastDataQuality::InvalidData);
    }

    #[test]
    fn test_insufficient_seasons() {
        let records = &six_season_records()[..4];
        let response = forecast_report(records, "All", &ForecastSettings::default()).unwrap();
        assert!(response.forecast.is_empty());
        let warning = response.warning.unwrap();
        assert!(warning.contains("Found 4 seasons"));
        assert!(warning.contains('6'));
        assert_eq!(response.recommendation.as_deref(), Some(COLLECT_MORE_DATA));
        assert_eq!(
            response.current_data,
            Some(SeasonShortfall { seasons: 4, records: 4, required_seasons: 6 })
        );
        assert!(response.metadata.is_none());
    }

    #[test]
    fn test_six_season_scenario() {
        let response =
            forecast_report(&six_season_records(), "IR64", &ForecastSettings::default()).unwrap();
        assert_eq!(response.forecast.len(), 3);
        let periods: Vec<String> = response.forecast.iter().map(|p| p.period.to_string()).collect();
        assert_eq!(periods, vec!["2025-S1", "2025-S2", "2025-S3"]);
        for (p, season) in response.forecast.iter().zip(Season::ALL) {
            assert_eq!(p.season, season);
            assert!(p.predicted_yield >= 100.0);
            assert_eq!(p.method, ForecastMethod::EnhancedSeasonal);
        }

        let metadata = response.metadata.unwrap();
        assert_eq!(metadata.total_seasons, 6);
        assert_eq!(metadata.total_records, 6);
        assert_eq!(metadata.variety, "IR64");
        assert_eq!(metadata.method, "enhanced_seasonal");
        assert_eq!(metadata.confidence_level, 95);
        assert_eq!(response.data_quality, ForecastDataQuality::Low);
    }

    #[test]
    fn test_current_summary() {
        let mut records = six_season_records();
        records.push(record(7, (2024, 11, 1), 0.0, 100.0));
        let summary = current_summary(&records, &ForecastSettings::default());
        assert_eq!(summary.total_records, 7);
        assert_eq!(summary.valid_records, Some(6));
        assert_eq!(summary.total_yield, 456.7);
        assert_eq!(summary.avg_production, 456.7);
        assert_eq!(summary.accuracy, 30.0);
        assert_eq!(summary.data_quality, ForecastDataQuality::Low);
    }

    #[test]
    fn test_current_summary_edge_cases() {
        let settings = ForecastSettings::default();
        assert_eq!(current_summary(&[], &settings).data_quality, ForecastDataQuality::NoData);

        let invalid = current_summary(&[record(1, (2023, 4, 1), 1.0, 0.0)], &settings);
        assert_eq!(invalid.data_quality, ForecastDataQuality::InvalidData);
        assert_eq!(invalid.total_records, 1);
        assert_eq!(invalid.accuracy, 0.0);
    }

    #[test]
    fn test_validation_uses_chronological_order() {
        let mut records: Vec<ProductionRecord> = (0..8)
            .map(|i| record(i, (2020 + i / 3, 3 + (i as u32 % 3) * 3, 1), 1.0, 400.0 + 10.0 * i as f64))
            .collect();
        records.reverse();
        let report = validation_report(&records, &ForecastSettings::default()).unwrap();
        assert_eq!(report.cross_validation_folds, 2);
        assert_eq!(report.accuracy_percentage, 100.0);
    }

    #[test]
    fn test_validation_counts_only_valid_yields() {
        let mut records = six_season_records();
        records.push(record(7, (2025, 4, 1), 0.0, 300.0));
        records.push(record(8, (2025, 7, 1), 1.0, 0.0));
        let err = validation_report(&records, &ForecastSettings::default()).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientValidationSamples { current: 6, required: 8 }
        );
    }
}
