//! Forecast service: loads production records and runs the forecasting queries

use serde::Serialize;
use shared::forecasting::{
    assess_data_quality, current_summary, forecast_report, validation_report, ForecastSettings,
};
use shared::validation::{validate_variety_name, variety_filter, ALL_VARIETIES};

use crate::error::{AppError, AppResult};
use crate::models::{
    CurrentSummary, DataQualityReport, ForecastPoint, ForecastResponse, ValidationReport,
};

use super::production::ProductionService;

/// Forecasting queries over a fresh snapshot of production records
#[derive(Clone)]
pub struct ForecastService {
    production: ProductionService,
    settings: ForecastSettings,
}

/// Flat CSV row for a forecast point
#[derive(Debug, Serialize)]
pub struct ForecastCsvRow {
    pub period: String,
    pub season: String,
    pub year: i32,
    pub predicted_yield: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub confidence_level: u8,
    pub method: String,
}

impl From<&ForecastPoint> for ForecastCsvRow {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            period: point.period.to_string(),
            season: point.season.to_string(),
            year: point.year,
            predicted_yield: point.predicted_yield,
            confidence_lower: point.confidence_lower,
            confidence_upper: point.confidence_upper,
            confidence_level: point.confidence_level,
            method: point.method.to_string(),
        }
    }
}

impl ForecastService {
    pub fn new(production: ProductionService, settings: ForecastSettings) -> Self {
        Self {
            production,
            settings,
        }
    }

    /// Next-year seasonal forecast for a variety ("All" for every variety)
    pub async fn get_forecast(&self, variety: &str) -> AppResult<ForecastResponse> {
        validate_variety_name(variety).map_err(|msg| AppError::Validation {
            field: "variety".to_string(),
            message: msg.to_string(),
        })?;

        let records = self.production.get_records(variety_filter(Some(variety))).await?;
        tracing::info!(variety, records = records.len(), "Generating seasonal forecast");

        let response = forecast_report(&records, variety, &self.settings)?;
        Ok(response)
    }

    pub async fn get_current_summary(&self) -> AppResult<CurrentSummary> {
        let records = self.production.get_records(None).await?;
        Ok(current_summary(&records, &self.settings))
    }

    pub async fn validate_forecast(&self) -> AppResult<ValidationReport> {
        let records = self.production.get_records(None).await?;
        let report = validation_report(&records, &self.settings)?;
        tracing::info!(
            folds = report.cross_validation_folds,
            accuracy = report.accuracy_percentage,
            "Validated forecast accuracy"
        );
        Ok(report)
    }

    pub async fn get_data_quality(&self) -> AppResult<DataQualityReport> {
        let records = self.production.get_records(None).await?;
        Ok(assess_data_quality(&records, &self.settings))
    }

    /// Export forecast points as CSV
    pub fn export_to_csv(points: &[ForecastPoint]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for point in points {
            wtr.serialize(ForecastCsvRow::from(point))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

/// Variety query parameter with the "All" default applied
pub fn requested_variety(variety: Option<String>) -> String {
    variety
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| ALL_VARIETIES.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ForecastMethod, Season, SeasonKey};

    #[test]
    fn test_csv_export() {
        let point = ForecastPoint {
            period: SeasonKey::new(2025, Season::S2),
            season: Season::S2,
            year: 2025,
            predicted_yield: 455.5,
            confidence_lower: 400.25,
            confidence_upper: 510.75,
            confidence_level: 95,
            method: ForecastMethod::EnhancedSeasonal,
        };
        let csv = ForecastService::export_to_csv(&[point]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("period,season,year,predicted_yield,confidence_lower,confidence_upper,confidence_level,method")
        );
        assert_eq!(lines.next(), Some("2025-S2,S2,2025,455.5,400.25,510.75,95,enhanced_seasonal"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_requested_variety_defaults_to_all() {
        assert_eq!(requested_variety(None), "All");
        assert_eq!(requested_variety(Some("  ".to_string())), "All");
        assert_eq!(requested_variety(Some("RC 222".to_string())), "RC 222");
    }
}
