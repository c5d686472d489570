//! Forecasting HTTP handlers

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shared::forecasting::ForecastError;

use crate::error::AppError;
use crate::models::{CurrentSummary, DataQualityReport, ForecastResponse, ValidationReport};
use crate::services::forecast::{requested_variety, ForecastService};
use crate::services::production::ProductionService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ForecastQuery {
    pub variety: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

fn forecast_service(state: &AppState) -> ForecastService {
    ForecastService::new(ProductionService::new(state.db.clone()), state.config.forecast)
}

/// Get the seasonal forecast for next year
///
/// Missing or insufficient data is a normal 200 response with an empty
/// forecast; storage and computation failures are a 500 with zeroed fields.
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    let variety = requested_variety(query.variety);

    let response = match forecast_service(&state).get_forecast(&variety).await {
        Ok(response) => response,
        Err(e @ AppError::Validation { .. }) => return e.into_response(),
        Err(e) => {
            tracing::error!(error = %e, variety = %variety, "Forecast failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ForecastResponse::failed(e.to_string())),
            )
                .into_response();
        }
    };

    if query.format.as_deref() == Some("csv") {
        return match ForecastService::export_to_csv(&response.forecast) {
            Ok(csv) => (
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"yield_forecast.csv\""),
                ],
                csv,
            )
                .into_response(),
            Err(e) => e.into_response(),
        };
    }

    Json(response).into_response()
}

/// Get the current yield summary
pub async fn get_current_summary(State(state): State<AppState>) -> Response {
    match forecast_service(&state).get_current_summary().await {
        Ok(summary) => Json::<CurrentSummary>(summary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Current summary failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CurrentSummary::failed(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Cross-validate forecast accuracy over all records
///
/// Unmet sample preconditions are a 400 envelope; storage and computation
/// failures are a 500 with a zeroed report.
pub async fn validate_forecast(State(state): State<AppState>) -> Response {
    match forecast_service(&state).validate_forecast().await {
        Ok(report) => Json::<ValidationReport>(report).into_response(),
        Err(
            e @ AppError::Forecast(
                ForecastError::InsufficientValidationSamples { .. } | ForecastError::NoValidFolds,
            ),
        ) => e.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Forecast validation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidationReport::failed(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Get the data quality assessment
pub async fn get_data_quality(State(state): State<AppState>) -> Response {
    match forecast_service(&state).get_data_quality().await {
        Ok(report) => Json::<DataQualityReport>(report).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Data quality assessment failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DataQualityReport::failed(e.to_string())),
            )
                .into_response()
        }
    }
}
