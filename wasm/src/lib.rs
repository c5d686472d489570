//! WebAssembly module for the Rice Production Management System
//!
//! Provides client-side computation for:
//! - Harvest season assignment
//! - Yield per hectare calculations
//! - Offline production entry validation
//! - Data quality scoring and seasonal forecasts from cached buckets

use chrono::NaiveDate;
use serde::Serialize;
use shared::forecasting::quality::{quality_score, QualityInputs};
use shared::forecasting::{forecast_seasons, ForecastSettings};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("rice-production-wasm loaded"));
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", date, e))
}

/// Season key ("2025-S1") of an ISO harvest date
#[wasm_bindgen]
pub fn harvest_season(date: &str) -> Result<String, JsValue> {
    parse_date(date)
        .map(|d| season_of(d).to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Yield per hectare, or 0 when the inputs cannot produce a yield
#[wasm_bindgen]
pub fn calculate_yield_per_hectare(hectares: f64, quantity_harvested: f64) -> f64 {
    match validate_yield_inputs(hectares, quantity_harvested) {
        Ok(()) => quantity_harvested / hectares,
        Err(_) => 0.0,
    }
}

fn production_entry_errors(hectares: f64, quantity_harvested: f64, harvest_date: &str, today: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = validate_yield_inputs(hectares, quantity_harvested) {
        errors.push(e.to_string());
    }

    match (parse_date(harvest_date), parse_date(today)) {
        (Ok(date), Ok(today)) => {
            if let Err(e) = validate_harvest_date(date, today) {
                errors.push(e.to_string());
            }
        }
        (Err(e), _) | (_, Err(e)) => errors.push(e),
    }

    errors
}

/// Validate a production entry before queuing it offline
///
/// Returns the list of problems; an empty array means the entry is valid.
#[wasm_bindgen]
pub fn validate_production_entry(
    hectares: f64,
    quantity_harvested: f64,
    harvest_date: &str,
    today: &str,
) -> js_sys::Array {
    production_entry_errors(hectares, quantity_harvested, harvest_date, today)
        .into_iter()
        .map(|e| JsValue::from_str(&e))
        .collect()
}

#[derive(Serialize)]
struct QualityScore {
    score: u32,
    level: DataQualityLevel,
}

fn quality_score_json(
    valid_records: usize,
    total_records: usize,
    date_range_years: f64,
    coefficient_of_variation: Option<f64>,
) -> Result<String, String> {
    let score = quality_score(&QualityInputs {
        valid_records,
        total_records,
        date_range_years,
        coefficient_of_variation,
    });
    serde_json::to_string(&QualityScore {
        score,
        level: DataQualityLevel::from_score(score),
    })
    .map_err(|e| e.to_string())
}

/// Score dataset quality; returns `{ "score": n, "level": "..." }`
#[wasm_bindgen]
pub fn score_data_quality(
    valid_records: usize,
    total_records: usize,
    date_range_years: f64,
    coefficient_of_variation: Option<f64>,
) -> Result<String, JsValue> {
    quality_score_json(valid_records, total_records, date_range_years, coefficient_of_variation)
        .map_err(|e| JsValue::from_str(&e))
}

#[derive(Serialize)]
struct BucketForecast {
    method: ForecastMethod,
    forecast: Vec<ForecastPoint>,
}

fn forecast_json(buckets_json: &str, forecast_year: i32) -> Result<String, String> {
    let buckets: Vec<SeasonBucket> =
        serde_json::from_str(buckets_json).map_err(|e| format!("Invalid buckets JSON: {}", e))?;

    let outcome = forecast_seasons(&buckets, forecast_year, &ForecastSettings::default())
        .map_err(|e| e.to_string())?;

    serde_json::to_string(&BucketForecast {
        method: outcome.method,
        forecast: outcome.points,
    })
    .map_err(|e| e.to_string())
}

/// Forecast next year's seasons from cached season buckets (JSON array)
#[wasm_bindgen]
pub fn forecast_from_buckets_json(buckets_json: &str, forecast_year: i32) -> Result<String, JsValue> {
    forecast_json(buckets_json, forecast_year).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}
