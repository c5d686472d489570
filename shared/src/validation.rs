//! Validation utilities for the Rice Production Management System

use chrono::NaiveDate;

// ============================================================================
// Production Record Validations
// ============================================================================

/// Validate that a record has a computable, positive yield
///
/// Both planted area and harvested quantity must be finite and strictly positive.
pub fn validate_yield_inputs(hectares: f64, quantity_harvested: f64) -> Result<(), &'static str> {
    if !hectares.is_finite() || hectares <= 0.0 {
        return Err("Hectares must be greater than 0");
    }
    if !quantity_harvested.is_finite() || quantity_harvested <= 0.0 {
        return Err("Quantity harvested must be greater than 0");
    }
    Ok(())
}

/// Validate that a harvest date is not after the reference date
pub fn validate_harvest_date(harvest_date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if harvest_date > today {
        return Err("Harvest date cannot be in the future");
    }
    Ok(())
}

// ============================================================================
// Query Validations
// ============================================================================

/// Sentinel variety filter meaning "every variety"
pub const ALL_VARIETIES: &str = "All";

/// Validate a rice variety filter (1-100 characters, not blank)
pub fn validate_variety_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Variety name cannot be empty");
    }
    if name.chars().count() > 100 {
        return Err("Variety name must be at most 100 characters");
    }
    Ok(())
}

/// Normalize an optional variety query parameter into a filter
///
/// Returns `None` for the "All" sentinel or a missing parameter.
pub fn variety_filter(variety: Option<&str>) -> Option<&str> {
    match variety.map(str::trim) {
        None | Some("") => None,
        Some(v) if v == ALL_VARIETIES => None,
        Some(v) => Some(v),
    }
}
