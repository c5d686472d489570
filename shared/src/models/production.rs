//! Production record models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{season_of, SeasonKey};

/// A production tracking record joined with its rice variety
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: i32,
    pub variety_name: String,
    pub hectares: f64,
    pub quantity_harvested: f64,
    pub harvest_date: NaiveDate,
}

impl ProductionRecord {
    /// Yield per hectare, if the record has a usable planted area and harvest
    pub fn yield_per_hectare(&self) -> Option<f64> {
        crate::validation::validate_yield_inputs(self.hectares, self.quantity_harvested)
            .ok()
            .map(|_| self.quantity_harvested / self.hectares)
    }

    /// Convert into a yield observation, dropping records without a positive yield
    pub fn to_observation(&self) -> Option<YieldObservation> {
        self.yield_per_hectare().map(|_| YieldObservation {
            harvest_date: self.harvest_date,
            hectares: self.hectares,
            quantity_harvested: self.quantity_harvested,
            variety: self.variety_name.clone(),
        })
    }
}

/// A single harvest with a computable, positive yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldObservation {
    pub harvest_date: NaiveDate,
    /// Planted area (always > 0)
    pub hectares: f64,
    /// Harvested quantity (always > 0)
    pub quantity_harvested: f64,
    pub variety: String,
}

impl YieldObservation {
    pub fn yield_per_hectare(&self) -> f64 {
        self.quantity_harvested / self.hectares
    }

    pub fn season_key(&self) -> SeasonKey {
        season_of(self.harvest_date)
    }
}
