//! Common types used across the system

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average length of a year in days, accounting for leap years
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Date range covered by a set of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Smallest range containing every date, or `None` when there are no dates
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |range, date| match range {
            None => Some(Self { start: date, end: date }),
            Some(r) => Some(Self {
                start: r.start.min(date),
                end: r.end.max(date),
            }),
        })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn years(&self) -> f64 {
        self.days() as f64 / DAYS_PER_YEAR
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
