//! Seasonal aggregation of yield observations

use std::collections::BTreeMap;

use crate::models::{ProductionRecord, SeasonBucket, SeasonKey, YieldObservation};

/// Season buckets in chronological order plus dataset counts
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalAggregate {
    pub buckets: Vec<SeasonBucket>,
    pub num_seasons: usize,
    pub num_records: usize,
}

impl SeasonalAggregate {
    /// Bucket mean yields in chronological order
    pub fn mean_yields(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.mean_yield).collect()
    }

    /// Year of the most recent bucket
    pub fn latest_year(&self) -> Option<i32> {
        self.buckets.last().map(|b| b.year)
    }
}

#[derive(Default)]
struct Accumulator {
    yield_sum: f64,
    quantity_sum: f64,
    count: usize,
}

/// Keep only records with a computable, positive yield
pub fn valid_observations(records: &[ProductionRecord]) -> Vec<YieldObservation> {
    records.iter().filter_map(ProductionRecord::to_observation).collect()
}

/// Group observations by harvest season
///
/// The `BTreeMap` keyed by `(year, season)` yields buckets in chronological
/// order regardless of the input order.
pub fn aggregate_by_season(observations: &[YieldObservation]) -> SeasonalAggregate {
    let mut groups: BTreeMap<SeasonKey, Accumulator> = BTreeMap::new();
    let mut num_records = 0;

    for obs in observations {
        if crate::validation::validate_yield_inputs(obs.hectares, obs.quantity_harvested).is_err() {
            continue;
        }
        let acc = groups.entry(obs.season_key()).or_default();
        acc.yield_sum += obs.yield_per_hectare();
        acc.quantity_sum += obs.quantity_harvested;
        acc.count += 1;
        num_records += 1;
    }

    let buckets: Vec<SeasonBucket> = groups
        .into_iter()
        .map(|(key, acc)| {
            SeasonBucket::new(key, acc.yield_sum / acc.count as f64, acc.quantity_sum, acc.count)
        })
        .collect();

    SeasonalAggregate {
        num_seasons: buckets.len(),
        num_records,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(y: i32, m: u32, hectares: f64, quantity: f64) -> YieldObservation {
        YieldObservation {
            harvest_date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            hectares,
            quantity_harvested: quantity,
            variety: "IR64".to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate_by_season(&[]);
        assert!(agg.buckets.is_empty());
        assert_eq!(agg.num_seasons, 0);
        assert_eq!(agg.num_records, 0);
        assert_eq!(agg.latest_year(), None);
    }

    #[test]
    fn test_groups_and_means() {
        let observations = vec![
            obs(2023, 4, 2.0, 1000.0),
            obs(2023, 5, 1.0, 400.0),
            obs(2023, 7, 1.0, 450.0),
            obs(2022, 12, 1.0, 300.0),
        ];
        let agg = aggregate_by_season(&observations);

        assert_eq!(agg.num_seasons, 2);
        assert_eq!(agg.num_records, 4);

        let s1 = &agg.buckets[0];
        assert_eq!(s1.season_key.to_string(), "2023-S1");
        assert_eq!(s1.observation_count, 3);
        assert!((s1.mean_yield - (500.0 + 400.0 + 300.0) / 3.0).abs() < 1e-9);
        assert!((s1.total_quantity - 1700.0).abs() < 1e-9);

        assert_eq!(agg.buckets[1].season_key.to_string(), "2023-S2");
        assert_eq!(agg.latest_year(), Some(2023));
    }

    #[test]
    fn test_invalid_observations_are_skipped() {
        let agg = aggregate_by_season(&[obs(2023, 4, 0.0, 100.0), obs(2023, 4, 1.0, -5.0)]);
        assert_eq!(agg.num_records, 0);
        assert!(agg.buckets.is_empty());
    }

    #[test]
    fn test_valid_observations_filter() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let records = vec![
            ProductionRecord {
                id: 1,
                variety_name: "IR64".to_string(),
                hectares: 0.0,
                quantity_harvested: 100.0,
                harvest_date: date,
            },
            ProductionRecord {
                id: 2,
                variety_name: "IR64".to_string(),
                hectares: 2.0,
                quantity_harvested: 100.0,
                harvest_date: date,
            },
        ];
        let valid = valid_observations(&records);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].yield_per_hectare(), 50.0);
    }
}
