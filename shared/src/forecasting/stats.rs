//! Descriptive statistics and least-squares trend fitting

use statrs::statistics::Statistics;

use super::{ForecastError, ForecastResult};

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Sample standard deviation (n - 1 denominator); 0 when undefined
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let std = values.iter().std_dev();
    if std.is_finite() {
        std
    } else {
        0.0
    }
}

/// Population standard deviation (n denominator); 0 for an empty slice
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let std = values.iter().population_std_dev();
    if std.is_finite() {
        std
    } else {
        0.0
    }
}

/// Coefficient of variation (population std / mean)
///
/// `None` when there are no values, 0 when the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = mean(values);
    if m > 0.0 {
        Some(population_std_dev(values) / m)
    } else {
        Some(0.0)
    }
}

/// Ordinary least-squares line of values against their positions `0..n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn fit(values: &[f64]) -> ForecastResult<Self> {
        let n = values.len();
        if n < 2 {
            return Err(ForecastError::ModelFit(format!(
                "Need at least 2 points for a linear trend, got {}",
                n
            )));
        }

        let x_mean = (n - 1) as f64 / 2.0;
        let y_mean = mean(values);

        let (sxx, sxy) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sxx, sxy), (i, &y)| {
                let dx = i as f64 - x_mean;
                (sxx + dx * dx, sxy + dx * (y - y_mean))
            });

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ForecastError::ModelFit(
                "Linear trend coefficients are not finite".to_string(),
            ));
        }

        Ok(Self { slope, intercept })
    }

    pub fn predict(&self, position: usize) -> f64 {
        self.intercept + self.slope * position as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert!((sample_std_dev(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_std_dev(&[3.0]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[]), None);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_linear_trend_exact_line() {
        let values: Vec<f64> = (0..6).map(|i| 10.0 + 2.5 * i as f64).collect();
        let trend = LinearTrend::fit(&values).unwrap();
        assert!((trend.slope - 2.5).abs() < 1e-9);
        assert!((trend.intercept - 10.0).abs() < 1e-9);
        assert!((trend.predict(8) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_trend_needs_two_points() {
        assert!(LinearTrend::fit(&[5.0]).is_err());
        assert!(LinearTrend::fit(&[]).is_err());
    }
}
