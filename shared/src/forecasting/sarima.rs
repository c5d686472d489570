//! Seasonal ARIMA (1,1,1)(1,1,1)s estimated by conditional sum of squares
//!
//! The series is differenced once at lag 1 and once at the seasonal lag,
//! the ARMA part is fitted on the differenced series with a bounded simplex
//! search, and forecasts are integrated back through both differencing stages.
//! Prediction intervals come from the psi-weights of the full (integrated)
//! autoregressive operator.

use statrs::distribution::{ContinuousCDF, Normal};

use super::optimize::{nelder_mead, Bounds};
use super::{ForecastError, ForecastResult};

/// Coefficients stay strictly inside the unit interval
const PARAM_BOUND: f64 = 0.99;
const NUM_PARAMS: usize = 4;

/// Estimated ARMA coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarimaParams {
    pub ar: f64,
    pub ma: f64,
    pub seasonal_ar: f64,
    pub seasonal_ma: f64,
}

impl SarimaParams {
    fn from_slice(p: &[f64]) -> Self {
        Self {
            ar: p[0],
            ma: p[1],
            seasonal_ar: p[2],
            seasonal_ma: p[3],
        }
    }
}

/// Model specification and optimizer limits
#[derive(Debug, Clone, Copy)]
pub struct SeasonalArima {
    pub period: usize,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for SeasonalArima {
    fn default() -> Self {
        Self {
            period: 3,
            max_iter: 500,
            tolerance: 1e-8,
        }
    }
}

/// Multiply two lag polynomials given as coefficient vectors (index = lag)
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `series[t] - series[t - lag]`
pub fn difference(series: &[f64], lag: usize) -> ForecastResult<Vec<f64>> {
    if lag == 0 || series.len() <= lag {
        return Err(ForecastError::ModelFit(format!(
            "Series of length {} is too short to difference at lag {}",
            series.len(),
            lag
        )));
    }
    Ok(series.windows(lag + 1).map(|w| w[lag] - w[0]).collect())
}

/// Undo one differencing stage for values following `history`
fn integrate(history: &[f64], diffs: &[f64], lag: usize) -> Vec<f64> {
    let mut extended = history.to_vec();
    for d in diffs {
        let prev = extended[extended.len() - lag];
        extended.push(d + prev);
    }
    extended.split_off(history.len())
}

/// `phi(B) * Phi(B^s)` as a coefficient vector with the sign convention `1 - phi B`
fn ar_polynomial(params: &SarimaParams, period: usize) -> Vec<f64> {
    let mut seasonal = vec![0.0; period + 1];
    seasonal[0] = 1.0;
    seasonal[period] = -params.seasonal_ar;
    poly_mul(&[1.0, -params.ar], &seasonal)
}

/// `theta(B) * Theta(B^s)` with the sign convention `1 + theta B`
fn ma_polynomial(params: &SarimaParams, period: usize) -> Vec<f64> {
    let mut seasonal = vec![0.0; period + 1];
    seasonal[0] = 1.0;
    seasonal[period] = params.seasonal_ma;
    poly_mul(&[1.0, params.ma], &seasonal)
}

/// Innovations of the ARMA recursion with zero presample values
fn residuals(w: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut e = vec![0.0; w.len()];
    for t in 0..w.len() {
        let mut value: f64 = ar
            .iter()
            .enumerate()
            .take(t + 1)
            .map(|(k, a)| a * w[t - k])
            .sum();
        for (k, m) in ma.iter().enumerate().skip(1).take(t) {
            value -= m * e[t - k];
        }
        e[t] = value;
    }
    e
}

fn conditional_sum_of_squares(w: &[f64], ar: &[f64], ma: &[f64]) -> f64 {
    residuals(w, ar, ma).iter().map(|e| e * e).sum()
}

/// MA(infinity) weights of `ma(B) / ar(B)`
pub fn psi_weights(ar: &[f64], ma: &[f64], count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut value = ma.get(j).copied().unwrap_or(0.0);
        for k in 1..=j {
            value -= ar.get(k).copied().unwrap_or(0.0) * psi[j - k];
        }
        psi.push(value);
    }
    psi
}

/// Point forecasts with a symmetric prediction interval
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaForecast {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// A fitted model ready to forecast
#[derive(Debug, Clone)]
pub struct FittedSarima {
    pub params: SarimaParams,
    pub sigma2: f64,
    period: usize,
    series: Vec<f64>,
    first_diff: Vec<f64>,
    w: Vec<f64>,
    residuals: Vec<f64>,
    ar: Vec<f64>,
    ma: Vec<f64>,
}

impl SeasonalArima {
    pub fn fit(&self, series: &[f64]) -> ForecastResult<FittedSarima> {
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "Series contains non-finite values".to_string(),
            ));
        }

        let first_diff = difference(series, 1)?;
        let w = difference(&first_diff, self.period)?;
        if w.len() < NUM_PARAMS {
            return Err(ForecastError::ModelFit(format!(
                "Differenced series has {} values, need at least {}",
                w.len(),
                NUM_PARAMS
            )));
        }

        let w_mean = w.iter().sum::<f64>() / w.len() as f64;
        let w_var = w.iter().map(|x| (x - w_mean).powi(2)).sum::<f64>() / w.len() as f64;
        if w_var < 1e-12 {
            return Err(ForecastError::ModelFit(
                "Differenced series has no variance".to_string(),
            ));
        }

        let period = self.period;
        let objective = |p: &[f64]| {
            let params = SarimaParams::from_slice(p);
            conditional_sum_of_squares(
                &w,
                &ar_polynomial(&params, period),
                &ma_polynomial(&params, period),
            )
        };

        let bounds = Bounds::uniform(NUM_PARAMS, -PARAM_BOUND, PARAM_BOUND);
        let best = nelder_mead(
            objective,
            &[0.0; NUM_PARAMS],
            &bounds,
            self.max_iter,
            self.tolerance,
        );
        if !best.value.is_finite() || best.value == f64::MAX {
            return Err(ForecastError::ModelFit(
                "Sum of squares did not converge to a finite value".to_string(),
            ));
        }

        let params = SarimaParams::from_slice(&best.point);
        let ar = ar_polynomial(&params, period);
        let ma = ma_polynomial(&params, period);
        let residuals = residuals(&w, &ar, &ma);
        let sigma2 = best.value / w.len() as f64;

        tracing::debug!(
            ar = params.ar,
            ma = params.ma,
            seasonal_ar = params.seasonal_ar,
            seasonal_ma = params.seasonal_ma,
            sigma2,
            "Fitted seasonal ARIMA"
        );

        Ok(FittedSarima {
            params,
            sigma2,
            period,
            series: series.to_vec(),
            first_diff,
            w,
            residuals,
            ar,
            ma,
        })
    }
}

impl FittedSarima {
    /// Forecast `steps` values with a two-sided `confidence` interval (e.g. 0.95)
    pub fn forecast(&self, steps: usize, confidence: f64) -> ForecastResult<SarimaForecast> {
        let mut w = self.w.clone();
        let mut e = self.residuals.clone();
        for _ in 0..steps {
            let t = w.len();
            let mut next = 0.0;
            for (k, a) in self.ar.iter().enumerate().skip(1) {
                if k <= t {
                    next -= a * w[t - k];
                }
            }
            for (k, m) in self.ma.iter().enumerate().skip(1) {
                if k <= t {
                    next += m * e[t - k];
                }
            }
            w.push(next);
            e.push(0.0);
        }
        let w_forecast = &w[self.w.len()..];

        let diff_forecast = integrate(&self.first_diff, w_forecast, self.period);
        let mean = integrate(&self.series, &diff_forecast, 1);

        let integrated_ar = poly_mul(
            &poly_mul(&self.ar, &[1.0, -1.0]),
            &seasonal_difference_operator(self.period),
        );
        let psi = psi_weights(&integrated_ar, &self.ma, steps);

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::Computation(format!("Normal distribution: {}", e)))?;
        let z = normal.inverse_cdf(0.5 + confidence / 2.0);

        let mut lower = Vec::with_capacity(steps);
        let mut upper = Vec::with_capacity(steps);
        let mut cumulative = 0.0;
        for (h, m) in mean.iter().enumerate() {
            cumulative += psi[h] * psi[h];
            let half_width = z * (self.sigma2 * cumulative).sqrt();
            lower.push(m - half_width);
            upper.push(m + half_width);
        }

        let all_finite = mean
            .iter()
            .chain(lower.iter())
            .chain(upper.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ForecastError::ModelFit(
                "Forecast produced non-finite values".to_string(),
            ));
        }

        Ok(SarimaForecast { mean, lower, upper })
    }
}

/// `1 - B^s`
fn seasonal_difference_operator(period: usize) -> Vec<f64> {
    let mut op = vec![0.0; period + 1];
    op[0] = 1.0;
    op[period] = -1.0;
    op
}
