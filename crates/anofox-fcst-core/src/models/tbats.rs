//! TBATS (spec §4.3 "Decomposition Models"): a trend plus trigonometric
//! (Fourier-pair) seasonal terms for one or more periods, fit by OLS via
//! `models::regression` — the same `fit_ols_regression`/`apply_regression`
//! helper the teacher used for exogenous regression, here supplying the
//! harmonic design matrix instead of user regressors. This is TBATS'
//! defining idea (trigonometric seasonality so long or fractional
//! periods don't need one dummy column per season) without the Box-Cox
//! transform or ARMA error correction of the full method.
//! Box-Cox transforms are available separately via `crate::transform`
//! and compose with this model through `transform::ForecasterPipeline`.

use std::f64::consts::PI;

use super::regression::{apply_regression, fit_ols_regression};
use super::{require_non_empty, FittedValues, Forecaster, InformationCriteria};
use crate::error::{ForecastError, Result};

const HARMONICS_PER_PERIOD: usize = 2;

fn fourier_terms(n: usize, periods: &[usize]) -> Vec<Vec<f64>> {
    let mut columns = Vec::new();
    for &period in periods {
        if period < 2 {
            continue;
        }
        for k in 1..=HARMONICS_PER_PERIOD {
            let freq = 2.0 * PI * k as f64 / period as f64;
            let sin_col: Vec<f64> = (0..n).map(|t| (freq * t as f64).sin()).collect();
            let cos_col: Vec<f64> = (0..n).map(|t| (freq * t as f64).cos()).collect();
            columns.push(sin_col);
            columns.push(cos_col);
        }
    }
    columns
}

fn fourier_terms_at(offset: usize, horizon: usize, periods: &[usize]) -> Vec<Vec<f64>> {
    let mut columns = Vec::new();
    for &period in periods {
        if period < 2 {
            continue;
        }
        for k in 1..=HARMONICS_PER_PERIOD {
            let freq = 2.0 * PI * k as f64 / period as f64;
            let sin_col: Vec<f64> = (0..horizon).map(|h| (freq * (offset + h) as f64).sin()).collect();
            let cos_col: Vec<f64> = (0..horizon).map(|h| (freq * (offset + h) as f64).cos()).collect();
            columns.push(sin_col);
            columns.push(cos_col);
        }
    }
    columns
}

/// Trend + trigonometric seasonal terms fit jointly by OLS. The "trend"
/// regressor is a plain time index; the fitted slope carries the drift
/// into the forecast.
#[derive(Debug, Clone)]
pub struct Tbats {
    periods: Vec<usize>,
    coeffs: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
    n: usize,
}

impl Tbats {
    pub fn new(periods: Vec<usize>) -> Self {
        Self {
            periods,
            coeffs: Vec::new(),
            fitted: Vec::new(),
            sse: 0.0,
            n: 0,
        }
    }

    fn design_matrix(&self, n: usize) -> Vec<Vec<f64>> {
        let mut columns = vec![(0..n).map(|t| t as f64).collect::<Vec<f64>>()];
        columns.extend(fourier_terms(n, &self.periods));
        columns
    }
}

impl Forecaster for Tbats {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        self.n = values.len();
        let design = self.design_matrix(self.n);
        let (coeffs, residuals) = fit_ols_regression(values, &design);
        self.coeffs = coeffs;
        self.fitted = values
            .iter()
            .zip(residuals.iter())
            .map(|(v, r)| v - r)
            .collect();
        self.sse = residuals.iter().map(|r| r * r).sum();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.coeffs.is_empty() {
            return Err(ForecastError::NotFitted("TBATS".to_string(), "predict".to_string()));
        }
        let mut future_design = vec![(0..horizon).map(|h| (self.n + h) as f64).collect::<Vec<f64>>()];
        future_design.extend(fourier_terms_at(self.n, horizon, &self.periods));
        Ok(apply_regression(&self.coeffs, &future_design, horizon))
    }

    fn name(&self) -> String {
        "TBATS".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for Tbats {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

impl InformationCriteria for Tbats {
    fn log_likelihood(&self) -> Option<f64> {
        if self.fitted.is_empty() {
            return None;
        }
        let n = self.n.max(1) as f64;
        let sigma2 = (self.sse / n).max(1e-12);
        Some(-0.5 * n * (sigma2.ln() + (2.0 * std::f64::consts::PI).ln() + 1.0))
    }

    fn n_params(&self) -> usize {
        self.coeffs.len()
    }

    fn n_obs(&self) -> usize {
        self.n
    }
}

/// Tries a single-period and a no-seasonality fit, keeping the one with
/// lower in-sample SSE.
#[derive(Debug, Clone)]
pub struct AutoTbats {
    selected: Option<Tbats>,
}

impl AutoTbats {
    pub fn new() -> Self {
        Self { selected: None }
    }
}

impl Default for AutoTbats {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for AutoTbats {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let candidate_periods: Vec<Vec<usize>> = vec![vec![], vec![7], vec![12], vec![7, 12]];
        let mut best: Option<(f64, Tbats)> = None;
        for periods in candidate_periods {
            let mut candidate = Tbats::new(periods);
            if candidate.fit(values).is_err() {
                continue;
            }
            let Some(fitted) = candidate.fitted_values() else {
                continue;
            };
            let score: f64 = values
                .iter()
                .zip(fitted.iter())
                .map(|(a, f)| (a - f).powi(2))
                .sum();
            if best.as_ref().map(|(b, _)| score < *b).unwrap_or(true) {
                best = Some((score, candidate));
            }
        }
        self.selected = best.map(|(_, m)| m);
        if self.selected.is_none() {
            return Err(ForecastError::InternalError(
                "AutoTBATS: no candidate model converged".to_string(),
            ));
        }
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match &self.selected {
            Some(m) => m.predict(horizon),
            None => Err(ForecastError::NotFitted("AutoTBATS".to_string(), "predict".to_string())),
        }
    }

    fn name(&self) -> String {
        "AutoTBATS".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for AutoTbats {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.selected.as_ref().and_then(|m| m.fitted_values())
    }
}

impl InformationCriteria for AutoTbats {
    fn log_likelihood(&self) -> Option<f64> {
        self.selected.as_ref().and_then(|m| m.log_likelihood())
    }

    fn n_params(&self) -> usize {
        self.selected.as_ref().map(|m| m.n_params()).unwrap_or(0)
    }

    fn n_obs(&self) -> usize {
        self.selected.as_ref().map(|m| m.n_obs()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tbats_fits_a_seasonal_series() {
        let values: Vec<f64> = (0..28)
            .map(|i| 10.0 + 0.2 * i as f64 + (2.0 * PI * i as f64 / 7.0).sin() * 3.0)
            .collect();
        let mut m = Tbats::new(vec![7]);
        m.fit(&values).unwrap();
        let fc = m.predict(7).unwrap();
        assert_eq!(fc.len(), 7);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn auto_tbats_selects_a_candidate() {
        let values: Vec<f64> = (0..28)
            .map(|i| 10.0 + 0.2 * i as f64 + (2.0 * PI * i as f64 / 7.0).sin() * 3.0)
            .collect();
        let mut m = AutoTbats::new();
        m.fit(&values).unwrap();
        assert_eq!(m.predict(4).unwrap().len(), 4);
    }
}
