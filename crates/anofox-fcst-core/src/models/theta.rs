//! Theta method family (spec §4.3 "Theta Methods"), grounded on the
//! teacher's `forecast_theta` (average of an SES level and a linear drift
//! line — the classical theta-line-2 decomposition with theta = 2).
//! `OptimizedTheta` picks the SES alpha by Nelder-Mead; `Dynamic*` variants
//! deseasonalize first using a multiplicative seasonal index, mirroring
//! the ratio-to-moving-average style already used by
//! `crate::models::holt::HoltWinters`. `ThetaX` regresses out exogenous
//! effects exactly like `arima::ArimaX`.

use super::regression::{apply_regression, fit_ols_regression};
use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::{ForecastError, Result};
use crate::numerics::{minimize, NelderMeadConfig};

fn ses_level_path(values: &[f64], alpha: f64) -> (f64, Vec<f64>) {
    let mut level = values[0];
    let mut fitted = Vec::with_capacity(values.len());
    fitted.push(level);
    for &v in values.iter().skip(1) {
        level = alpha * v + (1.0 - alpha) * level;
        fitted.push(level);
    }
    (level, fitted)
}

fn drift_line(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (values[0], 0.0);
    }
    let drift = (values[n - 1] - values[0]) / (n - 1) as f64;
    (values[0], drift)
}

/// In-sample fitted values and the final SES level + drift parameters for
/// a theta-line-2 blend at a given `alpha`.
fn theta_fit(values: &[f64], alpha: f64) -> (f64, f64, f64, Vec<f64>) {
    let (level, ses_fitted) = ses_level_path(values, alpha);
    let (intercept, drift) = drift_line(values);
    let fitted: Vec<f64> = ses_fitted
        .iter()
        .enumerate()
        .map(|(i, s)| (s + intercept + drift * i as f64) / 2.0)
        .collect();
    (level, intercept, drift, fitted)
}

fn theta_sse(values: &[f64], alpha: f64) -> f64 {
    let (_, _, _, fitted) = theta_fit(values, alpha);
    values
        .iter()
        .zip(fitted.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum()
}

fn theta_predict(level: f64, intercept: f64, drift: f64, n: usize, horizon: usize) -> Vec<f64> {
    (1..=horizon)
        .map(|h| (level + intercept + drift * (n - 1 + h) as f64) / 2.0)
        .collect()
}

/// Multiplicative seasonal indices: ratio of each value to the overall
/// mean, averaged at each seasonal position and renormalized to mean 1.
fn seasonal_indices(values: &[f64], period: usize) -> Vec<f64> {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let mean = if mean.abs() < 1e-9 { 1.0 } else { mean };
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &v) in values.iter().enumerate() {
        sums[i % period] += v / mean;
        counts[i % period] += 1;
    }
    let mut indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 1.0 })
        .collect();
    let avg = indices.iter().sum::<f64>() / period as f64;
    if avg.abs() > 1e-9 {
        for idx in &mut indices {
            *idx /= avg;
        }
    }
    indices
}

/// Theta method (theta = 2): the average of an SES level (alpha fixed at
/// `0.3`, the teacher's default) and a straight drift line.
#[derive(Debug, Clone, Default)]
pub struct Theta {
    level: f64,
    intercept: f64,
    drift: f64,
    n: usize,
    fitted: Vec<f64>,
}

impl Theta {
    pub fn new() -> Self {
        Self::default()
    }

    fn fit_with_alpha(&mut self, values: &[f64], alpha: f64) -> Result<()> {
        require_non_empty(values)?;
        let (level, intercept, drift, fitted) = theta_fit(values, alpha);
        self.level = level;
        self.intercept = intercept;
        self.drift = drift;
        self.n = values.len();
        self.fitted = fitted;
        Ok(())
    }
}

impl Forecaster for Theta {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.fit_with_alpha(values, 0.3)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(theta_predict(self.level, self.intercept, self.drift, self.n, horizon))
    }

    fn name(&self) -> String {
        "Theta".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Theta {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

/// Theta with the SES `alpha` chosen by Nelder-Mead minimizing in-sample
/// SSE of the blended fit.
#[derive(Debug, Clone, Default)]
pub struct OptimizedTheta {
    inner: Theta,
    alpha: f64,
}

impl OptimizedTheta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Forecaster for OptimizedTheta {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let result = minimize(
            |p| theta_sse(values, p[0].clamp(0.0, 1.0)),
            &[0.3],
            &[0.0],
            &[1.0],
            &NelderMeadConfig::default(),
        );
        self.alpha = result.point[0].clamp(0.0, 1.0);
        self.inner.fit_with_alpha(values, self.alpha)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        self.inner.predict(horizon)
    }

    fn name(&self) -> String {
        "OptimizedTheta".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for OptimizedTheta {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.inner.fitted_values()
    }
}

/// Theta applied to a deseasonalized series (multiplicative seasonal
/// index), reseasonalized on output.
#[derive(Debug, Clone)]
pub struct DynamicTheta {
    period: usize,
    optimize: bool,
    inner: Theta,
    optimized_alpha: f64,
    seasonal: Vec<f64>,
    n: usize,
}

impl DynamicTheta {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            optimize: false,
            inner: Theta::default(),
            optimized_alpha: 0.3,
            seasonal: Vec::new(),
            n: 0,
        }
    }

    fn fit_inner(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let p = self.period;
        if p <= 1 || values.len() < 2 * p {
            self.seasonal = vec![1.0];
            self.n = values.len();
            return if self.optimize {
                let mut opt = OptimizedTheta::new();
                opt.fit(values)?;
                self.optimized_alpha = opt.alpha();
                self.inner = opt.inner;
                Ok(())
            } else {
                self.inner.fit(values)
            };
        }

        let seasonal = seasonal_indices(values, p);
        let deseasonalized: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| v / seasonal[i % p])
            .collect();

        if self.optimize {
            let result = minimize(
                |a| theta_sse(&deseasonalized, a[0].clamp(0.0, 1.0)),
                &[0.3],
                &[0.0],
                &[1.0],
                &NelderMeadConfig::default(),
            );
            self.optimized_alpha = result.point[0].clamp(0.0, 1.0);
            self.inner.fit_with_alpha(&deseasonalized, self.optimized_alpha)?;
        } else {
            self.inner.fit_with_alpha(&deseasonalized, 0.3)?;
        }
        self.seasonal = seasonal;
        self.n = values.len();
        Ok(())
    }
}

impl Forecaster for DynamicTheta {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.fit_inner(values)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let base = self.inner.predict(horizon)?;
        let p = self.seasonal.len().max(1);
        Ok(base
            .iter()
            .enumerate()
            .map(|(h, v)| v * self.seasonal[(self.n + h) % p])
            .collect())
    }

    fn name(&self) -> String {
        "DynamicTheta".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for DynamicTheta {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.inner.fitted_values()
    }
}

/// `DynamicTheta` with an optimized SES alpha on the deseasonalized series.
#[derive(Debug, Clone)]
pub struct DynamicOptimizedTheta {
    inner: DynamicTheta,
}

impl DynamicOptimizedTheta {
    pub fn new(period: usize) -> Self {
        let mut inner = DynamicTheta::new(period);
        inner.optimize = true;
        Self { inner }
    }
}

impl Forecaster for DynamicOptimizedTheta {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.inner.fit(values)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        self.inner.predict(horizon)
    }

    fn name(&self) -> String {
        "DynamicOptimizedTheta".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for DynamicOptimizedTheta {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.inner.fitted_values()
    }
}

enum AutoThetaCandidate {
    Theta(Theta),
    Optimized(OptimizedTheta),
    Dynamic(DynamicTheta),
    DynamicOptimized(DynamicOptimizedTheta),
}

impl AutoThetaCandidate {
    fn fitted_sse(&self, values: &[f64]) -> Option<f64> {
        let fitted = match self {
            AutoThetaCandidate::Theta(m) => m.fitted_values()?,
            AutoThetaCandidate::Optimized(m) => m.fitted_values()?,
            AutoThetaCandidate::Dynamic(m) => m.fitted_values()?,
            AutoThetaCandidate::DynamicOptimized(m) => m.fitted_values()?,
        };
        Some(
            values
                .iter()
                .zip(fitted.iter())
                .map(|(a, f)| (a - f).powi(2))
                .sum(),
        )
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match self {
            AutoThetaCandidate::Theta(m) => m.predict(horizon),
            AutoThetaCandidate::Optimized(m) => m.predict(horizon),
            AutoThetaCandidate::Dynamic(m) => m.predict(horizon),
            AutoThetaCandidate::DynamicOptimized(m) => m.predict(horizon),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AutoThetaCandidate::Theta(_) => "Theta",
            AutoThetaCandidate::Optimized(_) => "OptimizedTheta",
            AutoThetaCandidate::Dynamic(_) => "DynamicTheta",
            AutoThetaCandidate::DynamicOptimized(_) => "DynamicOptimizedTheta",
        }
    }
}

/// Fits every Theta variant and keeps the lowest in-sample SSE. Ties keep
/// the first candidate tried (`Theta`, `OptimizedTheta`, `DynamicTheta`,
/// `DynamicOptimizedTheta`, in that order).
#[derive(Debug)]
pub struct AutoTheta {
    period: usize,
    selected: Option<(&'static str, AutoThetaCandidateState)>,
}

impl AutoTheta {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            selected: None,
        }
    }
}

#[derive(Debug)]
enum AutoThetaCandidateState {
    Theta(Theta),
    Optimized(OptimizedTheta),
    Dynamic(DynamicTheta),
    DynamicOptimized(DynamicOptimizedTheta),
}

impl Forecaster for AutoTheta {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let mut candidates: Vec<AutoThetaCandidate> = Vec::new();

        let mut theta = Theta::new();
        if theta.fit(values).is_ok() {
            candidates.push(AutoThetaCandidate::Theta(theta));
        }
        let mut optimized = OptimizedTheta::new();
        if optimized.fit(values).is_ok() {
            candidates.push(AutoThetaCandidate::Optimized(optimized));
        }
        if self.period > 1 {
            let mut dynamic = DynamicTheta::new(self.period);
            if dynamic.fit(values).is_ok() {
                candidates.push(AutoThetaCandidate::Dynamic(dynamic));
            }
            let mut dynamic_opt = DynamicOptimizedTheta::new(self.period);
            if dynamic_opt.fit(values).is_ok() {
                candidates.push(AutoThetaCandidate::DynamicOptimized(dynamic_opt));
            }
        }

        let mut best_idx = None;
        let mut best_sse = f64::INFINITY;
        for (i, c) in candidates.iter().enumerate() {
            if let Some(sse) = c.fitted_sse(values) {
                if sse < best_sse {
                    best_sse = sse;
                    best_idx = Some(i);
                }
            }
        }

        let best = best_idx
            .and_then(|i| candidates.into_iter().nth(i))
            .ok_or(ForecastError::InternalError(
                "AutoTheta: no candidate model converged".to_string(),
            ))?;

        let label = best.label();
        let state = match best {
            AutoThetaCandidate::Theta(m) => AutoThetaCandidateState::Theta(m),
            AutoThetaCandidate::Optimized(m) => AutoThetaCandidateState::Optimized(m),
            AutoThetaCandidate::Dynamic(m) => AutoThetaCandidateState::Dynamic(m),
            AutoThetaCandidate::DynamicOptimized(m) => AutoThetaCandidateState::DynamicOptimized(m),
        };
        self.selected = Some((label, state));
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match &self.selected {
            Some((_, AutoThetaCandidateState::Theta(m))) => m.predict(horizon),
            Some((_, AutoThetaCandidateState::Optimized(m))) => m.predict(horizon),
            Some((_, AutoThetaCandidateState::Dynamic(m))) => m.predict(horizon),
            Some((_, AutoThetaCandidateState::DynamicOptimized(m))) => m.predict(horizon),
            None => Err(ForecastError::NotFitted("AutoTheta".to_string(), "predict".to_string())),
        }
    }

    fn name(&self) -> String {
        match &self.selected {
            Some((label, _)) => format!("AutoTheta({label})"),
            None => "AutoTheta".to_string(),
        }
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for AutoTheta {
    fn fitted_values(&self) -> Option<&[f64]> {
        match &self.selected {
            Some((_, AutoThetaCandidateState::Theta(m))) => m.fitted_values(),
            Some((_, AutoThetaCandidateState::Optimized(m))) => m.fitted_values(),
            Some((_, AutoThetaCandidateState::Dynamic(m))) => m.fitted_values(),
            Some((_, AutoThetaCandidateState::DynamicOptimized(m))) => m.fitted_values(),
            None => None,
        }
    }
}

/// Theta with exogenous regressors: regress, theta-forecast the
/// residuals, add back the projected exogenous effect.
#[derive(Debug, Clone)]
pub struct ThetaX {
    inner: Theta,
    exog_historical: Vec<Vec<f64>>,
    exog_future: Vec<Vec<f64>>,
    coeffs: Vec<f64>,
}

impl ThetaX {
    pub fn new(exog_historical: Vec<Vec<f64>>, exog_future: Vec<Vec<f64>>) -> Self {
        Self {
            inner: Theta::default(),
            exog_historical,
            exog_future,
            coeffs: Vec::new(),
        }
    }
}

impl Forecaster for ThetaX {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let (coeffs, residuals) = fit_ols_regression(values, &self.exog_historical);
        self.coeffs = coeffs;
        self.inner.fit(&residuals)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let residual_forecast = self.inner.predict(horizon)?;
        let exog_effect = apply_regression(&self.coeffs, &self.exog_future, horizon);
        Ok(residual_forecast
            .iter()
            .zip(exog_effect.iter())
            .map(|(r, e)| r + e)
            .collect())
    }

    fn name(&self) -> String {
        "ThetaX".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for ThetaX {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.inner.fitted_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn theta_blends_level_and_drift() {
        let mut m = Theta::new();
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let fc = m.predict(1).unwrap();
        assert!(fc[0] > 0.0);
    }

    #[test]
    fn optimized_theta_alpha_in_bounds() {
        let mut m = OptimizedTheta::new();
        m.fit(&[5.0, 7.0, 4.0, 9.0, 6.0, 8.0]).unwrap();
        assert!(m.alpha() >= 0.0 && m.alpha() <= 1.0);
    }

    #[test]
    fn dynamic_theta_reseasonalizes_output() {
        let values: Vec<f64> = (0..16)
            .map(|i| 10.0 + (i / 4) as f64 + [1.0, 2.0, 1.0, 2.0][i % 4])
            .collect();
        let mut m = DynamicTheta::new(4);
        m.fit(&values).unwrap();
        let fc = m.predict(4).unwrap();
        assert_eq!(fc.len(), 4);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn auto_theta_picks_a_candidate() {
        let values: Vec<f64> = (0..12).map(|i| 10.0 + i as f64 * 0.5).collect();
        let mut m = AutoTheta::new(1);
        m.fit(&values).unwrap();
        assert_eq!(m.predict(3).unwrap().len(), 3);
    }

    #[test]
    fn thetax_adds_back_exogenous_effect() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let y: Vec<f64> = x[0].iter().map(|v| 4.0 * v).collect();
        let future = vec![vec![6.0]];
        let mut m = ThetaX::new(x, future);
        m.fit(&y).unwrap();
        let fc = m.predict(1).unwrap();
        assert_relative_eq!(fc[0], 24.0, epsilon = 2.0);
    }
}
