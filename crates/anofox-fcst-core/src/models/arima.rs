//! ARIMA(p,d,q), ARIMAX, and AutoARIMA (spec §4.3 "ARIMA Models").
//!
//! Fitting uses conditional-sum-of-squares (CSS): the AR/MA coefficients
//! are chosen by Nelder-Mead minimizing in-sample one-step residuals
//! computed recursively with zero-initialized pre-sample errors, which is
//! the same texture as the teacher's simplified `forecast_arima` (a fixed
//! AR(1) on the differenced series) generalized to arbitrary `(p, d, q)`.
//! `ARIMAX` reuses `regression::fit_ols_regression`, exactly as the
//! teacher's `forecast_arima_with_exog` regresses out exogenous effects
//! before forecasting the residual series.

use super::regression::{apply_regression, fit_ols_regression};
use super::{require_non_empty, FittedValues, Forecaster, InformationCriteria};
use crate::error::{ForecastError, Result};
use crate::numerics::{minimize, NelderMeadConfig};

fn difference(values: &[f64], d: usize) -> Vec<f64> {
    let mut current = values.to_vec();
    for _ in 0..d {
        if current.len() < 2 {
            break;
        }
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    current
}

/// Conditional-sum-of-squares residuals for an ARMA(p, q) model with
/// constant `c`, AR coefficients `phi`, MA coefficients `theta`.
fn css_residuals(values: &[f64], c: f64, phi: &[f64], theta: &[f64]) -> Vec<f64> {
    let p = phi.len();
    let q = theta.len();
    let n = values.len();
    let mut errors = vec![0.0; n];

    for t in 0..n {
        let mut pred = c;
        for (i, &coef) in phi.iter().enumerate() {
            if t > i {
                pred += coef * values[t - i - 1];
            }
        }
        for (j, &coef) in theta.iter().enumerate() {
            if t > j {
                pred += coef * errors[t - j - 1];
            }
        }
        errors[t] = values[t] - pred;
    }
    errors
}

fn css_sse(values: &[f64], params: &[f64], p: usize, q: usize) -> f64 {
    let c = params[0];
    let phi = &params[1..1 + p];
    let theta = &params[1 + p..1 + p + q];
    css_residuals(values, c, phi, theta)
        .iter()
        .map(|e| e * e)
        .sum()
}

struct ArmaFit {
    c: f64,
    phi: Vec<f64>,
    theta: Vec<f64>,
    sse: f64,
    last_errors: Vec<f64>,
}

fn fit_arma(values: &[f64], p: usize, q: usize) -> ArmaFit {
    let n_params = 1 + p + q;
    let initial = vec![0.0; n_params];
    let lower = vec![-5.0; n_params];
    let upper = vec![5.0; n_params];

    let result = if n_params == 1 {
        // Pure constant model: the optimum is the sample mean.
        let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
        crate::numerics::NelderMeadResult {
            point: vec![mean],
            value: 0.0,
            iterations: 0,
            converged: true,
        }
    } else {
        minimize(
            |params| css_sse(values, params, p, q),
            &initial,
            &lower,
            &upper,
            &NelderMeadConfig::default(),
        )
    };

    let c = result.point[0];
    let phi: Vec<f64> = result.point[1..1 + p].to_vec();
    let theta: Vec<f64> = result.point[1 + p..1 + p + q].to_vec();
    let errors = css_residuals(values, c, &phi, &theta);
    let sse = errors.iter().map(|e| e * e).sum();
    let last_errors = errors.iter().rev().take(q.max(1)).rev().cloned().collect();

    ArmaFit {
        c,
        phi,
        theta,
        sse,
        last_errors,
    }
}

fn forecast_arma(fit: &ArmaFit, history: &[f64], horizon: usize) -> Vec<f64> {
    let p = fit.phi.len();
    let q = fit.theta.len();
    let mut extended = history.to_vec();
    let mut errors = fit.last_errors.clone();
    let mut out = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let n = extended.len();
        let mut pred = fit.c;
        for (i, &coef) in fit.phi.iter().enumerate() {
            if n > i {
                pred += coef * extended[n - i - 1];
            }
        }
        let m = errors.len();
        for (j, &coef) in fit.theta.iter().enumerate() {
            if m > j {
                pred += coef * errors[m - j - 1];
            }
        }
        extended.push(pred);
        errors.push(0.0);
        out.push(pred);
        if errors.len() > q.max(1) {
            errors.remove(0);
        }
    }
    out
}

/// Undoes `d` rounds of differencing, extrapolating from the last `d`
/// values of the original (undifferenced) series.
fn integrate(diffed_forecast: &[f64], original_tail: &[f64], d: usize) -> Vec<f64> {
    let mut levels = vec![original_tail.to_vec()];
    for k in 1..d {
        let prev = &levels[k - 1];
        levels.push(prev.windows(2).map(|w| w[1] - w[0]).collect());
    }

    let mut series = diffed_forecast.to_vec();
    for k in (0..d).rev() {
        let mut last = *levels[k].last().unwrap();
        let mut out = Vec::with_capacity(series.len());
        for &delta in &series {
            last += delta;
            out.push(last);
        }
        series = out;
    }
    series
}

/// ARIMA(p, d, q) fit by conditional sum of squares.
#[derive(Debug, Clone)]
pub struct Arima {
    p: usize,
    d: usize,
    q: usize,
    c: f64,
    phi: Vec<f64>,
    theta: Vec<f64>,
    last_errors: Vec<f64>,
    diffed_tail: Vec<f64>,
    original_tail: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
    n_obs: usize,
}

impl Arima {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            c: 0.0,
            phi: Vec::new(),
            theta: Vec::new(),
            last_errors: Vec::new(),
            diffed_tail: Vec::new(),
            original_tail: Vec::new(),
            fitted: Vec::new(),
            sse: 0.0,
            n_obs: 0,
        }
    }
}

impl Forecaster for Arima {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let min_len = self.d + self.p.max(self.q) + 2;
        if values.len() < min_len {
            return Err(ForecastError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }

        let diffed = difference(values, self.d);
        let fit = fit_arma(&diffed, self.p, self.q);

        self.c = fit.c;
        self.phi = fit.phi.clone();
        self.theta = fit.theta.clone();
        self.sse = fit.sse;
        self.n_obs = values.len();
        self.last_errors = fit.last_errors;
        self.diffed_tail = diffed.clone();
        self.original_tail = values[values.len() - self.d.max(1).min(values.len())..].to_vec();

        let errors = css_residuals(&diffed, self.c, &self.phi, &self.theta);
        let one_step: Vec<f64> = diffed
            .iter()
            .zip(errors.iter())
            .map(|(v, e)| v - e)
            .collect();
        let fitted_diffed = integrate(&one_step, &self.original_tail, self.d);
        self.fitted = fitted_diffed;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.n_obs == 0 {
            return Err(ForecastError::NotFitted("ARIMA".to_string(), "predict".to_string()));
        }
        let fit = ArmaFit {
            c: self.c,
            phi: self.phi.clone(),
            theta: self.theta.clone(),
            sse: self.sse,
            last_errors: self.last_errors.clone(),
        };
        let diffed_forecast = forecast_arma(&fit, &self.diffed_tail, horizon);
        Ok(integrate(&diffed_forecast, &self.original_tail, self.d))
    }

    fn name(&self) -> String {
        format!("ARIMA({},{},{})", self.p, self.d, self.q)
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for Arima {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

impl InformationCriteria for Arima {
    fn log_likelihood(&self) -> Option<f64> {
        if self.n_obs == 0 {
            return None;
        }
        let n = self.diffed_tail.len().max(1) as f64;
        let sigma2 = (self.sse / n).max(1e-12);
        Some(-0.5 * n * (sigma2.ln() + (2.0 * std::f64::consts::PI).ln() + 1.0))
    }

    fn n_params(&self) -> usize {
        1 + self.p + self.q
    }

    fn n_obs(&self) -> usize {
        self.n_obs
    }
}

/// Searches a small `(p, d, q)` grid (`p, q` in `0..=2`, `d` in `0..=1`)
/// and keeps the model with the lowest AIC.
#[derive(Debug, Clone, Default)]
pub struct AutoArima {
    best: Option<Arima>,
}

impl AutoArima {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_order(&self) -> Option<(usize, usize, usize)> {
        self.best.as_ref().map(|m| (m.p, m.d, m.q))
    }
}

impl Forecaster for AutoArima {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let mut best: Option<Arima> = None;
        for d in 0..=1usize {
            for p in 0..=2usize {
                for q in 0..=2usize {
                    if p == 0 && q == 0 {
                        continue;
                    }
                    let mut candidate = Arima::new(p, d, q);
                    if candidate.fit(values).is_ok() {
                        let aic = candidate.aic().unwrap_or(f64::INFINITY);
                        let keep = match &best {
                            None => true,
                            Some(current) => aic < current.aic().unwrap_or(f64::INFINITY),
                        };
                        if keep {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }
        self.best = Some(
            best.ok_or(ForecastError::InternalError(
                "AutoARIMA: no candidate model converged".to_string(),
            ))?,
        );
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        self.best
            .as_ref()
            .ok_or_else(|| ForecastError::NotFitted("AutoARIMA".to_string(), "predict".to_string()))?
            .predict(horizon)
    }

    fn name(&self) -> String {
        match self.selected_order() {
            Some((p, d, q)) => format!("AutoARIMA({p},{d},{q})"),
            None => "AutoARIMA".to_string(),
        }
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for AutoArima {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.best.as_ref().and_then(|m| m.fitted_values())
    }
}

impl InformationCriteria for AutoArima {
    fn log_likelihood(&self) -> Option<f64> {
        self.best.as_ref().and_then(|m| m.log_likelihood())
    }

    fn n_params(&self) -> usize {
        self.best.as_ref().map(|m| m.n_params()).unwrap_or(0)
    }

    fn n_obs(&self) -> usize {
        self.best.as_ref().map(|m| m.n_obs()).unwrap_or(0)
    }
}

/// ARIMA with exogenous regressors: regress `y` on the historical
/// regressors, fit ARIMA on the residual series, forecast the residuals,
/// then add back the projected exogenous effect.
#[derive(Debug, Clone)]
pub struct ArimaX {
    inner: Arima,
    exog_historical: Vec<Vec<f64>>,
    exog_future: Vec<Vec<f64>>,
    coeffs: Vec<f64>,
}

impl ArimaX {
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        exog_historical: Vec<Vec<f64>>,
        exog_future: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            inner: Arima::new(p, d, q),
            exog_historical,
            exog_future,
            coeffs: Vec::new(),
        }
    }
}

impl Forecaster for ArimaX {
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
        "ARIMAX".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for ArimaX {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.inner.fitted_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arima_fits_and_predicts_trending_series() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + i as f64 * 2.0).collect();
        let mut m = Arima::new(1, 1, 0);
        m.fit(&values).unwrap();
        let fc = m.predict(3).unwrap();
        assert_eq!(fc.len(), 3);
        assert!(fc[2] > fc[0]);
    }

    #[test]
    fn arima_rejects_too_short_series() {
        let mut m = Arima::new(2, 1, 2);
        assert!(m.fit(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn auto_arima_selects_an_order() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let mut m = AutoArima::new();
        m.fit(&values).unwrap();
        assert!(m.selected_order().is_some());
        assert_eq!(m.predict(5).unwrap().len(), 5);
    }

    #[test]
    fn arimax_adds_back_exogenous_effect() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]];
        let y: Vec<f64> = x[0].iter().map(|v| 3.0 * v + 1.0).collect();
        let future = vec![vec![9.0, 10.0]];
        let mut m = ArimaX::new(1, 0, 0, x, future);
        m.fit(&y).unwrap();
        let fc = m.predict(2).unwrap();
        assert_relative_eq!(fc[0], 28.0, epsilon = 1.0);
    }
}
