//! Holt linear trend, Holt-Winters seasonal, and window-average
//! forecasters (spec §4.3 "Exponential Smoothing Models"), grounded on the
//! teacher's `forecast_holt`/`forecast_holt_winters`/`forecast_seasonal_es`/
//! `forecast_seasonal_window_average` fallback implementations.

use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::{ForecastError, Result};
use crate::numerics::{minimize, NelderMeadConfig};

/// Linear trend exponential smoothing, optionally damped.
#[derive(Debug, Clone)]
pub struct Holt {
    alpha: f64,
    beta: f64,
    damped: bool,
    phi: f64,
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
}

impl Holt {
    pub fn fixed(alpha: f64, beta: f64, damped: bool) -> Self {
        Self {
            alpha,
            beta,
            damped,
            phi: if damped { 0.9 } else { 1.0 },
            level: 0.0,
            trend: 0.0,
            fitted: Vec::new(),
        }
    }
}

impl Forecaster for Holt {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        if values.len() < 2 {
            self.level = values[0];
            self.trend = 0.0;
            self.fitted = vec![values[0]];
            return Ok(());
        }

        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(level);

        for &v in values.iter().skip(1) {
            fitted.push(level + self.phi * trend);
            let prev_level = level;
            level = self.alpha * v + (1.0 - self.alpha) * (level + self.phi * trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * self.phi * trend;
        }

        self.level = level;
        self.trend = trend;
        self.fitted = fitted;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.damped {
            let mut phi_sum = 0.0;
            Ok((1..=horizon)
                .map(|h| {
                    phi_sum += self.phi.powi(h as i32);
                    self.level + phi_sum * self.trend
                })
                .collect())
        } else {
            Ok((1..=horizon)
                .map(|h| self.level + self.trend * h as f64)
                .collect())
        }
    }

    fn name(&self) -> String {
        if self.damped {
            "Holt(damped)".to_string()
        } else {
            "Holt".to_string()
        }
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Holt {
    fn fitted_values(&self) -> Option<&[f64]> {
        Some(&self.fitted)
    }
}

/// Holt-Winters seasonal exponential smoothing (additive or multiplicative
/// seasonality), smoothing parameters chosen by minimizing in-sample SSE.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    period: usize,
    multiplicative: bool,
    alpha: f64,
    beta: f64,
    gamma: f64,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    n_obs: usize,
}

impl HoltWinters {
    pub fn new(period: usize, multiplicative: bool) -> Self {
        Self {
            period: period.max(2),
            multiplicative,
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            level: 0.0,
            trend: 0.0,
            seasonal: Vec::new(),
            n_obs: 0,
        }
    }

    fn run(
        values: &[f64],
        p: usize,
        multiplicative: bool,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> (f64, f64, Vec<f64>, Vec<f64>) {
        let initial_level: f64 = values[..p].iter().sum::<f64>() / p as f64;
        let mut level = initial_level;
        let mut trend = (values[p..2 * p].iter().sum::<f64>() / p as f64 - initial_level) / p as f64;

        let mut seasonal: Vec<f64> = if multiplicative {
            values[..p]
                .iter()
                .map(|v| v / initial_level.max(1e-6))
                .collect()
        } else {
            values[..p].iter().map(|v| v - initial_level).collect()
        };

        let mut fitted = vec![0.0; p];
        for (i, &v) in values.iter().enumerate().skip(p) {
            let s_idx = i % p;
            let prev_level = level;
            let season = seasonal[s_idx];

            let forecast_point = if multiplicative {
                (level + trend) * season
            } else {
                level + trend + season
            };
            fitted.push(forecast_point);

            if multiplicative {
                level = alpha * (v / season.max(1e-6)) + (1.0 - alpha) * (level + trend);
                trend = beta * (level - prev_level) + (1.0 - beta) * trend;
                seasonal[s_idx] = gamma * (v / level.max(1e-6)) + (1.0 - gamma) * season;
            } else {
                level = alpha * (v - season) + (1.0 - alpha) * (level + trend);
                trend = beta * (level - prev_level) + (1.0 - beta) * trend;
                seasonal[s_idx] = gamma * (v - level) + (1.0 - gamma) * season;
            }
        }

        (level, trend, seasonal, fitted)
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let p = self.period.min(values.len() / 2).max(2);
        if values.len() < 2 * p {
            return Err(ForecastError::InsufficientData {
                needed: 2 * p,
                got: values.len(),
            });
        }

        let objective = |params: &[f64]| {
            let (alpha, beta, gamma) = (
                params[0].clamp(0.001, 0.999),
                params[1].clamp(0.001, 0.999),
                params[2].clamp(0.001, 0.999),
            );
            let (_, _, _, fitted) = Self::run(values, p, self.multiplicative, alpha, beta, gamma);
            values
                .iter()
                .zip(fitted.iter())
                .skip(p)
                .map(|(a, f)| (a - f).powi(2))
                .sum::<f64>()
        };
        let result = minimize(
            objective,
            &[0.3, 0.1, 0.1],
            &[0.001, 0.001, 0.001],
            &[0.999, 0.999, 0.999],
            &NelderMeadConfig::default(),
        );
        self.alpha = result.point[0].clamp(0.001, 0.999);
        self.beta = result.point[1].clamp(0.001, 0.999);
        self.gamma = result.point[2].clamp(0.001, 0.999);

        let (level, trend, seasonal, _) =
            Self::run(values, p, self.multiplicative, self.alpha, self.beta, self.gamma);
        self.period = p;
        self.level = level;
        self.trend = trend;
        self.seasonal = seasonal;
        self.n_obs = values.len();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let p = self.seasonal.len().max(1);
        Ok((1..=horizon)
            .map(|h| {
                let season = self.seasonal[(self.n_obs + h - 1) % p];
                if self.multiplicative {
                    (self.level + self.trend * h as f64) * season
                } else {
                    self.level + self.trend * h as f64 + season
                }
            })
            .collect())
    }

    fn name(&self) -> String {
        "HoltWinters".to_string()
    }
}

/// Seasonal exponential smoothing without a trend component.
#[derive(Debug, Clone)]
pub struct SeasonalEs {
    period: usize,
    alpha: f64,
    gamma: f64,
    optimize: bool,
    level: f64,
    seasonal: Vec<f64>,
    n_obs: usize,
}

impl SeasonalEs {
    pub fn fixed(period: usize, alpha: f64, gamma: f64) -> Self {
        Self {
            period: period.max(2),
            alpha,
            gamma,
            optimize: false,
            level: 0.0,
            seasonal: Vec::new(),
            n_obs: 0,
        }
    }

    pub fn optimized(period: usize) -> Self {
        Self {
            period: period.max(2),
            alpha: 0.3,
            gamma: 0.1,
            optimize: true,
            level: 0.0,
            seasonal: Vec::new(),
            n_obs: 0,
        }
    }

    fn run(values: &[f64], p: usize, alpha: f64, gamma: f64) -> (f64, Vec<f64>, Vec<f64>) {
        let initial_level: f64 = values[..p].iter().sum::<f64>() / p as f64;
        let mut level = initial_level;
        let mut seasonal: Vec<f64> = values[..p]
            .iter()
            .map(|v| v / initial_level.max(1e-6))
            .collect();

        let mut fitted = vec![0.0; p];
        for (i, &v) in values.iter().enumerate().skip(p) {
            let s_idx = i % p;
            fitted.push(level * seasonal[s_idx]);
            level = alpha * (v / seasonal[s_idx].max(1e-6)) + (1.0 - alpha) * level;
            seasonal[s_idx] = gamma * (v / level.max(1e-6)) + (1.0 - gamma) * seasonal[s_idx];
        }
        (level, seasonal, fitted)
    }
}

impl Forecaster for SeasonalEs {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let p = self.period.min(values.len() / 2).max(2);
        if values.len() < 2 * p {
            return Err(ForecastError::InsufficientData {
                needed: 2 * p,
                got: values.len(),
            });
        }

        if self.optimize {
            let objective = |params: &[f64]| {
                let (alpha, gamma) = (params[0].clamp(0.001, 0.999), params[1].clamp(0.001, 0.999));
                let (_, _, fitted) = Self::run(values, p, alpha, gamma);
                values
                    .iter()
                    .zip(fitted.iter())
                    .skip(p)
                    .map(|(a, f)| (a - f).powi(2))
                    .sum::<f64>()
            };
            let result = minimize(
                objective,
                &[0.3, 0.1],
                &[0.001, 0.001],
                &[0.999, 0.999],
                &NelderMeadConfig::default(),
            );
            self.alpha = result.point[0].clamp(0.001, 0.999);
            self.gamma = result.point[1].clamp(0.001, 0.999);
        }

        let (level, seasonal, _) = Self::run(values, p, self.alpha, self.gamma);
        self.period = p;
        self.level = level;
        self.seasonal = seasonal;
        self.n_obs = values.len();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let p = self.seasonal.len().max(1);
        Ok((1..=horizon)
            .map(|h| self.level * self.seasonal[(self.n_obs + h - 1) % p])
            .collect())
    }

    fn name(&self) -> String {
        if self.optimize {
            "SeasonalESOptimized".to_string()
        } else {
            "SeasonalES".to_string()
        }
    }
}

/// Forecasts with the historical average observed at each seasonal
/// position ("window" = every available season, not just the most recent).
#[derive(Debug, Clone)]
pub struct SeasonalWindowAverage {
    period: usize,
    seasonal_avg: Vec<f64>,
    start_pos: usize,
}

impl SeasonalWindowAverage {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            seasonal_avg: Vec::new(),
            start_pos: 0,
        }
    }
}

impl Forecaster for SeasonalWindowAverage {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let p = self.period.min(values.len());
        let n = values.len();

        if n / p == 0 {
            let avg = values.iter().sum::<f64>() / n as f64;
            self.period = 1;
            self.seasonal_avg = vec![avg];
            self.start_pos = 0;
            return Ok(());
        }

        let mut seasonal_avg = vec![0.0; p];
        let mut seasonal_count = vec![0usize; p];
        for (i, &v) in values.iter().enumerate() {
            let pos = i % p;
            seasonal_avg[pos] += v;
            seasonal_count[pos] += 1;
        }
        for i in 0..p {
            if seasonal_count[i] > 0 {
                seasonal_avg[i] /= seasonal_count[i] as f64;
            }
        }

        self.period = p;
        self.seasonal_avg = seasonal_avg;
        self.start_pos = n % p;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let p = self.seasonal_avg.len().max(1);
        Ok((0..horizon)
            .map(|h| self.seasonal_avg[(self.start_pos + h) % p])
            .collect())
    }

    fn name(&self) -> String {
        "SeasonalWindowAverage".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn holt_extrapolates_trend() {
        let mut m = Holt::fixed(0.8, 0.8, false);
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let fc = m.predict(2).unwrap();
        assert!(fc[1] > fc[0]);
    }

    #[test]
    fn damped_holt_flattens_over_horizon() {
        let mut m = Holt::fixed(0.8, 0.8, true);
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let fc = m.predict(20).unwrap();
        let late_growth = fc[19] - fc[18];
        let early_growth = fc[1] - fc[0];
        assert!(late_growth < early_growth);
    }

    #[test]
    fn holt_winters_recovers_seasonal_pattern() {
        let mut values = Vec::new();
        for cycle in 0..6 {
            for season_val in [10.0, 20.0, 15.0, 25.0] {
                values.push(season_val + cycle as f64 * 0.0);
            }
        }
        let mut m = HoltWinters::new(4, false);
        m.fit(&values).unwrap();
        let fc = m.predict(4).unwrap();
        assert_eq!(fc.len(), 4);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn seasonal_window_average_uses_seasonal_means() {
        let values = vec![10.0, 20.0, 10.0, 20.0, 10.0, 20.0];
        let mut m = SeasonalWindowAverage::new(2);
        m.fit(&values).unwrap();
        let fc = m.predict(2).unwrap();
        assert_relative_eq!(fc[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(fc[1], 20.0, epsilon = 1e-9);
    }

    #[test]
    fn seasonal_window_average_falls_back_when_period_exceeds_data() {
        let mut m = SeasonalWindowAverage::new(10);
        m.fit(&[1.0, 2.0, 3.0]).unwrap();
        let fc = m.predict(2).unwrap();
        assert_relative_eq!(fc[0], 2.0, epsilon = 1e-9);
    }
}
