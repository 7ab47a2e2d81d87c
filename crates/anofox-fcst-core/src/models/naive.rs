//! Naive, seasonal-naive, moving-average, and random-walk-with-drift
//! forecasters (spec §4.3 "Basic Models"), grounded on the teacher's
//! `forecast_naive`/`forecast_seasonal_naive`/`forecast_sma`/`forecast_drift`
//! fallback implementations.

use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::Result;

/// Repeats the last observed value for every horizon step.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last: f64,
    fitted: Vec<f64>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        self.last = *values.last().unwrap();
        self.fitted = std::iter::once(values[0])
            .chain(values.iter().take(values.len() - 1).cloned())
            .collect();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![self.last; horizon])
    }

    fn name(&self) -> String {
        "Naive".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Naive {
    fn fitted_values(&self) -> Option<&[f64]> {
        Some(&self.fitted)
    }
}

/// Repeats the last complete season.
#[derive(Debug, Clone)]
pub struct SeasonalNaive {
    period: usize,
    last_season: Vec<f64>,
}

impl SeasonalNaive {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            last_season: Vec::new(),
        }
    }
}

impl Forecaster for SeasonalNaive {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let p = self.period.min(values.len());
        self.last_season = values.iter().rev().take(p).rev().cloned().collect();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let p = self.last_season.len().max(1);
        Ok((0..horizon).map(|i| self.last_season[i % p]).collect())
    }

    fn name(&self) -> String {
        "SeasonalNaive".to_string()
    }
}

/// Simple moving average of the last `window` observations.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    value: f64,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            value: 0.0,
        }
    }
}

impl Forecaster for Sma {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let w = self.window.min(values.len());
        self.value = values.iter().rev().take(w).sum::<f64>() / w as f64;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![self.value; horizon])
    }

    fn name(&self) -> String {
        "SMA".to_string()
    }
}

/// Random walk with drift: extrapolates the average per-step change across
/// the whole fitted series.
#[derive(Debug, Clone, Default)]
pub struct RandomWalkDrift {
    last: f64,
    drift: f64,
}

impl RandomWalkDrift {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for RandomWalkDrift {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let n = values.len();
        self.last = values[n - 1];
        self.drift = if n > 1 {
            (values[n - 1] - values[0]) / (n - 1) as f64
        } else {
            0.0
        };
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok((1..=horizon)
            .map(|h| self.last + self.drift * h as f64)
            .collect())
    }

    fn name(&self) -> String {
        "RandomWalkDrift".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn naive_repeats_last_value() {
        let mut m = Naive::new();
        m.fit(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.predict(3).unwrap(), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn seasonal_naive_repeats_last_season() {
        let mut m = SeasonalNaive::new(3);
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.predict(4).unwrap(), vec![4.0, 5.0, 6.0, 4.0]);
    }

    #[test]
    fn sma_averages_the_window() {
        let mut m = Sma::new(3);
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(m.predict(1).unwrap()[0], 4.0, epsilon = 1e-9);
    }

    #[test]
    fn drift_extrapolates_linear_trend() {
        let mut m = RandomWalkDrift::new();
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let fc = m.predict(2).unwrap();
        assert_relative_eq!(fc[0], 6.0, epsilon = 1e-9);
        assert_relative_eq!(fc[1], 7.0, epsilon = 1e-9);
    }
}
