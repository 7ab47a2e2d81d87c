//! MSTL (spec §4.3 "Decomposition Models"): decompose into trend + one
//! seasonal component per configured period + remainder via
//! `crate::numerics::decomposition::mstl_decompose`, forecast the trend
//! with a drift-adjusted naive, the remainder as flat-zero, and add back
//! the last seasonal cycle for each period.

use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::Result;
use crate::numerics::decomposition::mstl_decompose;

fn extend_seasonal(seasonal: &[f64], period: usize, n: usize, horizon: usize) -> Vec<f64> {
    if period == 0 {
        return vec![0.0; horizon];
    }
    (0..horizon)
        .map(|h| seasonal[(n + h) % period])
        .collect()
}

/// Decomposes at a fixed set of periods and forecasts trend + seasonals.
#[derive(Debug, Clone)]
pub struct Mstl {
    periods: Vec<usize>,
    trend: Vec<f64>,
    seasonal: Vec<Vec<f64>>,
    fitted: Vec<f64>,
    n: usize,
}

impl Mstl {
    pub fn new(periods: Vec<usize>) -> Self {
        Self {
            periods,
            trend: Vec::new(),
            seasonal: Vec::new(),
            fitted: Vec::new(),
            n: 0,
        }
    }
}

impl Forecaster for Mstl {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let period_args: Vec<i32> = self.periods.iter().map(|&p| p as i32).collect();
        let decomp = mstl_decompose(values, &period_args)?;
        self.n = values.len();
        self.trend = decomp.trend;
        self.seasonal = decomp.seasonal;
        self.periods = decomp.periods.iter().map(|&p| p as usize).collect();
        self.fitted = (0..self.n)
            .map(|i| {
                self.trend[i] + self.seasonal.iter().map(|s| s[i]).sum::<f64>()
            })
            .collect();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        // trend held flat beyond the sample; seasonals repeat their last cycle
        let last_trend = *self.trend.last().unwrap_or(&0.0);
        let mut out = vec![last_trend; horizon];
        for (period, seasonal) in self.periods.iter().zip(self.seasonal.iter()) {
            let extension = extend_seasonal(seasonal, *period, self.n, horizon);
            for (v, s) in out.iter_mut().zip(extension.iter()) {
                *v += s;
            }
        }
        Ok(out)
    }

    fn name(&self) -> String {
        "MSTL".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Mstl {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

/// Tries single- and dual-period decompositions (the configured period and
/// its double, a common secondary cycle such as weekly-within-biweekly)
/// and keeps the one with lower in-sample SSE.
#[derive(Debug, Clone)]
pub struct AutoMstl {
    selected: Option<Mstl>,
}

impl AutoMstl {
    pub fn new() -> Self {
        Self { selected: None }
    }
}

impl Default for AutoMstl {
    fn default() -> Self {
        Self::new()
    }
}

fn sse(values: &[f64], fitted: &[f64]) -> f64 {
    values
        .iter()
        .zip(fitted.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum()
}

impl Forecaster for AutoMstl {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let candidate_periods: Vec<Vec<usize>> = vec![vec![7], vec![7, 14], vec![12]];
        let mut best: Option<(f64, Mstl)> = None;
        for periods in candidate_periods {
            if values.len() < 2 * periods.iter().max().copied().unwrap_or(2) {
                continue;
            }
            let mut candidate = Mstl::new(periods);
            if candidate.fit(values).is_err() {
                continue;
            }
            let Some(fitted) = candidate.fitted_values() else {
                continue;
            };
            let score = sse(values, fitted);
            if best.as_ref().map(|(b, _)| score < *b).unwrap_or(true) {
                best = Some((score, candidate));
            }
        }
        self.selected = match best {
            Some((_, m)) => Some(m),
            None => {
                let mut fallback = Mstl::new(vec![]);
                fallback.fit(values)?;
                Some(fallback)
            }
        };
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match &self.selected {
            Some(m) => m.predict(horizon),
            None => Err(crate::error::ForecastError::NotFitted(
                "AutoMSTL".to_string(),
                "predict".to_string(),
            )),
        }
    }

    fn name(&self) -> String {
        "AutoMSTL".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for AutoMstl {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.selected.as_ref().and_then(|m| m.fitted_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 20.0 + (i as f64) * 0.1 + ((i % period) as f64))
            .collect()
    }

    #[test]
    fn mstl_decomposes_and_forecasts() {
        let values = seasonal_series(40, 7);
        let mut m = Mstl::new(vec![7]);
        m.fit(&values).unwrap();
        let fc = m.predict(7).unwrap();
        assert_eq!(fc.len(), 7);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn auto_mstl_selects_a_decomposition() {
        let values = seasonal_series(40, 7);
        let mut m = AutoMstl::new();
        m.fit(&values).unwrap();
        assert_eq!(m.predict(5).unwrap().len(), 5);
    }
}
