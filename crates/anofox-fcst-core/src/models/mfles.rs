//! MFLES ("multiple seasonal-trend with a robust linear trend"; spec
//! §4.3), grounded on the teacher's `forecast_mfles` fallback together
//! with `crate::numerics::robust::siegel_repeated_medians` for the trend
//! line (the teacher's simplified MFLES used an ordinary mean drift; this
//! swaps in the crate's robust regression, consistent with the spec's
//! note that MFLES's selling point is trend robustness to outliers).
//! Boosting rounds alternate a Siegel trend fit and classical seasonal
//! re-estimation over the detrended residual, the general "multiple
//! fast linear estimators" idea behind the method's name. `MFLESX`
//! (exogenous MFLES) is intentionally not implemented; see `DESIGN.md`.

use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::{ForecastError, Result};
use crate::numerics::siegel_repeated_medians;

const BOOST_ROUNDS: usize = 3;

fn seasonal_pass(residual: &[f64], period: usize) -> Vec<f64> {
    if period < 2 || residual.len() < period {
        return vec![0.0; period.max(1)];
    }
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &r) in residual.iter().enumerate() {
        sums[i % period] += r;
        counts[i % period] += 1;
    }
    let mut seasonal: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let mean = seasonal.iter().sum::<f64>() / period as f64;
    for s in &mut seasonal {
        *s -= mean;
    }
    seasonal
}

/// Gradient-boosted blend of a robust trend line and a seasonal average,
/// fit over a handful of rounds against the residual of the previous
/// round (à la MFLES's "multiple fast linear estimators" boosting).
#[derive(Debug, Clone)]
pub struct Mfles {
    period: usize,
    intercept: f64,
    slope: f64,
    seasonal: Vec<f64>,
    n: usize,
    fitted: Vec<f64>,
}

impl Mfles {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            intercept: 0.0,
            slope: 0.0,
            seasonal: Vec::new(),
            n: 0,
            fitted: Vec::new(),
        }
    }
}

impl Forecaster for Mfles {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        self.n = values.len();
        let x: Vec<f64> = (0..self.n).map(|i| i as f64).collect();

        let mut residual = values.to_vec();
        let mut intercept = 0.0;
        let mut slope = 0.0;
        let mut seasonal = vec![0.0; self.period];

        for _ in 0..BOOST_ROUNDS {
            let (round_slope, round_intercept) = siegel_repeated_medians(&x, &residual);
            intercept += round_intercept;
            slope += round_slope;
            let trend_component: Vec<f64> =
                x.iter().map(|&xi| round_intercept + round_slope * xi).collect();
            let detrended: Vec<f64> = residual
                .iter()
                .zip(trend_component.iter())
                .map(|(r, t)| r - t)
                .collect();

            let season = seasonal_pass(&detrended, self.period);
            if season.len() == self.period {
                for (s, add) in seasonal.iter_mut().zip(season.iter()) {
                    *s += add;
                }
            }

            residual = values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let seasonal_component = if self.period > 1 {
                        seasonal[i % self.period]
                    } else {
                        0.0
                    };
                    v - (intercept + slope * i as f64) - seasonal_component
                })
                .collect();
        }

        self.intercept = intercept;
        self.slope = slope;
        self.seasonal = seasonal;
        self.fitted = (0..self.n)
            .map(|i| {
                let seasonal_component = if self.period > 1 {
                    self.seasonal[i % self.period]
                } else {
                    0.0
                };
                self.intercept + self.slope * i as f64 + seasonal_component
            })
            .collect();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.n == 0 {
            return Err(ForecastError::NotFitted("MFLES".to_string(), "predict".to_string()));
        }
        Ok((0..horizon)
            .map(|h| {
                let i = self.n + h;
                let seasonal_component = if self.period > 1 {
                    self.seasonal[i % self.period]
                } else {
                    0.0
                };
                self.intercept + self.slope * i as f64 + seasonal_component
            })
            .collect())
    }

    fn name(&self) -> String {
        "MFLES".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Mfles {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

/// Tries the configured seasonal period and no-seasonality, keeping the
/// fit with lower in-sample SSE.
#[derive(Debug, Clone)]
pub struct AutoMfles {
    period: usize,
    selected: Option<Mfles>,
}

impl AutoMfles {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            selected: None,
        }
    }
}

impl Forecaster for AutoMfles {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let mut candidates = vec![Mfles::new(1)];
        if self.period > 1 && values.len() >= 2 * self.period {
            candidates.push(Mfles::new(self.period));
        }

        let mut best: Option<(f64, Mfles)> = None;
        for mut candidate in candidates {
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
                "AutoMFLES: no candidate model converged".to_string(),
            ));
        }
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match &self.selected {
            Some(m) => m.predict(horizon),
            None => Err(ForecastError::NotFitted("AutoMFLES".to_string(), "predict".to_string())),
        }
    }

    fn name(&self) -> String {
        "AutoMFLES".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for AutoMfles {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.selected.as_ref().and_then(|m| m.fitted_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mfles_fits_a_trending_series() {
        let values: Vec<f64> = (0..20).map(|i| 5.0 + i as f64 * 2.0).collect();
        let mut m = Mfles::new(1);
        m.fit(&values).unwrap();
        let fc = m.predict(3).unwrap();
        assert!(fc[0] > values[19]);
    }

    #[test]
    fn mfles_is_robust_to_an_outlier() {
        let mut values: Vec<f64> = (0..20).map(|i| 5.0 + i as f64 * 2.0).collect();
        values[10] = 500.0;
        let mut m = Mfles::new(1);
        m.fit(&values).unwrap();
        let fc = m.predict(1).unwrap();
        assert!(fc[0] < 200.0);
    }

    #[test]
    fn auto_mfles_selects_a_candidate() {
        let values: Vec<f64> = (0..24)
            .map(|i| 5.0 + i as f64 * 0.5 + ((i % 6) as f64))
            .collect();
        let mut m = AutoMfles::new(6);
        m.fit(&values).unwrap();
        assert_eq!(m.predict(6).unwrap().len(), 6);
    }
}
