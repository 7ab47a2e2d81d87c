//! Log/logit and linear scaling transforms (spec §4.2).

use super::{not_fitted, Transform};
use crate::error::{ForecastError, Result};

/// `y = ln(x + offset)`, `x = exp(y) - offset`.
///
/// `offset` lets series containing zeros (but no negatives) be logged; it
/// defaults to `0.0` and must be chosen so every fitted value is strictly
/// positive after the shift.
#[derive(Debug, Clone)]
pub struct Log {
    offset: f64,
    fitted: bool,
}

impl Log {
    pub fn new(offset: f64) -> Self {
        Self { offset, fitted: false }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Transform for Log {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.iter().any(|&v| v + self.offset <= 0.0) {
            return Err(ForecastError::InvalidInput(
                "Log transform requires every value + offset to be strictly positive".to_string(),
            ));
        }
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("Log"));
        }
        values
            .iter()
            .map(|&v| {
                let shifted = v + self.offset;
                if shifted <= 0.0 {
                    Err(ForecastError::InvalidInput(format!(
                        "Log transform: value {v} + offset {} is not positive",
                        self.offset
                    )))
                } else {
                    Ok(shifted.ln())
                }
            })
            .collect()
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("Log"));
        }
        Ok(values.iter().map(|&v| v.exp() - self.offset).collect())
    }
}

/// `y = ln(p / (1 - p))` where `p` is `x` affine-mapped into `(0, 1)` by
/// `[lower, upper]`; `x = lower + (upper - lower) * sigmoid(y)`.
///
/// Used for bounded series (rates, proportions, capacity-limited demand)
/// where a forecaster should operate on an unbounded scale.
#[derive(Debug, Clone)]
pub struct Logit {
    lower: f64,
    upper: f64,
    fitted: bool,
}

impl Logit {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(upper > lower) {
            return Err(ForecastError::InvalidParameter {
                param: "upper".to_string(),
                value: upper.to_string(),
                reason: "must be strictly greater than lower".to_string(),
            });
        }
        Ok(Self {
            lower,
            upper,
            fitted: false,
        })
    }

    fn to_unit(&self, v: f64) -> f64 {
        (v - self.lower) / (self.upper - self.lower)
    }
}

impl Transform for Logit {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values
            .iter()
            .any(|&v| v <= self.lower || v >= self.upper)
        {
            return Err(ForecastError::InvalidInput(format!(
                "Logit transform requires every value to lie strictly within ({}, {})",
                self.lower, self.upper
            )));
        }
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("Logit"));
        }
        values
            .iter()
            .map(|&v| {
                let p = self.to_unit(v);
                if !(0.0..1.0).contains(&p) {
                    return Err(ForecastError::InvalidInput(format!(
                        "Logit transform: value {v} falls outside ({}, {})",
                        self.lower, self.upper
                    )));
                }
                Ok((p / (1.0 - p)).ln())
            })
            .collect()
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("Logit"));
        }
        Ok(values
            .iter()
            .map(|&y| {
                let p = 1.0 / (1.0 + (-y).exp());
                self.lower + (self.upper - self.lower) * p
            })
            .collect())
    }
}

/// Linear rescale to `[0, 1]` from the fitted min/max.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
    fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    fn range(&self) -> f64 {
        let r = self.max - self.min;
        if r.abs() < f64::EPSILON {
            1.0
        } else {
            r
        }
    }
}

impl Transform for MinMaxScaler {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        self.min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        self.max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("MinMaxScaler"));
        }
        let range = self.range();
        Ok(values.iter().map(|&v| (v - self.min) / range).collect())
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("MinMaxScaler"));
        }
        let range = self.range();
        Ok(values.iter().map(|&v| v * range + self.min).collect())
    }
}

/// Standardize to zero mean, unit variance.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
    fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transform for StandardScaler {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        self.mean = mean;
        self.std = if var.sqrt() < f64::EPSILON { 1.0 } else { var.sqrt() };
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("StandardScaler"));
        }
        Ok(values.iter().map(|&v| (v - self.mean) / self.std).collect())
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("StandardScaler"));
        }
        Ok(values.iter().map(|&v| v * self.std + self.mean).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_round_trips() {
        let mut t = Log::default();
        let x = vec![1.0, 2.0, 10.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn log_rejects_non_positive() {
        let mut t = Log::default();
        assert!(t.fit(&[1.0, 0.0, -1.0]).is_err());
    }

    #[test]
    fn logit_round_trips() {
        let mut t = Logit::new(0.0, 1.0).unwrap();
        let x = vec![0.1, 0.5, 0.9];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn minmax_scales_into_unit_interval() {
        let mut t = MinMaxScaler::new();
        let y = t.fit_transform(&[2.0, 4.0, 6.0]).unwrap();
        assert_relative_eq!(y[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(y[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn minmax_constant_series_does_not_divide_by_zero() {
        let mut t = MinMaxScaler::new();
        let y = t.fit_transform(&[5.0, 5.0, 5.0]).unwrap();
        assert!(y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn standard_scaler_round_trips() {
        let mut t = StandardScaler::new();
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn using_before_fit_errors() {
        let t = StandardScaler::new();
        assert!(t.transform(&[1.0]).is_err());
    }
}
