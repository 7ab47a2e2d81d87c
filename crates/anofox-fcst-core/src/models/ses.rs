//! Simple exponential smoothing, fixed and optimized alpha (spec §4.3).

use super::{require_non_empty, FittedValues, Forecaster};
use crate::error::Result;
use crate::numerics::{minimize, NelderMeadConfig};

fn run(values: &[f64], alpha: f64) -> (f64, Vec<f64>) {
    let mut level = values[0];
    let mut fitted = Vec::with_capacity(values.len());
    fitted.push(level);
    for &v in values.iter().skip(1) {
        fitted.push(level);
        level = alpha * v + (1.0 - alpha) * level;
    }
    (level, fitted)
}

fn sse(values: &[f64], alpha: f64) -> f64 {
    let (_, fitted) = run(values, alpha);
    values
        .iter()
        .zip(fitted.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum()
}

/// SES with a caller-fixed smoothing parameter (the teacher's default is
/// `0.3` for the plain `SES` model).
#[derive(Debug, Clone)]
pub struct Ses {
    alpha: f64,
    level: f64,
    fitted: Vec<f64>,
}

impl Ses {
    pub fn fixed(alpha: f64) -> Self {
        Self {
            alpha,
            level: 0.0,
            fitted: Vec::new(),
        }
    }
}

impl Forecaster for Ses {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let (level, fitted) = run(values, self.alpha);
        self.level = level;
        self.fitted = fitted;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![self.level; horizon])
    }

    fn name(&self) -> String {
        "SES".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for Ses {
    fn fitted_values(&self) -> Option<&[f64]> {
        Some(&self.fitted)
    }
}

/// SES with `alpha` chosen by minimizing in-sample SSE via bounded
/// Nelder-Mead over `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct SesOptimized {
    alpha: f64,
    level: f64,
    fitted: Vec<f64>,
}

impl SesOptimized {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Forecaster for SesOptimized {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let result = minimize(
            |p| sse(values, p[0].clamp(0.0, 1.0)),
            &[0.3],
            &[0.0],
            &[1.0],
            &NelderMeadConfig::default(),
        );
        self.alpha = result.point[0].clamp(0.0, 1.0);
        let (level, fitted) = run(values, self.alpha);
        self.level = level;
        self.fitted = fitted;
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(vec![self.level; horizon])
    }

    fn name(&self) -> String {
        "SESOptimized".to_string()
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }
}

impl FittedValues for SesOptimized {
    fn fitted_values(&self) -> Option<&[f64]> {
        Some(&self.fitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fixed_alpha_converges_toward_flat_series() {
        let mut m = Ses::fixed(0.5);
        m.fit(&[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_relative_eq!(m.predict(1).unwrap()[0], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn optimized_alpha_stays_in_bounds() {
        let mut m = SesOptimized::new();
        m.fit(&[10.0, 12.0, 9.0, 15.0, 11.0, 14.0]).unwrap();
        assert!(m.alpha() >= 0.0 && m.alpha() <= 1.0);
    }

    #[test]
    fn optimized_fits_at_least_as_well_as_naive_default() {
        let data = vec![10.0, 12.0, 9.0, 15.0, 11.0, 14.0, 16.0, 10.0];
        let mut fixed = Ses::fixed(0.3);
        fixed.fit(&data).unwrap();
        let mut optimized = SesOptimized::new();
        optimized.fit(&data).unwrap();
        assert!(sse(&data, optimized.alpha()) <= sse(&data, 0.3) + 1e-6);
    }
}
