//! Box-Cox and Yeo-Johnson power transforms (spec §4.2).
//!
//! Both estimate their `lambda` parameter by maximum likelihood, reusing
//! the same bounded [`crate::numerics::minimize`] Nelder-Mead optimizer the
//! forecaster family uses for smoothing-parameter fitting, rather than
//! pulling in a second optimization dependency for one scalar parameter.

use super::{not_fitted, Transform};
use crate::error::{ForecastError, Result};
use crate::numerics::{minimize, NelderMeadConfig};

const LAMBDA_LOWER: f64 = -2.0;
const LAMBDA_UPPER: f64 = 2.0;

fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Box-Cox power transform. Requires every value to be strictly positive.
///
/// `y = (x^lambda - 1) / lambda` for `lambda != 0`, else `y = ln(x)`.
/// `lambda`, when not fixed at construction, is estimated during `fit` by
/// maximizing the profile log-likelihood over `[-2, 2]`.
#[derive(Debug, Clone)]
pub struct BoxCox {
    fixed_lambda: Option<f64>,
    lambda: f64,
    fitted: bool,
}

impl BoxCox {
    /// Estimate `lambda` from the data during `fit`.
    pub fn estimated() -> Self {
        Self {
            fixed_lambda: None,
            lambda: 0.0,
            fitted: false,
        }
    }

    /// Use a fixed `lambda`, skipping estimation.
    pub fn with_lambda(lambda: f64) -> Self {
        Self {
            fixed_lambda: Some(lambda),
            lambda,
            fitted: false,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn neg_log_likelihood(values: &[f64], log_sum: f64, lambda: f64) -> f64 {
        let transformed: Vec<f64> = values
            .iter()
            .map(|&x| boxcox_forward(x, lambda))
            .collect();
        let var = sample_variance(&transformed).max(1e-12);
        let n = values.len() as f64;
        -(-n / 2.0 * var.ln() + (lambda - 1.0) * log_sum)
    }
}

fn boxcox_forward(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-8 {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

fn boxcox_inverse(y: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-8 {
        y.exp()
    } else {
        (lambda * y + 1.0).max(0.0).powf(1.0 / lambda)
    }
}

impl Transform for BoxCox {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::InvalidInput(
                "BoxCox transform requires every value to be strictly positive".to_string(),
            ));
        }
        self.lambda = match self.fixed_lambda {
            Some(l) => l,
            None => {
                let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
                let result = minimize(
                    |p| Self::neg_log_likelihood(values, log_sum, p[0]),
                    &[0.5],
                    &[LAMBDA_LOWER],
                    &[LAMBDA_UPPER],
                    &NelderMeadConfig::default(),
                );
                result.point[0]
            }
        };
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("BoxCox"));
        }
        if values.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::InvalidInput(
                "BoxCox transform requires every value to be strictly positive".to_string(),
            ));
        }
        Ok(values.iter().map(|&v| boxcox_forward(v, self.lambda)).collect())
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("BoxCox"));
        }
        Ok(values.iter().map(|&v| boxcox_inverse(v, self.lambda)).collect())
    }
}

/// Yeo-Johnson power transform: a Box-Cox generalization that accepts zero
/// and negative values.
#[derive(Debug, Clone)]
pub struct YeoJohnson {
    fixed_lambda: Option<f64>,
    lambda: f64,
    fitted: bool,
}

impl YeoJohnson {
    pub fn estimated() -> Self {
        Self {
            fixed_lambda: None,
            lambda: 1.0,
            fitted: false,
        }
    }

    pub fn with_lambda(lambda: f64) -> Self {
        Self {
            fixed_lambda: Some(lambda),
            lambda,
            fitted: false,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn neg_log_likelihood(values: &[f64], lambda: f64) -> f64 {
        let transformed: Vec<f64> = values.iter().map(|&x| yj_forward(x, lambda)).collect();
        let var = sample_variance(&transformed).max(1e-12);
        let n = values.len() as f64;
        let jacobian: f64 = values.iter().map(|&x| (x.abs() + 1.0).ln() * x.signum()).sum();
        -(-n / 2.0 * var.ln() + (lambda - 1.0) * jacobian)
    }
}

fn yj_forward(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < 1e-8 {
            (x + 1.0).ln()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else {
        let two_minus = 2.0 - lambda;
        if two_minus.abs() < 1e-8 {
            -(-x + 1.0).ln()
        } else {
            -((-x + 1.0).powf(two_minus) - 1.0) / two_minus
        }
    }
}

fn yj_inverse(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if lambda.abs() < 1e-8 {
            y.exp() - 1.0
        } else {
            (lambda * y + 1.0).max(0.0).powf(1.0 / lambda) - 1.0
        }
    } else {
        let two_minus = 2.0 - lambda;
        if two_minus.abs() < 1e-8 {
            1.0 - (-y).exp()
        } else {
            1.0 - (-two_minus * y + 1.0).max(0.0).powf(1.0 / two_minus)
        }
    }
}

impl Transform for YeoJohnson {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        self.lambda = match self.fixed_lambda {
            Some(l) => l,
            None => {
                let result = minimize(
                    |p| Self::neg_log_likelihood(values, p[0]),
                    &[1.0],
                    &[LAMBDA_LOWER],
                    &[LAMBDA_UPPER],
                    &NelderMeadConfig::default(),
                );
                result.point[0]
            }
        };
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("YeoJohnson"));
        }
        Ok(values.iter().map(|&v| yj_forward(v, self.lambda)).collect())
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(not_fitted("YeoJohnson"));
        }
        Ok(values.iter().map(|&v| yj_inverse(v, self.lambda)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn boxcox_round_trips_with_fixed_lambda() {
        let mut t = BoxCox::with_lambda(0.5);
        let x = vec![1.0, 4.0, 9.0, 16.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn boxcox_estimated_round_trips() {
        let mut t = BoxCox::estimated();
        let x = vec![2.0, 3.0, 5.0, 8.0, 13.0, 21.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn boxcox_rejects_non_positive() {
        let mut t = BoxCox::estimated();
        assert!(t.fit(&[1.0, 0.0, 2.0]).is_err());
    }

    #[test]
    fn yeo_johnson_handles_negative_values() {
        let mut t = YeoJohnson::with_lambda(0.5);
        let x = vec![-3.0, -1.0, 0.0, 2.0, 5.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn yeo_johnson_estimated_round_trips() {
        let mut t = YeoJohnson::estimated();
        let x = vec![-2.0, -1.0, 0.5, 1.0, 3.0, 7.0];
        let y = t.fit_transform(&x).unwrap();
        let back = t.inverse(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-4);
        }
    }
}
