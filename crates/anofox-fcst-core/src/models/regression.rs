//! Shared OLS-on-exogenous-regressors helper for `ARIMAX`/`ThetaX`
//! (spec §4.3), grounded verbatim on the teacher's `fit_ols_regression`/
//! `apply_regression` (`forecast.rs`), which builds a `faer` design matrix
//! and fits it with `anofox_regression`'s builder-style `OlsRegressor`.

use anofox_regression::prelude::*;

/// Fits `y = X * beta + intercept` and returns `(coefficients, residuals)`
/// where `coefficients` is `[intercept, beta_1, .., beta_k]`. Falls back to
/// an all-zero fit (residuals = `y`) when there are no regressors or the
/// solver fails, so callers can always fall back to the unconditioned
/// series forecast.
pub(crate) fn fit_ols_regression(y: &[f64], x: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = y.len();
    let k = x.len();

    if k == 0 || n == 0 {
        return (vec![], y.to_vec());
    }

    let x_mat = faer::Mat::from_fn(n, k, |i, j| x[j][i]);
    let y_col = faer::Col::from_fn(n, |i| y[i]);

    let fitted = match OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x_mat, &y_col)
    {
        Ok(f) => f,
        Err(_) => return (vec![0.0; k + 1], y.to_vec()),
    };

    let intercept = fitted.intercept().unwrap_or(0.0);
    let coeffs_col = fitted.coefficients();
    let mut coeffs = vec![intercept];
    for i in 0..coeffs_col.nrows() {
        coeffs.push(coeffs_col[i]);
    }

    let predictions = fitted.predict(&x_mat);
    let residuals: Vec<f64> = (0..n).map(|i| y[i] - predictions[i]).collect();

    (coeffs, residuals)
}

/// Projects fitted `coeffs` (`[intercept, beta_1, .., beta_k]`) onto future
/// regressor values to get the exogenous contribution over the horizon.
pub(crate) fn apply_regression(coeffs: &[f64], future_x: &[Vec<f64>], horizon: usize) -> Vec<f64> {
    if coeffs.is_empty() || future_x.is_empty() {
        return vec![0.0; horizon];
    }

    let intercept = coeffs[0];
    let betas = &coeffs[1..];

    (0..horizon)
        .map(|h| {
            let mut effect = intercept;
            for (j, beta) in betas.iter().enumerate() {
                if j < future_x.len() && h < future_x[j].len() {
                    effect += beta * future_x[j][h];
                }
            }
            effect
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_a_linear_relationship() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let y: Vec<f64> = x[0].iter().map(|v| 2.0 * v + 1.0).collect();
        let (coeffs, residuals) = fit_ols_regression(&y, &x);
        assert_relative_eq!(coeffs[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(coeffs[1], 2.0, epsilon = 1e-6);
        assert!(residuals.iter().all(|r| r.abs() < 1e-6));
    }

    #[test]
    fn no_regressors_passes_through_y_as_residuals() {
        let y = vec![1.0, 2.0, 3.0];
        let (coeffs, residuals) = fit_ols_regression(&y, &[]);
        assert!(coeffs.is_empty());
        assert_eq!(residuals, y);
    }

    #[test]
    fn apply_regression_projects_future_regressors() {
        let coeffs = vec![1.0, 2.0];
        let future = vec![vec![10.0, 20.0]];
        let effect = apply_regression(&coeffs, &future, 2);
        assert_relative_eq!(effect[0], 21.0, epsilon = 1e-9);
        assert_relative_eq!(effect[1], 41.0, epsilon = 1e-9);
    }
}
