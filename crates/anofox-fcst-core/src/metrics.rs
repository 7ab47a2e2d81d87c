//! Evaluation metrics for time series forecasting (spec §4.7).
//!
//! Metrics that are mathematically undefined for some inputs (division by a
//! zero actual, zero baseline error, zero total variance) return
//! `Ok(None)` rather than `Ok(Some(f64::NAN))`: a `None` forces callers —
//! in particular `validation::auto_select`'s ranking — to decide how to
//! treat "undefined" instead of silently propagating a NaN through a sum.

use crate::error::{ForecastError, Result};

/// Mean Absolute Error
pub fn mae(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Mean Squared Error
pub fn mse(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn rmse(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    Ok(mse(actual, forecast)?.sqrt())
}

/// Mean Absolute Percentage Error. `None` if every actual is within
/// `f64::EPSILON` of zero.
pub fn mape(actual: &[f64], forecast: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .filter(|(a, _)| a.abs() > f64::EPSILON)
        .map(|(a, f)| ((a - f) / a).abs())
        .sum();
    let count = actual.iter().filter(|a| a.abs() > f64::EPSILON).count();
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(sum / count as f64 * 100.0))
}

/// Symmetric Mean Absolute Percentage Error. `None` if every actual/forecast
/// pair has zero combined magnitude.
pub fn smape(actual: &[f64], forecast: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .filter(|(a, f)| a.abs() + f.abs() > f64::EPSILON)
        .map(|(a, f)| 2.0 * (a - f).abs() / (a.abs() + f.abs()))
        .sum();
    let count = actual
        .iter()
        .zip(forecast.iter())
        .filter(|(a, f)| a.abs() + f.abs() > f64::EPSILON)
        .count();
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(sum / count as f64 * 100.0))
}

/// Mean Absolute Scaled Error.
///
/// MASE = MAE(actual, predicted) / MAE(actual, baseline). `None` if the
/// baseline is a perfect (zero-error) forecast.
pub fn mase(actual: &[f64], forecast: &[f64], baseline: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, forecast)?;

    if actual.len() != baseline.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and baseline arrays must have the same length: {} vs {}",
            actual.len(),
            baseline.len()
        )));
    }

    let forecast_mae = mae(actual, forecast)?;
    let baseline_mae = mae(actual, baseline)?;

    if baseline_mae.abs() < f64::EPSILON {
        return Ok(None);
    }

    Ok(Some(forecast_mae / baseline_mae))
}

/// R-squared (Coefficient of Determination). `None` if `actual` is constant
/// (zero total variance).
pub fn r2(actual: &[f64], forecast: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, forecast)?;

    let mean: f64 = actual.iter().sum::<f64>() / actual.len() as f64;

    let ss_res: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum();

    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot.abs() < f64::EPSILON {
        return Ok(None);
    }

    Ok(Some(1.0 - ss_res / ss_tot))
}

/// Forecast Bias (mean signed error, `forecast - actual`)
pub fn bias(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    validate_inputs(actual, forecast)?;
    let sum: f64 = actual.iter().zip(forecast.iter()).map(|(a, f)| f - a).sum();
    Ok(sum / actual.len() as f64)
}

/// Relative Mean Absolute Error: MAE(actual, pred1) / MAE(actual, pred2).
/// `None` if `pred2` is a perfect forecast.
pub fn rmae(actual: &[f64], pred1: &[f64], pred2: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, pred1)?;

    if actual.len() != pred2.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and pred2 arrays must have the same length: {} vs {}",
            actual.len(),
            pred2.len()
        )));
    }

    let pred1_mae = mae(actual, pred1)?;
    let pred2_mae = mae(actual, pred2)?;

    if pred2_mae.abs() < f64::EPSILON {
        return Ok(None);
    }

    Ok(Some(pred1_mae / pred2_mae))
}

/// Quantile Loss (Pinball Loss) at a single quantile.
pub fn quantile_loss(actual: &[f64], forecast: &[f64], quantile: f64) -> Result<f64> {
    validate_inputs(actual, forecast)?;

    if !(0.0..=1.0).contains(&quantile) {
        return Err(ForecastError::InvalidInput(
            "Quantile must be between 0 and 1".to_string(),
        ));
    }

    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| {
            let error = a - f;
            if error >= 0.0 {
                quantile * error
            } else {
                (quantile - 1.0) * error
            }
        })
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean Quantile Loss (average pinball loss across multiple quantile forecasts)
pub fn mqloss(actual: &[f64], forecasts: &[Vec<f64>], quantiles: &[f64]) -> Result<f64> {
    if forecasts.len() != quantiles.len() {
        return Err(ForecastError::InvalidInput(
            "Number of forecasts must match number of quantiles".to_string(),
        ));
    }

    let mut total_loss = 0.0;
    for (forecast, &q) in forecasts.iter().zip(quantiles.iter()) {
        total_loss += quantile_loss(actual, forecast, q)?;
    }

    Ok(total_loss / quantiles.len() as f64)
}

/// Prediction Interval Coverage: the fraction of `actual` that falls within
/// `[lower, upper]`.
pub fn coverage(actual: &[f64], lower: &[f64], upper: &[f64]) -> Result<f64> {
    if actual.len() != lower.len() || actual.len() != upper.len() {
        return Err(ForecastError::InvalidInput(
            "All arrays must have the same length".to_string(),
        ));
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    let covered: usize = actual
        .iter()
        .zip(lower.iter())
        .zip(upper.iter())
        .filter(|((a, l), u)| *a >= *l && *a <= *u)
        .count();

    Ok(covered as f64 / actual.len() as f64)
}

/// Winkler (interval) score: penalizes a prediction interval both for its
/// width and, when `actual` falls outside it, for the miss distance scaled
/// by `2 / alpha`.
///
/// `alpha` is the miscoverage rate of the interval (e.g. `0.1` for a 90%
/// interval). Lower is better.
pub fn winkler_score(actual: &[f64], lower: &[f64], upper: &[f64], alpha: f64) -> Result<f64> {
    if actual.len() != lower.len() || actual.len() != upper.len() {
        return Err(ForecastError::InvalidInput(
            "All arrays must have the same length".to_string(),
        ));
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ForecastError::InvalidInput(
            "alpha must be in (0, 1)".to_string(),
        ));
    }

    let penalty = 2.0 / alpha;
    let sum: f64 = actual
        .iter()
        .zip(lower.iter())
        .zip(upper.iter())
        .map(|((&a, &l), &u)| {
            let width = u - l;
            if a < l {
                width + penalty * (l - a)
            } else if a > u {
                width + penalty * (a - u)
            } else {
                width
            }
        })
        .sum();

    Ok(sum / actual.len() as f64)
}

fn validate_inputs(actual: &[f64], forecast: &[f64]) -> Result<()> {
    if actual.len() != forecast.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and forecast arrays must have the same length: {} vs {}",
            actual.len(),
            forecast.len()
        )));
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mae() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let forecast = vec![1.1, 2.2, 2.9, 4.1, 4.8];
        let result = mae(&actual, &forecast).unwrap();
        assert_relative_eq!(result, 0.14, epsilon = 0.01);
    }

    #[test]
    fn test_mse() {
        let actual = vec![1.0, 2.0, 3.0];
        let forecast = vec![1.0, 2.0, 4.0];
        let result = mse(&actual, &forecast).unwrap();
        assert_relative_eq!(result, 1.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_r2_perfect() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let forecast = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = r2(&actual, &forecast).unwrap().unwrap();
        assert_relative_eq!(result, 1.0, epsilon = 0.001);
    }

    #[test]
    fn test_r2_constant_actual_is_undefined() {
        let actual = vec![2.0, 2.0, 2.0];
        let forecast = vec![1.0, 2.0, 3.0];
        assert!(r2(&actual, &forecast).unwrap().is_none());
    }

    #[test]
    fn test_coverage() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let lower = vec![0.5, 1.5, 2.5, 3.5, 4.5];
        let upper = vec![1.5, 2.5, 3.5, 4.5, 5.5];
        let result = coverage(&actual, &lower, &upper).unwrap();
        assert_relative_eq!(result, 1.0, epsilon = 0.001);
    }

    #[test]
    fn test_mape_ignores_zero_actuals() {
        let actual = vec![0.0, 2.0];
        let forecast = vec![0.0, 1.0];
        let result = mape(&actual, &forecast).unwrap().unwrap();
        assert_relative_eq!(result, 50.0, epsilon = 0.01);
    }

    #[test]
    fn test_mape_all_zero_actuals_is_undefined() {
        let actual = vec![0.0, 0.0];
        let forecast = vec![1.0, 2.0];
        assert!(mape(&actual, &forecast).unwrap().is_none());
    }

    #[test]
    fn test_winkler_penalizes_misses() {
        let actual = vec![5.0];
        let lower = vec![1.0];
        let upper = vec![2.0];
        let narrow_miss = winkler_score(&actual, &lower, &upper, 0.1).unwrap();
        let covering = winkler_score(&actual, &[1.0], &[6.0], 0.1).unwrap();
        assert!(narrow_miss > covering);
    }

    #[test]
    fn test_winkler_rewards_narrow_covering_interval() {
        let actual = vec![3.0];
        let wide = winkler_score(&actual, &[0.0], &[10.0], 0.1).unwrap();
        let narrow = winkler_score(&actual, &[2.0], &[4.0], 0.1).unwrap();
        assert!(narrow < wide);
    }

    #[test]
    fn test_mqloss_averages_pinball_losses() {
        let actual = vec![1.0, 2.0, 3.0];
        let forecasts = vec![vec![1.0, 2.0, 3.0], vec![0.5, 1.5, 2.5]];
        let quantiles = vec![0.5, 0.1];
        let result = mqloss(&actual, &forecasts, &quantiles).unwrap();
        assert!(result >= 0.0);
    }
}
