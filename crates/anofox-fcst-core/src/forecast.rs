//! Thin dispatch layer over the `models` module (spec §4.3): fills nulls,
//! detects seasonality when not pinned, builds and fits the requested
//! `Forecaster`, and packages point forecasts together with whatever
//! fitted values / information criteria that model's capability bridges
//! expose.

use crate::error::{ForecastError, Result};
use crate::imputation::fill_nulls_interpolate;
use crate::models::{self, Forecaster, FittedValues, InformationCriteria, ModelOptions};
use crate::seasonality::detect_seasonality;

pub use crate::models::ModelType;

/// Forecast result.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    /// Point forecasts
    pub point: Vec<f64>,
    /// Lower confidence bounds
    pub lower: Vec<f64>,
    /// Upper confidence bounds
    pub upper: Vec<f64>,
    /// Fitted values (in-sample), when the model exposes `FittedValues`
    pub fitted: Option<Vec<f64>>,
    /// Residuals (actual - fitted)
    pub residuals: Option<Vec<f64>>,
    /// Model name used
    pub model_name: String,
    /// AIC, when the model exposes `InformationCriteria`
    pub aic: Option<f64>,
    /// BIC, when the model exposes `InformationCriteria`
    pub bic: Option<f64>,
    /// MSE of in-sample fit
    pub mse: Option<f64>,
}

/// Forecast options.
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    /// Model to use
    pub model: ModelType,
    /// ETS model specification (e.g., "AAA", "MNM", "AAdA").
    /// Only used when model is ETS. None means use the default search.
    pub ets_spec: Option<String>,
    /// Forecast horizon
    pub horizon: usize,
    /// Confidence level (0-1)
    pub confidence_level: f64,
    /// Seasonal period (0 = auto-detect)
    pub seasonal_period: usize,
    /// Auto-detect seasonality
    pub auto_detect_seasonality: bool,
    /// Include fitted values
    pub include_fitted: bool,
    /// Include residuals
    pub include_residuals: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            model: ModelType::AutoETS,
            ets_spec: None,
            horizon: 12,
            confidence_level: 0.95,
            seasonal_period: 0,
            auto_detect_seasonality: true,
            include_fitted: false,
            include_residuals: false,
        }
    }
}

/// Exogenous data for forecasting with external regressors.
///
/// Contains both historical regressors (aligned with y values) and
/// future regressors (for the forecast horizon).
#[derive(Debug, Clone, Default)]
pub struct ExogenousData {
    /// Historical regressor values: `historical[regressor_idx][time_idx]`
    /// Each inner Vec must have the same length as the target time series.
    pub historical: Vec<Vec<f64>>,
    /// Future regressor values: `future[regressor_idx][horizon_idx]`
    /// Each inner Vec must have length equal to the forecast horizon.
    pub future: Vec<Vec<f64>>,
}

impl ExogenousData {
    /// Create new exogenous data.
    pub fn new(historical: Vec<Vec<f64>>, future: Vec<Vec<f64>>) -> Self {
        Self { historical, future }
    }

    /// Check if exogenous data is empty.
    pub fn is_empty(&self) -> bool {
        self.historical.is_empty()
    }

    /// Get the number of regressors.
    pub fn n_regressors(&self) -> usize {
        self.historical.len()
    }

    /// Validate that exogenous data dimensions are consistent.
    pub fn validate(&self, n_obs: usize, horizon: usize) -> Result<()> {
        if self.historical.len() != self.future.len() {
            return Err(ForecastError::InvalidInput(format!(
                "Historical has {} regressors but future has {}",
                self.historical.len(),
                self.future.len()
            )));
        }

        for (i, hist) in self.historical.iter().enumerate() {
            if hist.len() != n_obs {
                return Err(ForecastError::InvalidInput(format!(
                    "Regressor {} historical has {} values but expected {}",
                    i,
                    hist.len(),
                    n_obs
                )));
            }
        }

        for (i, fut) in self.future.iter().enumerate() {
            if fut.len() != horizon {
                return Err(ForecastError::InvalidInput(format!(
                    "Regressor {} future has {} values but horizon is {}",
                    i,
                    fut.len(),
                    horizon
                )));
            }
        }

        Ok(())
    }
}

/// Forecast options with exogenous variables support.
#[derive(Debug, Clone)]
pub struct ForecastOptionsExog {
    /// Model to use
    pub model: ModelType,
    /// ETS model specification (e.g., "AAA", "MNM", "AAdA")
    /// Only used when model is ETS. None means use the default search.
    pub ets_spec: Option<String>,
    /// Forecast horizon
    pub horizon: usize,
    /// Confidence level (0-1)
    pub confidence_level: f64,
    /// Seasonal period (0 = auto-detect)
    pub seasonal_period: usize,
    /// Auto-detect seasonality
    pub auto_detect_seasonality: bool,
    /// Include fitted values
    pub include_fitted: bool,
    /// Include residuals
    pub include_residuals: bool,
    /// Exogenous data (optional)
    pub exog: Option<ExogenousData>,
}

impl Default for ForecastOptionsExog {
    fn default() -> Self {
        Self {
            model: ModelType::AutoETS,
            ets_spec: None,
            horizon: 12,
            confidence_level: 0.95,
            seasonal_period: 0,
            auto_detect_seasonality: true,
            include_fitted: false,
            include_residuals: false,
            exog: None,
        }
    }
}

impl From<ForecastOptions> for ForecastOptionsExog {
    fn from(opts: ForecastOptions) -> Self {
        Self {
            model: opts.model,
            ets_spec: opts.ets_spec,
            horizon: opts.horizon,
            confidence_level: opts.confidence_level,
            seasonal_period: opts.seasonal_period,
            auto_detect_seasonality: opts.auto_detect_seasonality,
            include_fitted: opts.include_fitted,
            include_residuals: opts.include_residuals,
            exog: None,
        }
    }
}

fn z_score(confidence: f64) -> f64 {
    match confidence {
        c if c >= 0.99 => 2.576,
        c if c >= 0.95 => 1.96,
        c if c >= 0.90 => 1.645,
        c if c >= 0.80 => 1.28,
        _ => 1.0,
    }
}

/// Gaussian intervals around the point forecast, variance growing
/// linearly in the step (`sigma^2 * h`), matching the Naive interval
/// policy generalized across every model.
fn confidence_intervals(forecasts: &[f64], residual_variance: f64, confidence: f64) -> (Vec<f64>, Vec<f64>) {
    let std_error = residual_variance.max(0.0).sqrt();
    let z = z_score(confidence);
    let lower = forecasts
        .iter()
        .enumerate()
        .map(|(i, &f)| f - z * std_error * ((i + 1) as f64).sqrt())
        .collect();
    let upper = forecasts
        .iter()
        .enumerate()
        .map(|(i, &f)| f + z * std_error * ((i + 1) as f64).sqrt())
        .collect();
    (lower, upper)
}

/// Residual variance from a model's fitted values when available,
/// falling back to the historical sample variance (used for models that
/// don't implement `FittedValues`, e.g. `SeasonalWindowAverage`).
fn residual_variance(values: &[f64], fitted: Option<&[f64]>) -> f64 {
    match fitted {
        Some(fitted) if fitted.len() == values.len() => {
            let sse: f64 = values
                .iter()
                .zip(fitted.iter())
                .map(|(a, f)| (a - f).powi(2))
                .sum();
            sse / values.len() as f64
        }
        _ => {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
        }
    }
}

fn resolve_period(values: &[f64], options_period: usize, auto_detect: bool) -> usize {
    if auto_detect && options_period == 0 {
        detect_seasonality(values, None)
            .ok()
            .and_then(|p| p.first().cloned())
            .unwrap_or(1) as usize
    } else if options_period > 0 {
        options_period
    } else {
        1
    }
}

fn package_output(
    model: &dyn Forecaster,
    values: &[f64],
    point: Vec<f64>,
    confidence_level: f64,
    include_fitted: bool,
    include_residuals: bool,
) -> ForecastOutput {
    let fitted_values = model.as_fitted_values().and_then(|fv| fv.fitted_values());
    let variance = residual_variance(values, fitted_values);
    let (lower, upper) = confidence_intervals(&point, variance, confidence_level);

    let residuals = if include_residuals {
        model
            .as_fitted_values()
            .and_then(|fv| fv.residuals(values))
    } else {
        None
    };

    let (aic, bic) = model
        .as_information_criteria()
        .map(|ic| (ic.aic(), ic.bic()))
        .unwrap_or((None, None));

    let mse = fitted_values.map(|fitted| {
        let sse: f64 = values
            .iter()
            .zip(fitted.iter())
            .map(|(a, f)| (a - f).powi(2))
            .sum();
        sse / values.len() as f64
    });

    ForecastOutput {
        point,
        lower,
        upper,
        fitted: if include_fitted {
            fitted_values.map(|f| f.to_vec())
        } else {
            None
        },
        residuals,
        model_name: model.name(),
        aic,
        bic,
        mse,
    }
}

fn validate_clean(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if values.len() < 3 {
        return Err(ForecastError::InsufficientData {
            needed: 3,
            got: values.len(),
        });
    }
    Ok(())
}

/// Generate forecasts for a time series.
pub fn forecast(values: &[Option<f64>], options: &ForecastOptions) -> Result<ForecastOutput> {
    let clean_values: Vec<f64> = fill_nulls_interpolate(values);
    validate_clean(&clean_values)?;

    let period = resolve_period(&clean_values, options.seasonal_period, options.auto_detect_seasonality);

    let model_options = ModelOptions {
        seasonal_period: period,
        ets_spec: options.ets_spec.clone(),
        exog_historical: Vec::new(),
        exog_future: Vec::new(),
    };

    let mut model = models::build(options.model, &model_options)?;
    model.fit(&clean_values)?;
    let point = model.predict(options.horizon)?;

    Ok(package_output(
        model.as_ref(),
        &clean_values,
        point,
        options.confidence_level,
        options.include_fitted,
        options.include_residuals,
    ))
}

/// Models whose exogenous variant (`ARIMAX`, `ThetaX`) this module will
/// switch to when exogenous data is supplied.
fn exog_variant(model: ModelType) -> Option<ModelType> {
    match model {
        ModelType::ARIMA | ModelType::AutoARIMA | ModelType::ARIMAX => Some(ModelType::ARIMAX),
        ModelType::Theta
        | ModelType::OptimizedTheta
        | ModelType::DynamicTheta
        | ModelType::DynamicOptimizedTheta
        | ModelType::AutoTheta
        | ModelType::ThetaX => Some(ModelType::ThetaX),
        _ => None,
    }
}

/// Generate forecasts with exogenous variables.
///
/// Models without an exogenous-capable variant ignore the exogenous data
/// and fall back to a standard forecast, except `MFLES`/`AutoMFLES`,
/// which reject it outright: this crate does not implement `MFLESX`.
pub fn forecast_with_exog(
    values: &[Option<f64>],
    options: &ForecastOptionsExog,
) -> Result<ForecastOutput> {
    if let Some(ref exog) = options.exog {
        exog.validate(values.len(), options.horizon)?;
    }

    let clean_values: Vec<f64> = fill_nulls_interpolate(values);
    validate_clean(&clean_values)?;

    let period = resolve_period(&clean_values, options.seasonal_period, options.auto_detect_seasonality);

    if matches!(options.model, ModelType::MFLES | ModelType::AutoMFLES) && options.exog.is_some() {
        return Err(ForecastError::InvalidInput(
            "MFLES does not support exogenous regressors".to_string(),
        ));
    }

    let (model_type, exog_historical, exog_future) = match (&options.exog, exog_variant(options.model)) {
        (Some(exog), Some(variant)) => (variant, exog.historical.clone(), exog.future.clone()),
        _ => (options.model, Vec::new(), Vec::new()),
    };

    let model_options = ModelOptions {
        seasonal_period: period,
        ets_spec: options.ets_spec.clone(),
        exog_historical,
        exog_future,
    };

    let mut model = models::build(model_type, &model_options)?;
    model.fit(&clean_values)?;
    let point = model.predict(options.horizon)?;

    Ok(package_output(
        model.as_ref(),
        &clean_values,
        point,
        options.confidence_level,
        options.include_fitted,
        options.include_residuals,
    ))
}

/// List all available model names (32 models matching the upstream
/// extension's catalog).
pub fn list_models() -> Vec<String> {
    vec![
        "AutoETS",
        "AutoARIMA",
        "AutoTheta",
        "AutoMFLES",
        "AutoMSTL",
        "AutoTBATS",
        "Naive",
        "SMA",
        "SeasonalNaive",
        "SES",
        "SESOptimized",
        "RandomWalkDrift",
        "Holt",
        "HoltWinters",
        "SeasonalES",
        "SeasonalESOptimized",
        "SeasonalWindowAverage",
        "Theta",
        "OptimizedTheta",
        "DynamicTheta",
        "DynamicOptimizedTheta",
        "ThetaX",
        "ETS",
        "ARIMA",
        "ARIMAX",
        "MFLES",
        "MSTL",
        "TBATS",
        "CrostonClassic",
        "CrostonOptimized",
        "CrostonSBA",
        "ADIDA",
        "IMAPA",
        "TSB",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_naive_produces_expected_horizon() {
        let values: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let options = ForecastOptions {
            model: ModelType::Naive,
            horizon: 3,
            ..Default::default()
        };
        let result = forecast(&values, &options).unwrap();
        assert_eq!(result.point.len(), 3);
        assert_eq!(result.model_name, "Naive");
        assert!(result.point.iter().all(|&v| (v - 5.0).abs() < 1e-9));
    }

    #[test]
    fn forecast_interpolates_nulls_before_fitting() {
        let values: Vec<Option<f64>> = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let options = ForecastOptions {
            model: ModelType::Naive,
            horizon: 1,
            ..Default::default()
        };
        let result = forecast(&values, &options).unwrap();
        assert_eq!(result.point.len(), 1);
    }

    #[test]
    fn forecast_rejects_too_short_series() {
        let values: Vec<Option<f64>> = vec![Some(1.0), Some(2.0)];
        let options = ForecastOptions::default();
        let err = forecast(&values, &options).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }

    #[test]
    fn forecast_ses_includes_fitted_and_residuals_when_requested() {
        let values: Vec<Option<f64>> =
            vec![10.0, 12.0, 9.0, 15.0, 11.0, 14.0].into_iter().map(Some).collect();
        let options = ForecastOptions {
            model: ModelType::SES,
            horizon: 2,
            include_fitted: true,
            include_residuals: true,
            ..Default::default()
        };
        let result = forecast(&values, &options).unwrap();
        assert!(result.fitted.is_some());
        assert!(result.residuals.is_some());
        assert!(result.mse.is_some());
    }

    #[test]
    fn forecast_intervals_widen_with_horizon() {
        let values: Vec<Option<f64>> = (0..20).map(|i| Some(10.0 + (i % 3) as f64)).collect();
        let options = ForecastOptions {
            model: ModelType::Naive,
            horizon: 5,
            ..Default::default()
        };
        let result = forecast(&values, &options).unwrap();
        let first_width = result.upper[0] - result.lower[0];
        let last_width = result.upper[4] - result.lower[4];
        assert!(last_width >= first_width);
    }

    #[test]
    fn forecast_ets_reports_information_criteria() {
        let values: Vec<Option<f64>> =
            (0..24).map(|i| Some(10.0 + 0.1 * i as f64)).collect();
        let options = ForecastOptions {
            model: ModelType::ETS,
            ets_spec: Some("AAN".to_string()),
            horizon: 3,
            ..Default::default()
        };
        let result = forecast(&values, &options).unwrap();
        assert!(result.aic.is_some());
        assert!(result.bic.is_some());
    }

    #[test]
    fn forecast_with_exog_switches_arima_to_arimax() {
        let values: Vec<Option<f64>> =
            (0..20).map(|i| Some(10.0 + i as f64 * 0.5)).collect();
        let exog = ExogenousData::new(
            vec![(0..20).map(|i| i as f64).collect()],
            vec![(20..24).map(|i| i as f64).collect()],
        );
        let options = ForecastOptionsExog {
            model: ModelType::AutoARIMA,
            horizon: 4,
            exog: Some(exog),
            ..Default::default()
        };
        let result = forecast_with_exog(&values, &options).unwrap();
        assert_eq!(result.point.len(), 4);
        assert_eq!(result.model_name, "ARIMAX");
    }

    #[test]
    fn forecast_with_exog_rejects_mfles() {
        let values: Vec<Option<f64>> = (0..12).map(|i| Some(i as f64)).collect();
        let exog = ExogenousData::new(
            vec![(0..12).map(|i| i as f64).collect()],
            vec![(12..15).map(|i| i as f64).collect()],
        );
        let options = ForecastOptionsExog {
            model: ModelType::MFLES,
            horizon: 3,
            exog: Some(exog),
            ..Default::default()
        };
        let err = forecast_with_exog(&values, &options).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn list_models_has_32_entries_and_every_name_parses() {
        let models = list_models();
        assert_eq!(models.len(), 32);
        for name in &models {
            assert!(name.parse::<ModelType>().is_ok(), "failed to parse {name}");
        }
    }
}
