//! The forecaster family (spec §4.3) — an in-house replacement for the
//! external forecasting crate the teacher originally depended on. Model
//! state is fit from a plain `&[f64]` (the wrapped `TimeSeries`'s primary
//! dimension); the polymorphic surface is a trait object + tagged enum,
//! per spec §9's note that the original's virtual-inheritance/dynamic-cast
//! model hierarchy should become trait objects in Rust.

pub mod arima;
pub mod ets;
pub mod holt;
pub mod intermittent;
pub mod mfles;
pub mod mstl;
pub mod naive;
mod regression;
pub mod ses;
pub mod tbats;
pub mod theta;

use std::str::FromStr;

use crate::error::{ForecastError, Result};

/// Every forecaster implements `fit`/`predict`; `name` identifies it for
/// logging, auto-selection reports, and FFI model-name round-trips.
pub trait Forecaster: std::fmt::Debug {
    /// Learn parameters from `values`. `predict` before `fit` is an error.
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Produce `horizon` point forecasts beyond the fitted series.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    fn name(&self) -> String;

    /// Bridges to the [`FittedValues`] capability for callers that only
    /// hold a `&dyn Forecaster` (the `forecast()` entry point,
    /// `validation::auto_select`). Models implementing `FittedValues`
    /// override this to `Some(self)`; the rest keep the default `None`.
    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        None
    }

    /// Bridges to the [`InformationCriteria`] capability, same rationale
    /// as [`Forecaster::as_fitted_values`].
    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        None
    }
}

/// Capability for models that retain in-sample one-step-ahead fitted
/// values (and therefore residuals). Not every model computes these
/// cheaply (e.g. `SeasonalWindowAverage` does not), so it is a separate
/// trait rather than a required part of `Forecaster`.
pub trait FittedValues {
    fn fitted_values(&self) -> Option<&[f64]>;

    fn residuals(&self, actual: &[f64]) -> Option<Vec<f64>> {
        self.fitted_values().map(|fitted| {
            actual
                .iter()
                .zip(fitted.iter())
                .map(|(a, f)| a - f)
                .collect()
        })
    }
}

/// Capability for models fit by maximum likelihood (ETS, ARIMA), used by
/// `AutoETS`/`AutoARIMA` candidate ranking and by `validation::auto_select`
/// when no explicit accuracy metric is configured.
pub trait InformationCriteria {
    fn log_likelihood(&self) -> Option<f64>;
    fn n_params(&self) -> usize;
    fn n_obs(&self) -> usize;

    fn aic(&self) -> Option<f64> {
        self.log_likelihood()
            .map(|ll| 2.0 * self.n_params() as f64 - 2.0 * ll)
    }

    fn bic(&self) -> Option<f64> {
        self.log_likelihood().map(|ll| {
            (self.n_params() as f64) * (self.n_obs() as f64).ln() - 2.0 * ll
        })
    }
}

/// Every forecaster this crate can build. Mirrors the C++ extension's
/// model catalog name-for-name; `MFLESX` is intentionally absent (see
/// `DESIGN.md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    AutoETS,
    AutoARIMA,
    AutoTheta,
    AutoMFLES,
    AutoMSTL,
    AutoTBATS,

    Naive,
    SMA,
    SeasonalNaive,
    SES,
    SESOptimized,
    RandomWalkDrift,

    Holt,
    HoltWinters,
    SeasonalES,
    SeasonalESOptimized,
    SeasonalWindowAverage,

    Theta,
    OptimizedTheta,
    DynamicTheta,
    DynamicOptimizedTheta,
    ThetaX,

    ETS,
    ARIMA,
    ARIMAX,

    MFLES,
    MSTL,
    TBATS,

    CrostonClassic,
    CrostonOptimized,
    CrostonSBA,
    ADIDA,
    IMAPA,
    TSB,
}

impl FromStr for ModelType {
    type Err = ForecastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AutoETS" => return Ok(ModelType::AutoETS),
            "AutoARIMA" => return Ok(ModelType::AutoARIMA),
            "AutoTheta" => return Ok(ModelType::AutoTheta),
            "AutoMFLES" => return Ok(ModelType::AutoMFLES),
            "AutoMSTL" => return Ok(ModelType::AutoMSTL),
            "AutoTBATS" => return Ok(ModelType::AutoTBATS),
            "Naive" => return Ok(ModelType::Naive),
            "SMA" => return Ok(ModelType::SMA),
            "SeasonalNaive" => return Ok(ModelType::SeasonalNaive),
            "SES" => return Ok(ModelType::SES),
            "SESOptimized" => return Ok(ModelType::SESOptimized),
            "RandomWalkDrift" | "RandomWalkWithDrift" => return Ok(ModelType::RandomWalkDrift),
            "Holt" => return Ok(ModelType::Holt),
            "HoltWinters" => return Ok(ModelType::HoltWinters),
            "SeasonalES" => return Ok(ModelType::SeasonalES),
            "SeasonalESOptimized" => return Ok(ModelType::SeasonalESOptimized),
            "SeasonalWindowAverage" => return Ok(ModelType::SeasonalWindowAverage),
            "Theta" => return Ok(ModelType::Theta),
            "OptimizedTheta" => return Ok(ModelType::OptimizedTheta),
            "DynamicTheta" => return Ok(ModelType::DynamicTheta),
            "DynamicOptimizedTheta" => return Ok(ModelType::DynamicOptimizedTheta),
            "ThetaX" => return Ok(ModelType::ThetaX),
            "ETS" => return Ok(ModelType::ETS),
            "ARIMA" => return Ok(ModelType::ARIMA),
            "ARIMAX" => return Ok(ModelType::ARIMAX),
            "MFLES" => return Ok(ModelType::MFLES),
            "MSTL" => return Ok(ModelType::MSTL),
            "TBATS" => return Ok(ModelType::TBATS),
            "CrostonClassic" => return Ok(ModelType::CrostonClassic),
            "CrostonOptimized" => return Ok(ModelType::CrostonOptimized),
            "CrostonSBA" => return Ok(ModelType::CrostonSBA),
            "ADIDA" => return Ok(ModelType::ADIDA),
            "IMAPA" => return Ok(ModelType::IMAPA),
            "TSB" => return Ok(ModelType::TSB),
            _ => {}
        }

        match s.to_lowercase().as_str() {
            "autoets" | "auto_ets" => Ok(ModelType::AutoETS),
            "autoarima" | "auto_arima" => Ok(ModelType::AutoARIMA),
            "autotheta" | "auto_theta" => Ok(ModelType::AutoTheta),
            "automfles" | "auto_mfles" => Ok(ModelType::AutoMFLES),
            "automstl" | "auto_mstl" => Ok(ModelType::AutoMSTL),
            "autotbats" | "auto_tbats" => Ok(ModelType::AutoTBATS),
            "naive" => Ok(ModelType::Naive),
            "sma" => Ok(ModelType::SMA),
            "seasonalnaive" | "seasonal_naive" | "snaive" => Ok(ModelType::SeasonalNaive),
            "ses" => Ok(ModelType::SES),
            "sesoptimized" | "ses_optimized" => Ok(ModelType::SESOptimized),
            "randomwalkdrift" | "random_walk_drift" | "rwd" | "drift" => {
                Ok(ModelType::RandomWalkDrift)
            }
            "holt" => Ok(ModelType::Holt),
            "holtwinters" | "holt_winters" | "hw" => Ok(ModelType::HoltWinters),
            "seasonales" | "seasonal_es" => Ok(ModelType::SeasonalES),
            "seasonalesoptimized" | "seasonal_es_optimized" => Ok(ModelType::SeasonalESOptimized),
            "seasonalwindowaverage" | "seasonal_window_average" | "swa" => {
                Ok(ModelType::SeasonalWindowAverage)
            }
            "theta" => Ok(ModelType::Theta),
            "optimizedtheta" | "optimized_theta" | "otm" => Ok(ModelType::OptimizedTheta),
            "dynamictheta" | "dynamic_theta" | "dstm" => Ok(ModelType::DynamicTheta),
            "dynamicoptimizedtheta" | "dynamic_optimized_theta" => {
                Ok(ModelType::DynamicOptimizedTheta)
            }
            "thetax" | "theta_x" => Ok(ModelType::ThetaX),
            "ets" => Ok(ModelType::ETS),
            "arima" => Ok(ModelType::ARIMA),
            "arimax" => Ok(ModelType::ARIMAX),
            "mfles" => Ok(ModelType::MFLES),
            "mstl" => Ok(ModelType::MSTL),
            "tbats" => Ok(ModelType::TBATS),
            "crostonclassic" | "croston_classic" | "croston" => Ok(ModelType::CrostonClassic),
            "crostonoptimized" | "croston_optimized" => Ok(ModelType::CrostonOptimized),
            "crostonsba" | "croston_sba" | "sba" => Ok(ModelType::CrostonSBA),
            "adida" => Ok(ModelType::ADIDA),
            "imapa" => Ok(ModelType::IMAPA),
            "tsb" => Ok(ModelType::TSB),
            "auto" => Ok(ModelType::AutoETS),
            _ => Err(ForecastError::InvalidModel(format!("Unknown model: {s}"))),
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::AutoETS => "AutoETS",
            ModelType::AutoARIMA => "AutoARIMA",
            ModelType::AutoTheta => "AutoTheta",
            ModelType::AutoMFLES => "AutoMFLES",
            ModelType::AutoMSTL => "AutoMSTL",
            ModelType::AutoTBATS => "AutoTBATS",
            ModelType::Naive => "Naive",
            ModelType::SMA => "SMA",
            ModelType::SeasonalNaive => "SeasonalNaive",
            ModelType::SES => "SES",
            ModelType::SESOptimized => "SESOptimized",
            ModelType::RandomWalkDrift => "RandomWalkDrift",
            ModelType::Holt => "Holt",
            ModelType::HoltWinters => "HoltWinters",
            ModelType::SeasonalES => "SeasonalES",
            ModelType::SeasonalESOptimized => "SeasonalESOptimized",
            ModelType::SeasonalWindowAverage => "SeasonalWindowAverage",
            ModelType::Theta => "Theta",
            ModelType::OptimizedTheta => "OptimizedTheta",
            ModelType::DynamicTheta => "DynamicTheta",
            ModelType::DynamicOptimizedTheta => "DynamicOptimizedTheta",
            ModelType::ThetaX => "ThetaX",
            ModelType::ETS => "ETS",
            ModelType::ARIMA => "ARIMA",
            ModelType::ARIMAX => "ARIMAX",
            ModelType::MFLES => "MFLES",
            ModelType::MSTL => "MSTL",
            ModelType::TBATS => "TBATS",
            ModelType::CrostonClassic => "CrostonClassic",
            ModelType::CrostonOptimized => "CrostonOptimized",
            ModelType::CrostonSBA => "CrostonSBA",
            ModelType::ADIDA => "ADIDA",
            ModelType::IMAPA => "IMAPA",
            ModelType::TSB => "TSB",
        }
    }

    /// True for the six `Auto*` candidate-search models.
    pub fn is_auto(&self) -> bool {
        matches!(
            self,
            ModelType::AutoETS
                | ModelType::AutoARIMA
                | ModelType::AutoTheta
                | ModelType::AutoMFLES
                | ModelType::AutoMSTL
                | ModelType::AutoTBATS
        )
    }
}

/// Options shared by every `build` call. `seasonal_period` of `0` or `1`
/// disables seasonal components; exogenous-capable models ignore `exog`
/// when it's `None`.
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub seasonal_period: usize,
    pub ets_spec: Option<String>,
    pub exog_historical: Vec<Vec<f64>>,
    pub exog_future: Vec<Vec<f64>>,
}

/// Construct a forecaster for `model`. The returned box is unfitted.
pub fn build(model: ModelType, options: &ModelOptions) -> Result<Box<dyn Forecaster>> {
    use arima::{Arima, ArimaX, AutoArima};
    use ets::{AutoEts, Ets};
    use holt::{Holt, HoltWinters, SeasonalEs, SeasonalWindowAverage};
    use intermittent::{Adida, CrostonClassic, CrostonOptimized, CrostonSba, Imapa, Tsb};
    use mfles::{AutoMfles, Mfles};
    use mstl::{AutoMstl, Mstl};
    use naive::{Naive, RandomWalkDrift, SeasonalNaive, Sma};
    use ses::{Ses, SesOptimized};
    use tbats::{AutoTbats, Tbats};
    use theta::{AutoTheta, DynamicOptimizedTheta, DynamicTheta, OptimizedTheta, Theta, ThetaX};

    let p = options.seasonal_period.max(1);

    Ok(match model {
        ModelType::Naive => Box::new(Naive::new()),
        ModelType::SMA => Box::new(Sma::new(p.max(3))),
        ModelType::SeasonalNaive => Box::new(SeasonalNaive::new(p)),
        ModelType::RandomWalkDrift => Box::new(RandomWalkDrift::new()),
        ModelType::SES => Box::new(Ses::fixed(0.3)),
        ModelType::SESOptimized => Box::new(SesOptimized::new()),
        ModelType::Holt => Box::new(Holt::fixed(0.3, 0.1, false)),
        ModelType::HoltWinters => Box::new(HoltWinters::new(p, false)),
        ModelType::SeasonalES => Box::new(SeasonalEs::fixed(p, 0.3, 0.1)),
        ModelType::SeasonalESOptimized => Box::new(SeasonalEs::optimized(p)),
        ModelType::SeasonalWindowAverage => Box::new(SeasonalWindowAverage::new(p)),
        ModelType::Theta => Box::new(Theta::new()),
        ModelType::OptimizedTheta => Box::new(OptimizedTheta::new()),
        ModelType::DynamicTheta => Box::new(DynamicTheta::new(p)),
        ModelType::DynamicOptimizedTheta => Box::new(DynamicOptimizedTheta::new(p)),
        ModelType::AutoTheta => Box::new(AutoTheta::new(p)),
        ModelType::ThetaX => Box::new(ThetaX::new(
            options.exog_historical.clone(),
            options.exog_future.clone(),
        )),
        ModelType::ETS => Box::new(Ets::from_spec(options.ets_spec.as_deref(), p)?),
        ModelType::AutoETS => Box::new(AutoEts::new(p)),
        ModelType::ARIMA => Box::new(Arima::new(1, 1, 1)),
        ModelType::AutoARIMA => Box::new(AutoArima::new()),
        ModelType::ARIMAX => Box::new(ArimaX::new(
            1,
            1,
            1,
            options.exog_historical.clone(),
            options.exog_future.clone(),
        )),
        ModelType::MFLES => Box::new(Mfles::new(p)),
        ModelType::AutoMFLES => Box::new(AutoMfles::new(p)),
        ModelType::MSTL => Box::new(Mstl::new(vec![p.max(2)])),
        ModelType::AutoMSTL => Box::new(AutoMstl::new()),
        ModelType::TBATS => Box::new(Tbats::new(vec![p.max(2)])),
        ModelType::AutoTBATS => Box::new(AutoTbats::new()),
        ModelType::CrostonClassic => Box::new(CrostonClassic::new()),
        ModelType::CrostonOptimized => Box::new(CrostonOptimized::new()),
        ModelType::CrostonSBA => Box::new(CrostonSba::new()),
        ModelType::ADIDA => Box::new(Adida::new(p.max(2))),
        ModelType::IMAPA => Box::new(Imapa::new()),
        ModelType::TSB => Box::new(Tsb::new()),
    })
}

pub(crate) fn require_non_empty(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(())
}
