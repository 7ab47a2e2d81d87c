//! Core forecasting library for the anofox-forecast DuckDB extension.
//!
//! This crate provides the Rust implementation of time series analysis
//! and forecasting functions.

pub mod changepoint;
pub mod conformal;
pub mod error;
pub mod features;
pub mod filter;
pub mod forecast;
pub mod gaps;
pub mod imputation;
pub mod metrics;
pub mod models;
pub mod numerics;
pub mod peaks;
pub mod quality;
pub mod seasonality;
pub mod series;
pub mod stats;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use changepoint::{
    detect_changepoints, detect_changepoints_bocpd, BocpdResult, ChangepointResult, CostFunction,
};
pub use conformal::{
    // New Learn/Apply API (v2)
    conformal_apply,
    conformal_calibrate,
    conformal_evaluate,
    conformal_update_adaptive,
    // Legacy API (still available)
    conformal_intervals,
    conformal_predict,
    conformal_predict_adaptive,
    conformal_predict_asymmetric,
    conformal_predict_multi,
    conformal_quantile,
    interval_width,
    mean_interval_width,
    AdaptiveState,
    CalibrationProfile,
    ConformalEvaluation,
    ConformalInterval,
    ConformalMethod,
    ConformalMultiResult,
    ConformalResult,
    ConformalStrategy,
};
pub use error::{ForecastError, Result};
pub use features::{extract_features, list_features, validate_feature_params};
pub use filter::{
    diff, drop_edge_zeros, drop_leading_zeros, drop_trailing_zeros, is_constant, is_short,
};
pub use forecast::{
    forecast, forecast_with_exog, list_models, ExogenousData, ForecastOptions, ForecastOptionsExog,
    ForecastOutput, ModelType,
};
pub use gaps::{detect_frequency, fill_forward, fill_gaps};
pub use imputation::{
    fill_nulls_backward, fill_nulls_const, fill_nulls_forward, fill_nulls_interpolate,
    fill_nulls_mean,
};
pub use metrics::{
    bias, coverage, mae, mape, mase, mqloss, mse, quantile_loss, r2, rmae, rmse, smape,
    winkler_score,
};
pub use peaks::{
    analyze_peak_timing, detect_peaks, detect_peaks_default, get_peak_indices, get_peak_values,
    Peak, PeakDetectionResult, PeakTimingResult,
};
pub use numerics::periods::{
    aic_comparison, autoperiod, cfd_autoperiod, detect_multiple_periods_ts, detect_periods,
    estimate_period_acf_ts, estimate_period_fft_ts, estimate_period_regression_ts, lomb_scargle,
    matrix_profile_period, sazed_period, ssa_period, stl_period, AicPeriodResult, AutoperiodResult,
    DetectedPeriod, LombScargleResult, MatrixProfilePeriodResult, MultiPeriodResult, PeriodMethod,
    SazedPeriodResult, SinglePeriodResult, SsaPeriodResult, StlPeriodResult,
};
pub use quality::{
    compute_data_quality, generate_quality_report, DataQuality, QualityReport, QualityThresholds,
};
pub use seasonality::{analyze_seasonality, detect_seasonality, SeasonalityAnalysis};
pub use stats::{compute_ts_stats, TsStats};
