//! Rolling-origin backtesting and accuracy-driven model selection
//! (spec §4.4). Failures are captured per fold / per candidate rather
//! than propagated, so one bad fold or one non-converging candidate
//! doesn't sink the whole run.

use crate::error::{ForecastError, Result};
use crate::metrics::{bias, mae, mase, mse, r2, rmse};
use crate::models::{Forecaster, InformationCriteria};

/// Whether the training window grows (`Expanding`, start fixed at 0) or
/// shifts forward with fixed length (`Sliding`) between folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Expanding,
    Sliding,
}

/// Rolling-backtest configuration.
#[derive(Debug, Clone)]
pub struct CvConfig {
    /// Forecast horizon evaluated at each fold.
    pub horizon: usize,
    /// Maximum number of folds to attempt.
    pub max_folds: usize,
    /// Minimum training window length before the first fold is cut.
    pub min_train: usize,
    /// Gap between train-end and test-start within a fold.
    pub gap: usize,
    /// Reserved buffer after a fold's test window before the next
    /// fold's train window is allowed to extend into it.
    pub embargo: usize,
    pub window_type: WindowType,
    /// How far the window advances between folds. Defaults to `horizon`.
    pub skip_length: usize,
    /// Evaluate a shorter final fold instead of dropping it when fewer
    /// than `horizon` observations remain past train-end + gap.
    pub clip_horizon: bool,
}

impl CvConfig {
    /// Sensible defaults: expanding window, no gap/embargo, skip length
    /// equal to the horizon, five folds, minimum training window twice
    /// the horizon.
    pub fn new(horizon: usize) -> Self {
        let horizon = horizon.max(1);
        Self {
            horizon,
            max_folds: 5,
            min_train: horizon * 2,
            gap: 0,
            embargo: 0,
            window_type: WindowType::Expanding,
            skip_length: horizon,
            clip_horizon: false,
        }
    }
}

/// One backtest fold's window boundaries (half-open index ranges into
/// the original series).
#[derive(Debug, Clone, Copy)]
pub struct Fold {
    pub index: usize,
    pub train_start: usize,
    pub train_end: usize,
    pub test_start: usize,
    pub test_end: usize,
}

/// Lays out folds per spec §4.4: the first fold's train window is the
/// smallest that satisfies `min_train`; each subsequent fold advances
/// by `skip_length`, respecting `window_type` and `embargo`. Stops
/// early once there isn't enough data left for another fold (or a
/// clipped one, unless `clip_horizon`).
fn plan_folds(n: usize, config: &CvConfig) -> Vec<Fold> {
    let mut folds = Vec::new();
    let mut train_start = 0usize;
    let mut train_end = config.min_train.max(1);
    let skip = config.skip_length.max(1);

    for index in 0..config.max_folds {
        let this_train_start = match config.window_type {
            WindowType::Expanding => 0,
            WindowType::Sliding => train_start,
        };
        if train_end <= this_train_start || train_end - this_train_start < config.min_train {
            break;
        }

        let test_start = train_end + config.gap;
        if test_start >= n {
            break;
        }
        let full_test_end = test_start + config.horizon;
        let test_end = if full_test_end <= n {
            full_test_end
        } else if config.clip_horizon {
            n
        } else {
            break;
        };
        if test_end <= test_start {
            break;
        }

        folds.push(Fold {
            index,
            train_start: this_train_start,
            train_end,
            test_start,
            test_end,
        });

        train_end += skip;
        if config.window_type == WindowType::Sliding {
            train_start += skip;
        }
        if train_end < test_end + config.embargo {
            train_end = test_end + config.embargo;
        }
    }

    folds
}

/// Accuracy metrics computed for one forecast against one actual
/// window (spec §4.4's accuracy metrics), shared between per-fold
/// backtest scoring and auto-selection holdout scoring.
#[derive(Debug, Clone, Default)]
pub struct AccuracyMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub bias: f64,
    pub mase: Option<f64>,
    pub r2: Option<f64>,
}

fn compute_accuracy(actual: &[f64], forecast: &[f64], baseline: Option<&[f64]>) -> Result<AccuracyMetrics> {
    Ok(AccuracyMetrics {
        mae: mae(actual, forecast)?,
        mse: mse(actual, forecast)?,
        rmse: rmse(actual, forecast)?,
        bias: bias(actual, forecast)?,
        mase: match baseline {
            Some(b) => mase(actual, forecast, b)?,
            None => None,
        },
        r2: r2(actual, forecast)?,
    })
}

/// Mean/stddev/min/max over one metric across folds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryStats {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            stddev: variance.sqrt(),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// One fold's outcome: the window it ran on plus its accuracy metrics.
#[derive(Debug, Clone)]
pub struct FoldResult {
    pub fold: Fold,
    pub metrics: AccuracyMetrics,
}

/// Per-fold metrics aggregated into an overall summary.
#[derive(Debug, Clone)]
pub struct BacktestSummary {
    pub mae: SummaryStats,
    pub mse: SummaryStats,
    pub rmse: SummaryStats,
    pub bias: SummaryStats,
    /// `None` when no fold had a baseline-relative score.
    pub mase: Option<SummaryStats>,
}

impl BacktestSummary {
    fn from_folds(folds: &[FoldResult]) -> Self {
        let mae: Vec<f64> = folds.iter().map(|f| f.metrics.mae).collect();
        let mse: Vec<f64> = folds.iter().map(|f| f.metrics.mse).collect();
        let rmse: Vec<f64> = folds.iter().map(|f| f.metrics.rmse).collect();
        let bias: Vec<f64> = folds.iter().map(|f| f.metrics.bias).collect();
        let mase: Vec<f64> = folds.iter().filter_map(|f| f.metrics.mase).collect();
        Self {
            mae: SummaryStats::from_values(&mae),
            mse: SummaryStats::from_values(&mse),
            rmse: SummaryStats::from_values(&rmse),
            bias: SummaryStats::from_values(&bias),
            mase: if mase.is_empty() {
                None
            } else {
                Some(SummaryStats::from_values(&mase))
            },
        }
    }
}

/// Outcome of a full rolling backtest: the folds that scored, the
/// folds that failed (index + error message, never propagated), and
/// the aggregate summary (absent only when every fold failed).
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub folds: Vec<FoldResult>,
    pub failures: Vec<(usize, String)>,
    pub summary: Option<BacktestSummary>,
}

fn run_fold<F, B>(values: &[f64], fold: &Fold, factory: &F, baseline_provider: Option<&B>) -> Result<AccuracyMetrics>
where
    F: Fn() -> Result<Box<dyn Forecaster>>,
    B: Fn(&[f64], usize) -> Vec<f64>,
{
    let train = &values[fold.train_start..fold.train_end];
    let test = &values[fold.test_start..fold.test_end];
    let horizon = test.len();

    let mut model = factory()?;
    model.fit(train)?;
    let forecast = model.predict(horizon)?;
    let baseline = baseline_provider.map(|provider| provider(train, horizon));
    compute_accuracy(test, &forecast, baseline.as_deref())
}

/// Runs a rolling-origin backtest of `values` under `config`, building a
/// fresh forecaster from `forecaster_factory` for every fold. When
/// `baseline_provider` is supplied it's called with each fold's training
/// window and horizon to produce a baseline forecast for MASE.
///
/// Fails only when not even one fold can be planned (series shorter
/// than `min_train + horizon`); individual fold failures are captured
/// in the result instead.
pub fn rolling_backtest<F, B>(
    values: &[f64],
    config: &CvConfig,
    forecaster_factory: F,
    baseline_provider: Option<B>,
) -> Result<BacktestResult>
where
    F: Fn() -> Result<Box<dyn Forecaster>>,
    B: Fn(&[f64], usize) -> Vec<f64>,
{
    let folds = plan_folds(values.len(), config);
    if folds.is_empty() {
        return Err(ForecastError::InsufficientData {
            needed: config.min_train + config.gap + config.horizon,
            got: values.len(),
        });
    }

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for fold in folds {
        match run_fold(values, &fold, &forecaster_factory, baseline_provider.as_ref()) {
            Ok(metrics) => results.push(FoldResult { fold, metrics }),
            Err(e) => {
                tracing::warn!(fold = fold.index, error = %e, "backtest fold failed, continuing with remaining folds");
                failures.push((fold.index, e.to_string()));
            }
        }
    }

    let summary = if results.is_empty() {
        None
    } else {
        Some(BacktestSummary::from_folds(&results))
    };

    Ok(BacktestResult {
        folds: results,
        failures,
        summary,
    })
}

/// A named, zero-argument forecaster factory, the unit of work in
/// `auto_select`.
pub struct Candidate {
    pub name: String,
    pub factory: Box<dyn Fn() -> Result<Box<dyn Forecaster>>>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, factory: impl Fn() -> Result<Box<dyn Forecaster>> + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }
}

/// Auto-selection configuration (spec §4.4). Defaults to scoring by
/// MAE with no backtest (holdout scoring only, which is a no-op unless
/// `actual` is set) and no preprocessing pipeline.
pub struct AutoSelectOptions<'a> {
    pub candidates: Vec<Candidate>,
    /// Scores a candidate's aggregate metrics; lower is better. `None`
    /// excludes the candidate from best-tracking without failing it.
    pub scorer: Box<dyn Fn(&AccuracyMetrics) -> Option<f64>>,
    /// Holdout actuals to score each candidate's full-series forecast
    /// against, when `backtest_config` is not set.
    pub actual: Option<&'a [f64]>,
    /// Holdout baseline forecast, for MASE in holdout scoring.
    pub baseline: Option<&'a [f64]>,
    /// Wraps every candidate's forecaster (e.g. in a `ForecasterPipeline`)
    /// before fitting.
    pub pipeline_factory: Option<Box<dyn Fn(Box<dyn Forecaster>) -> Box<dyn Forecaster>>>,
    /// When set, score candidates by rolling backtest instead of a
    /// single holdout split.
    pub backtest_config: Option<CvConfig>,
}

impl<'a> Default for AutoSelectOptions<'a> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            scorer: Box::new(|m| Some(m.mae)),
            actual: None,
            baseline: None,
            pipeline_factory: None,
            backtest_config: None,
        }
    }
}

/// One candidate's full outcome: its full-series forecast, information
/// criteria (when the model exposes them), whichever of backtest
/// summary / holdout metrics were computed, and the resulting score.
#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    pub name: String,
    pub forecast: Vec<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub backtest_summary: Option<BacktestSummary>,
    pub holdout_metrics: Option<AccuracyMetrics>,
    pub score: Option<f64>,
}

/// Result of `auto_select`: the winning candidate's name (by lowest
/// finite score, first-seen wins ties; falls back to the first
/// candidate that merely succeeded if none scored finite), every
/// candidate's outcome in the order supplied, and captured failures.
#[derive(Debug, Clone)]
pub struct AutoSelectResult {
    pub best_name: Option<String>,
    pub ranked: Vec<CandidateOutcome>,
    pub failures: Vec<(String, String)>,
}

fn run_candidate(values: &[f64], horizon: usize, candidate: &Candidate, options: &AutoSelectOptions) -> Result<CandidateOutcome> {
    let build = || -> Result<Box<dyn Forecaster>> {
        let model = (candidate.factory)()?;
        Ok(match &options.pipeline_factory {
            Some(wrap) => wrap(model),
            None => model,
        })
    };

    let mut model = build()?;
    model.fit(values)?;
    let forecast = model.predict(horizon)?;
    let (aic, bic) = model
        .as_information_criteria()
        .map(|ic| (ic.aic(), ic.bic()))
        .unwrap_or((None, None));

    let (backtest_summary, holdout_metrics) = if let Some(cv_config) = &options.backtest_config {
        let bt = rolling_backtest(values, cv_config, build, None::<fn(&[f64], usize) -> Vec<f64>>)?;
        (bt.summary, None)
    } else if let Some(actual) = options.actual {
        (None, Some(compute_accuracy(actual, &forecast, options.baseline)?))
    } else {
        (None, None)
    };

    let score = if let Some(summary) = &backtest_summary {
        (options.scorer)(&AccuracyMetrics {
            mae: summary.mae.mean,
            mse: summary.mse.mean,
            rmse: summary.rmse.mean,
            bias: summary.bias.mean,
            mase: summary.mase.map(|s| s.mean),
            r2: None,
        })
    } else {
        holdout_metrics.as_ref().and_then(|m| (options.scorer)(m))
    };

    Ok(CandidateOutcome {
        name: candidate.name.clone(),
        forecast,
        aic,
        bic,
        backtest_summary,
        holdout_metrics,
        score,
    })
}

/// Fits every candidate on the full series, scores each by backtest or
/// holdout (whichever `options` configures), and picks the best by
/// lowest finite score. A candidate whose factory, `fit`, or `predict`
/// fails is recorded in `failures` and excluded from ranking; the run
/// only fails outright when every candidate fails.
pub fn auto_select(values: &[f64], horizon: usize, options: AutoSelectOptions) -> Result<AutoSelectResult> {
    let mut ranked = Vec::new();
    let mut failures = Vec::new();

    for candidate in &options.candidates {
        match run_candidate(values, horizon, candidate, &options) {
            Ok(outcome) => ranked.push(outcome),
            Err(e) => {
                tracing::warn!(candidate = %candidate.name, error = %e, "auto-select candidate failed, continuing with remaining candidates");
                failures.push((candidate.name.clone(), e.to_string()));
            }
        }
    }

    if ranked.is_empty() {
        return Err(ForecastError::InternalError(
            "auto_select: every candidate failed".to_string(),
        ));
    }

    let mut best_idx: Option<usize> = None;
    for (i, outcome) in ranked.iter().enumerate() {
        let Some(score) = outcome.score else { continue };
        if !score.is_finite() {
            continue;
        }
        match best_idx {
            None => best_idx = Some(i),
            Some(b) if score < ranked[b].score.unwrap() => best_idx = Some(i),
            _ => {}
        }
    }

    let best_name = best_idx
        .map(|i| ranked[i].name.clone())
        .or_else(|| ranked.first().map(|o| o.name.clone()));

    Ok(AutoSelectResult {
        best_name,
        ranked,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::naive::{Naive, SeasonalNaive};
    use crate::models::arima::Arima;

    fn series(n: usize) -> Vec<f64> {
        (0..n).map(|i| 10.0 + i as f64).collect()
    }

    #[test]
    fn plan_folds_expanding_keeps_train_start_fixed() {
        let config = CvConfig::new(3);
        let folds = plan_folds(30, &config);
        assert!(!folds.is_empty());
        assert!(folds.iter().all(|f| f.train_start == 0));
        for w in folds.windows(2) {
            assert!(w[1].train_end > w[0].train_end);
        }
    }

    #[test]
    fn plan_folds_sliding_advances_train_start() {
        let mut config = CvConfig::new(3);
        config.window_type = WindowType::Sliding;
        let folds = plan_folds(30, &config);
        assert!(folds.len() >= 2);
        assert!(folds[1].train_start > folds[0].train_start);
    }

    #[test]
    fn plan_folds_contiguous_when_skip_equals_horizon() {
        let config = CvConfig::new(4);
        let folds = plan_folds(40, &config);
        for w in folds.windows(2) {
            assert_eq!(w[0].test_end, w[1].test_start);
        }
    }

    #[test]
    fn plan_folds_empty_when_series_too_short() {
        let config = CvConfig::new(5);
        let folds = plan_folds(3, &config);
        assert!(folds.is_empty());
    }

    #[test]
    fn rolling_backtest_scores_naive_on_a_trend_series() {
        let values = series(40);
        let config = CvConfig::new(3);
        let result = rolling_backtest(
            &values,
            &config,
            || Ok(Box::new(Naive::new()) as Box<dyn Forecaster>),
            None::<fn(&[f64], usize) -> Vec<f64>>,
        )
        .unwrap();
        assert!(!result.folds.is_empty());
        assert!(result.summary.is_some());
        assert!(result.summary.unwrap().mae.mean > 0.0);
    }

    #[test]
    fn rolling_backtest_captures_early_fold_failures_and_continues() {
        let values = series(40);
        let mut config = CvConfig::new(3);
        config.min_train = 4;
        config.max_folds = 8;
        let result = rolling_backtest(
            &values,
            &config,
            || Ok(Box::new(Arima::new(2, 1, 2)) as Box<dyn Forecaster>),
            None::<fn(&[f64], usize) -> Vec<f64>>,
        )
        .unwrap();
        assert!(!result.failures.is_empty(), "first fold should be too short for ARIMA(2,1,2)");
        assert!(!result.folds.is_empty(), "later folds should have grown enough to fit");
    }

    #[test]
    fn auto_select_picks_seasonal_naive_on_a_seasonal_series() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + (i % 7) as f64).collect();
        let options = AutoSelectOptions {
            candidates: vec![
                Candidate::new("Naive", || Ok(Box::new(Naive::new()) as Box<dyn Forecaster>)),
                Candidate::new("SeasonalNaive", || {
                    Ok(Box::new(SeasonalNaive::new(7)) as Box<dyn Forecaster>)
                }),
            ],
            backtest_config: Some(CvConfig::new(7)),
            ..Default::default()
        };
        let result = auto_select(&values, 7, options).unwrap();
        assert_eq!(result.best_name.as_deref(), Some("SeasonalNaive"));
        assert_eq!(result.ranked.len(), 2);
    }

    #[test]
    fn auto_select_captures_failures_and_still_returns_a_winner() {
        let values = series(10);
        let options = AutoSelectOptions {
            candidates: vec![
                Candidate::new("Naive", || Ok(Box::new(Naive::new()) as Box<dyn Forecaster>)),
                Candidate::new("TooBig", || Ok(Box::new(Arima::new(8, 2, 8)) as Box<dyn Forecaster>)),
            ],
            actual: Some(&[20.0, 21.0, 22.0]),
            ..Default::default()
        };
        let result = auto_select(&values, 3, options).unwrap();
        assert_eq!(result.best_name.as_deref(), Some("Naive"));
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].0, "TooBig");
    }
}
