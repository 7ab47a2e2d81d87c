//! ETS (Error, Trend, Seasonal) state-space exponential smoothing (spec
//! §4.3 "State Space Models"), grounded on the teacher's `ETSSpec`
//! notation (`is_valid_ets_notation`, `forecast_ets`) but fit entirely
//! in-house: smoothing parameters are chosen by Nelder-Mead minimizing
//! in-sample SSE, and `AIC`/`BIC` come from a Gaussian approximation to
//! the innovations log-likelihood rather than a true multiplicative-error
//! state-space likelihood.

use super::{require_non_empty, FittedValues, Forecaster, InformationCriteria};
use crate::error::{ForecastError, Result};
use crate::numerics::{minimize, NelderMeadConfig};

/// Parsed `[E][T][S]` or `[E][Td][S]` notation, e.g. `"AAA"`, `"MNM"`, `"AAdA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtsSpec {
    pub error: char,
    pub trend: char,
    pub damped: bool,
    pub season: char,
}

impl EtsSpec {
    pub fn from_notation(notation: &str) -> Result<Self> {
        let chars: Vec<char> = notation.chars().collect();
        let spec = match chars.len() {
            3 => Self {
                error: chars[0],
                trend: chars[1],
                damped: false,
                season: chars[2],
            },
            4 if chars[2] == 'd' => Self {
                error: chars[0],
                trend: chars[1],
                damped: true,
                season: chars[3],
            },
            _ => {
                return Err(ForecastError::InvalidInput(format!(
                    "invalid ETS notation '{notation}': expected [E][T][S] or [E][Td][S]"
                )))
            }
        };
        if !spec.is_syntactically_valid() {
            return Err(ForecastError::InvalidInput(format!(
                "invalid ETS notation '{notation}': E must be A/M, T must be A/M/N, S must be A/M/N"
            )));
        }
        if !spec.is_stable() {
            return Err(ForecastError::InvalidInput(format!(
                "ETS model specification '{notation}' is unstable (MA* combinations are excluded)"
            )));
        }
        Ok(spec)
    }

    fn is_syntactically_valid(&self) -> bool {
        matches!(self.error, 'A' | 'M')
            && matches!(self.trend, 'A' | 'M' | 'N')
            && matches!(self.season, 'A' | 'M' | 'N')
    }

    /// Rejects the combinations known to be numerically unstable (additive
    /// error with multiplicative trend).
    fn is_stable(&self) -> bool {
        !(self.error == 'M' && self.trend == 'A' && self.damped && self.season != 'N')
            && !(self.trend == 'M')
    }

    pub fn has_seasonal(&self) -> bool {
        self.season != 'N'
    }

    pub fn has_trend(&self) -> bool {
        self.trend != 'N'
    }

    pub fn short_name(&self) -> String {
        if self.damped {
            format!("{}{}d{}", self.error, self.trend, self.season)
        } else {
            format!("{}{}{}", self.error, self.trend, self.season)
        }
    }
}

impl Default for EtsSpec {
    fn default() -> Self {
        Self {
            error: 'A',
            trend: 'A',
            damped: false,
            season: 'A',
        }
    }
}

struct FitState {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    fitted: Vec<f64>,
}

fn run(values: &[f64], period: usize, spec: &EtsSpec, alpha: f64, beta: f64, gamma: f64, phi: f64) -> FitState {
    let p = period.max(1);
    let seasonal_mult = spec.season == 'M';
    let has_season = spec.has_seasonal() && p > 1 && values.len() >= 2 * p;
    if spec.has_seasonal() && !has_season {
        tracing::debug!(
            season_length = p,
            n_obs = values.len(),
            "ETS seasonal degraded to non-seasonal: season_length <= 1 or series shorter than 2*season_length"
        );
    }
    let has_trend = spec.has_trend();

    let init_n = if has_season { p } else { 1 };
    let initial_level = values[..init_n.min(values.len())].iter().sum::<f64>() / init_n.min(values.len()) as f64;
    let mut level = initial_level;
    let mut trend = if has_trend && values.len() > 1 {
        values[1] - values[0]
    } else {
        0.0
    };

    let mut seasonal: Vec<f64> = if has_season {
        values[..p]
            .iter()
            .map(|v| {
                if seasonal_mult {
                    v / initial_level.max(1e-6)
                } else {
                    v - initial_level
                }
            })
            .collect()
    } else {
        vec![if seasonal_mult { 1.0 } else { 0.0 }]
    };

    let start = if has_season { p } else { 1 };
    let mut fitted = vec![initial_level; start.min(values.len())];

    for (i, &v) in values.iter().enumerate().skip(start) {
        let s_idx = if has_season { i % p } else { 0 };
        let season = seasonal[s_idx];
        let trend_component = if has_trend { phi * trend } else { 0.0 };

        let point = if seasonal_mult && has_season {
            (level + trend_component) * season
        } else if has_season {
            level + trend_component + season
        } else {
            level + trend_component
        };
        fitted.push(point);

        let prev_level = level;
        let deseasonalized = if has_season {
            if seasonal_mult {
                v / season.max(1e-6)
            } else {
                v - season
            }
        } else {
            v
        };
        level = alpha * deseasonalized + (1.0 - alpha) * (level + trend_component);
        if has_trend {
            trend = beta * (level - prev_level) + (1.0 - beta) * phi * trend;
        }
        if has_season {
            seasonal[s_idx] = if seasonal_mult {
                gamma * (v / level.max(1e-6)) + (1.0 - gamma) * season
            } else {
                gamma * (v - level) + (1.0 - gamma) * season
            };
        }
    }

    FitState {
        level,
        trend,
        seasonal,
        fitted,
    }
}

fn n_free_params(spec: &EtsSpec) -> usize {
    let mut n = 2; // alpha + initial level
    if spec.has_trend() {
        n += 2; // beta + initial trend
        if spec.damped {
            n += 1;
        }
    }
    if spec.has_seasonal() {
        n += 2; // gamma + seasonal initial states (approximated as one group)
    }
    n
}

/// A single ETS model with an explicit (or default `AAA`) specification.
#[derive(Debug, Clone)]
pub struct Ets {
    spec: EtsSpec,
    period: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    phi: f64,
    state: Option<(f64, f64, Vec<f64>, usize)>,
    fitted: Vec<f64>,
    sse: f64,
    n_obs: usize,
}

impl Ets {
    pub fn from_spec(notation: Option<&str>, period: usize) -> Result<Self> {
        let spec = match notation {
            Some(n) => EtsSpec::from_notation(n)?,
            None => EtsSpec::default(),
        };
        Ok(Self {
            spec,
            period: period.max(1),
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            phi: if spec.damped { 0.9 } else { 1.0 },
            state: None,
            fitted: Vec::new(),
            sse: 0.0,
            n_obs: 0,
        })
    }

    pub fn spec(&self) -> EtsSpec {
        self.spec
    }
}

impl Forecaster for Ets {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let spec = self.spec;

        let mut initial = vec![0.3];
        let mut lower = vec![0.001];
        let mut upper = vec![0.999];
        if spec.has_trend() {
            initial.push(0.1);
            lower.push(0.001);
            upper.push(0.999);
            if spec.damped {
                initial.push(0.9);
                lower.push(0.8);
                upper.push(0.999);
            }
        }
        if spec.has_seasonal() {
            initial.push(0.1);
            lower.push(0.001);
            upper.push(0.999);
        }

        let period = self.period;
        let objective = |p: &[f64]| {
            let mut idx = 0;
            let alpha = p[idx];
            idx += 1;
            let (beta, phi) = if spec.has_trend() {
                let b = p[idx];
                idx += 1;
                let ph = if spec.damped {
                    let v = p[idx];
                    idx += 1;
                    v
                } else {
                    1.0
                };
                (b, ph)
            } else {
                (0.0, 1.0)
            };
            let gamma = if spec.has_seasonal() { p[idx] } else { 0.0 };
            let fit = run(values, period, &spec, alpha, beta, gamma, phi);
            values
                .iter()
                .zip(fit.fitted.iter())
                .map(|(a, f)| (a - f).powi(2))
                .sum::<f64>()
        };

        let result = minimize(
            objective,
            &initial,
            &lower,
            &upper,
            &NelderMeadConfig::default(),
        );

        let mut idx = 0;
        self.alpha = result.point[idx];
        idx += 1;
        if spec.has_trend() {
            self.beta = result.point[idx];
            idx += 1;
            if spec.damped {
                self.phi = result.point[idx];
                idx += 1;
            } else {
                self.phi = 1.0;
            }
        }
        if spec.has_seasonal() {
            self.gamma = result.point[idx];
        }

        let fit = run(values, period, &spec, self.alpha, self.beta, self.gamma, self.phi);
        self.sse = values
            .iter()
            .zip(fit.fitted.iter())
            .map(|(a, f)| (a - f).powi(2))
            .sum();
        self.n_obs = values.len();
        let n_season = fit.seasonal.len();
        self.fitted = fit.fitted;
        self.state = Some((fit.level, fit.trend, fit.seasonal, n_season));
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let (level, trend, seasonal, n_season) = self
            .state
            .as_ref()
            .ok_or_else(|| ForecastError::NotFitted("ETS".to_string(), "predict".to_string()))?;
        let p = (*n_season).max(1);
        let mut phi_sum = 0.0;
        Ok((1..=horizon)
            .map(|h| {
                phi_sum += self.phi.powi(h as i32);
                let trend_component = if self.spec.has_trend() { phi_sum * trend } else { 0.0 };
                if self.spec.has_seasonal() {
                    let season = seasonal[(self.n_obs + h - 1) % p];
                    if self.spec.season == 'M' {
                        (level + trend_component) * season
                    } else {
                        level + trend_component + season
                    }
                } else {
                    level + trend_component
                }
            })
            .collect())
    }

    fn name(&self) -> String {
        format!("ETS({})", self.spec.short_name())
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for Ets {
    fn fitted_values(&self) -> Option<&[f64]> {
        if self.fitted.is_empty() {
            None
        } else {
            Some(&self.fitted)
        }
    }
}

impl InformationCriteria for Ets {
    fn log_likelihood(&self) -> Option<f64> {
        if self.n_obs == 0 {
            return None;
        }
        let n = self.n_obs as f64;
        let sigma2 = (self.sse / n).max(1e-12);
        Some(-0.5 * n * (sigma2.ln() + (2.0 * std::f64::consts::PI).ln() + 1.0))
    }

    fn n_params(&self) -> usize {
        n_free_params(&self.spec)
    }

    fn n_obs(&self) -> usize {
        self.n_obs
    }
}

/// Searches the stable `[E][T][Td][S]` combinations (error fixed to `A`
/// for tractability) and keeps the one with the lowest AIC.
#[derive(Debug, Clone)]
pub struct AutoEts {
    period: usize,
    best: Option<Ets>,
}

impl AutoEts {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            best: None,
        }
    }

    pub fn selected_spec(&self) -> Option<EtsSpec> {
        self.best.as_ref().map(|m| m.spec())
    }

    fn candidate_notations(period: usize, n_obs: usize) -> Vec<&'static str> {
        let mut candidates = vec!["ANN", "AAN", "AAdN"];
        if period > 1 && n_obs >= 2 * period {
            candidates.extend(["ANA", "AAA", "AAdA"]);
        }
        candidates
    }

    fn fit_candidate(notation: &str, period: usize, values: &[f64]) -> Option<Ets> {
        let mut model = Ets::from_spec(Some(notation), period).ok()?;
        model.fit(values).ok()?;
        Some(model)
    }
}

impl Forecaster for AutoEts {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        require_non_empty(values)?;
        let candidates = Self::candidate_notations(self.period, values.len());
        let mut best: Option<Ets> = None;
        for notation in candidates {
            if let Some(candidate) = Self::fit_candidate(notation, self.period, values) {
                let candidate_aic = candidate.aic().unwrap_or(f64::INFINITY);
                let keep = match &best {
                    None => true,
                    Some(current) => candidate_aic < current.aic().unwrap_or(f64::INFINITY),
                };
                if keep {
                    best = Some(candidate);
                }
            }
        }
        self.best = Some(best.ok_or(ForecastError::InternalError(
            "AutoETS: no candidate model converged".to_string(),
        ))?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        self.best
            .as_ref()
            .ok_or_else(|| ForecastError::NotFitted("AutoETS".to_string(), "predict".to_string()))?
            .predict(horizon)
    }

    fn name(&self) -> String {
        match &self.best {
            Some(m) => format!("AutoETS({})", m.spec().short_name()),
            None => "AutoETS".to_string(),
        }
    }

    fn as_fitted_values(&self) -> Option<&dyn FittedValues> {
        Some(self)
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        Some(self)
    }
}

impl FittedValues for AutoEts {
    fn fitted_values(&self) -> Option<&[f64]> {
        self.best.as_ref().and_then(|m| m.fitted_values())
    }
}

impl InformationCriteria for AutoEts {
    fn log_likelihood(&self) -> Option<f64> {
        self.best.as_ref().and_then(|m| m.log_likelihood())
    }

    fn n_params(&self) -> usize {
        self.best.as_ref().map(|m| m.n_params()).unwrap_or(0)
    }

    fn n_obs(&self) -> usize {
        self.best.as_ref().map(|m| m.n_obs()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_and_four_char_notation() {
        assert_eq!(EtsSpec::from_notation("AAA").unwrap().damped, false);
        assert_eq!(EtsSpec::from_notation("AAdA").unwrap().damped, true);
    }

    #[test]
    fn rejects_malformed_notation() {
        assert!(EtsSpec::from_notation("XYZ").is_err());
        assert!(EtsSpec::from_notation("AA").is_err());
    }

    #[test]
    fn fits_and_predicts_default_spec() {
        let mut m = Ets::from_spec(None, 1).unwrap();
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        let fc = m.predict(3).unwrap();
        assert_eq!(fc.len(), 3);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn aic_is_finite_after_fit() {
        let mut m = Ets::from_spec(Some("ANN"), 1).unwrap();
        m.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(m.aic().unwrap().is_finite());
    }

    #[test]
    fn auto_ets_selects_a_model() {
        let values: Vec<f64> = (0..24).map(|i| 10.0 + i as f64 * 0.5).collect();
        let mut m = AutoEts::new(1);
        m.fit(&values).unwrap();
        assert!(m.selected_spec().is_some());
        let fc = m.predict(4).unwrap();
        assert_eq!(fc.len(), 4);
    }
}
