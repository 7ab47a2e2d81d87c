//! Bounded Nelder-Mead simplex minimizer (spec §4.6).
//!
//! Used by every model that fits smoothing/damping parameters by
//! minimizing an in-sample loss (SES-optimized, Holt, HoltWinters, ETS,
//! ARIMA's conditional-sum-of-squares, OptimizedTheta, AutoMFLES). There is
//! no dependency on an external optimizer crate: the loop is the textbook
//! reflect/expand/contract/shrink algorithm with bound-clamping on every
//! new vertex.

/// Configuration for a single minimization run.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub initial_step: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            initial_step: 0.1,
            tolerance: 1e-8,
            max_iterations: 500,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn clamp(point: &mut [f64], lower: &[f64], upper: &[f64]) {
    for i in 0..point.len() {
        point[i] = point[i].clamp(lower[i], upper[i]);
    }
}

fn simplex_stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

fn combine(a: &[f64], b: &[f64], coeff_a: f64, coeff_b: f64) -> Vec<f64> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| coeff_a * x + coeff_b * y)
        .collect()
}

/// Minimize `objective` starting at `initial`, with element-wise bounds.
///
/// Converges when the sample standard deviation of simplex objective
/// values drops below `config.tolerance`, or stops (with
/// `converged = false`) after `config.max_iterations` — the iteration cap
/// is the optimizer's only cancellation surrogate, per spec §5.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    lower: &[f64],
    upper: &[f64],
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    assert!(n > 0, "Nelder-Mead requires at least one parameter");

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for i in 0..n {
        let mut p = initial.to_vec();
        let step = if p[i].abs() > 1e-12 {
            p[i] * config.initial_step
        } else {
            config.initial_step
        };
        p[i] += step;
        clamp(&mut p, lower, upper);
        simplex.push(p);
    }

    let mut values: Vec<f64> = simplex.iter().map(|p| objective(p)).collect();
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        if simplex_stddev(&values) < config.tolerance {
            converged = true;
            break;
        }

        let worst = n;
        let centroid: Vec<f64> = (0..n_dim(&simplex))
            .map(|d| simplex[0..worst].iter().map(|p| p[d]).sum::<f64>() / worst as f64)
            .collect();

        let mut reflected = combine(&centroid, &simplex[worst], 1.0 + config.reflection, -config.reflection);
        clamp(&mut reflected, lower, upper);
        let reflected_value = objective(&reflected);

        if reflected_value < values[0] {
            let mut expanded = combine(&centroid, &reflected, 1.0 - config.expansion, config.expansion);
            clamp(&mut expanded, lower, upper);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
        } else if reflected_value < values[worst - 1] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
        } else {
            let shrink_toward = if reflected_value < values[worst] {
                &reflected
            } else {
                &simplex[worst]
            };
            let mut contracted = combine(&centroid, shrink_toward, 1.0 - config.contraction, config.contraction);
            clamp(&mut contracted, lower, upper);
            let contracted_value = objective(&contracted);
            if contracted_value < values[worst].min(reflected_value) {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
            } else {
                for i in 1..simplex.len() {
                    let mut shrunk = combine(&simplex[0], &simplex[i], 1.0 - config.shrink, config.shrink);
                    clamp(&mut shrunk, lower, upper);
                    values[i] = objective(&shrunk);
                    simplex[i] = shrunk;
                }
            }
        }

        iterations += 1;
    }

    let best_idx = (0..simplex.len())
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap();

    if !converged {
        tracing::debug!(
            iterations,
            max_iterations = config.max_iterations,
            best_value = values[best_idx],
            "Nelder-Mead hit max_iterations before tolerance"
        );
    }

    NelderMeadResult {
        point: simplex[best_idx].clone(),
        value: values[best_idx],
        iterations,
        converged,
    }
}

fn n_dim(simplex: &[Vec<f64>]) -> usize {
    simplex[0].len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimizes_sphere() {
        let result = minimize(
            |p| p.iter().map(|x| x * x).sum(),
            &[5.0, -3.0],
            &[-100.0, -100.0],
            &[100.0, 100.0],
            &NelderMeadConfig::default(),
        );
        assert_relative_eq!(result.point[0], 0.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn respects_bounds() {
        let result = minimize(
            |p| (p[0] - 10.0).powi(2),
            &[0.5],
            &[0.0],
            &[1.0],
            &NelderMeadConfig::default(),
        );
        assert!(result.point[0] <= 1.0 + 1e-9);
    }

    #[test]
    fn one_dimensional_quadratic() {
        let result = minimize(
            |p| (p[0] - 3.3).powi(2) + 1.0,
            &[0.0],
            &[-10.0],
            &[10.0],
            &NelderMeadConfig::default(),
        );
        assert_relative_eq!(result.point[0], 3.3, epsilon = 1e-3);
        assert_relative_eq!(result.value, 1.0, epsilon = 1e-3);
    }
}
