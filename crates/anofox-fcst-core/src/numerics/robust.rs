//! Robust linear regression via Siegel's repeated medians (spec §4.6).
//!
//! Used where a forecaster needs a trend line that resists outliers more
//! than ordinary least squares, e.g. MFLES's global trend estimate.

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Slope and intercept of a Siegel repeated-medians fit of `y` on `x`.
///
/// `slope = median_i(median_{j != i}((y_j - y_i) / (x_j - x_i)))`;
/// `intercept = median(y - slope * x)`. Divisions by `|dx| < 1e-10` are
/// guarded by substituting a zero slope for that pair.
pub fn siegel_repeated_medians(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len();
    if n < 2 {
        return (0.0, y.first().copied().unwrap_or(0.0));
    }

    let mut inner_medians = Vec::with_capacity(n);
    for i in 0..n {
        let mut slopes = Vec::with_capacity(n - 1);
        for j in 0..n {
            if i == j {
                continue;
            }
            let dx = x[j] - x[i];
            let slope = if dx.abs() < 1e-10 {
                0.0
            } else {
                (y[j] - y[i]) / dx
            };
            slopes.push(slope);
        }
        inner_medians.push(median(&mut slopes));
    }

    let slope = median(&mut inner_medians);
    let mut intercepts: Vec<f64> = x.iter().zip(y.iter()).map(|(&xi, &yi)| yi - slope * xi).collect();
    let intercept = median(&mut intercepts);
    (slope, intercept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 3.0).collect();
        let (slope, intercept) = siegel_repeated_medians(&x, &y);
        assert_relative_eq!(slope, 2.0, epsilon = 1e-9);
        assert_relative_eq!(intercept, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn resists_a_single_outlier() {
        let x: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let mut y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 3.0).collect();
        *y.last_mut().unwrap() += 1000.0;
        let (slope, intercept) = siegel_repeated_medians(&x, &y);
        assert_relative_eq!(slope, 2.0, epsilon = 0.2);
        assert_relative_eq!(intercept, 3.0, epsilon = 2.0);
    }

    #[test]
    fn duplicate_x_guards_division() {
        let x = vec![1.0, 1.0, 2.0];
        let y = vec![5.0, 5.0, 7.0];
        let (slope, _) = siegel_repeated_medians(&x, &y);
        assert!(slope.is_finite());
    }
}
