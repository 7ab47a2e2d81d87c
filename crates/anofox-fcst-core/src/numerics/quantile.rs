//! Shared linear-interpolation quantile helper.
//!
//! Used by conformal calibration and the descriptive `stats` module so the
//! interpolation convention (same as NumPy's default `linear` method) is
//! defined exactly once.

/// The `p`-quantile (`p` in `[0, 1]`) of `sorted`, which must already be
/// sorted ascending.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let n = sorted.len() as f64;
    let idx = p.clamp(0.0, 1.0) * (n - 1.0);
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;
    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// The `p`-quantile of an unsorted slice (sorts a copy).
pub fn quantile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_sorted(&sorted, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn median_of_odd_length() {
        assert_relative_eq!(quantile(&[3.0, 1.0, 2.0], 0.5), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn interpolates_between_points() {
        assert_relative_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.25), 1.75, epsilon = 1e-9);
    }
}
