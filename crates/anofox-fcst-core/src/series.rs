//! The time series value object (L0 data model).
//!
//! A [`TimeSeries`] is the container every forecaster, transform, and
//! validation routine in this crate consumes: timestamps, one or more
//! value dimensions, and optional calendar/regressor/metadata annotations.
//! It is immutable once built; sanitization, interpolation, and slicing all
//! return a new `TimeSeries` rather than mutating in place.

use std::collections::HashMap;

use crate::error::{ForecastError, Result};

/// A single named holiday occurrence spanning `[start, end)` in the same
/// epoch-second units as [`TimeSeries`] timestamps.
#[derive(Debug, Clone)]
pub struct Holiday {
    pub name: String,
    pub start: i64,
    pub end: i64,
}

/// Calendar annotations: named holiday spans plus an opt-in weekend rule.
///
/// The holiday index is built once at construction (day-key -> bool) so
/// `is_holiday` is O(1); there is no lazy/mutable cache to invalidate.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    holidays: Vec<Holiday>,
    treat_weekends_as_holidays: bool,
    day_index: std::collections::HashSet<i64>,
}

const SECONDS_PER_DAY: i64 = 86_400;

impl Calendar {
    pub fn new(holidays: Vec<Holiday>, treat_weekends_as_holidays: bool) -> Result<Self> {
        for h in &holidays {
            if h.end <= h.start {
                return Err(ForecastError::InvalidInput(format!(
                    "holiday '{}' must have a strictly positive duration (start={}, end={})",
                    h.name, h.start, h.end
                )));
            }
        }
        let mut day_index = std::collections::HashSet::new();
        for h in &holidays {
            let first_day = h.start.div_euclid(SECONDS_PER_DAY);
            let last_day = (h.end - 1).div_euclid(SECONDS_PER_DAY);
            for day in first_day..=last_day {
                day_index.insert(day);
            }
        }
        Ok(Self {
            holidays,
            treat_weekends_as_holidays,
            day_index,
        })
    }

    fn is_weekend(day_key: i64) -> bool {
        // 1970-01-01 (epoch day 0) was a Thursday.
        let weekday = (day_key.rem_euclid(7) + 4) % 7;
        weekday == 5 || weekday == 6
    }

    /// True iff `t` falls inside any holiday occurrence, or `t`'s calendar
    /// day is flagged as a holiday day (including weekends when opted in).
    pub fn is_holiday(&self, t: i64) -> bool {
        let day_key = t.div_euclid(SECONDS_PER_DAY);
        if self.day_index.contains(&day_key) {
            return true;
        }
        self.treat_weekends_as_holidays && Self::is_weekend(day_key)
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Seconds of `t` that fall on a non-business day, for frequency
    /// inference's "subtract holiday spans from differences" step.
    fn holiday_seconds_in(&self, start: i64, end: i64) -> i64 {
        if start >= end {
            return 0;
        }
        let mut total = 0i64;
        let mut day = start.div_euclid(SECONDS_PER_DAY);
        let last_day = (end - 1).div_euclid(SECONDS_PER_DAY);
        while day <= last_day {
            if self.day_index.contains(&day) || (self.treat_weekends_as_holidays && Self::is_weekend(day)) {
                let day_start = day * SECONDS_PER_DAY;
                let day_end = day_start + SECONDS_PER_DAY;
                total += day_end.min(end) - day_start.max(start);
            }
            day += 1;
        }
        total
    }

    fn slice(&self, start: i64, end: i64) -> Self {
        let holidays: Vec<Holiday> = self
            .holidays
            .iter()
            .filter(|h| h.start < end && h.end > start)
            .cloned()
            .collect();
        Calendar::new(holidays, self.treat_weekends_as_holidays)
            .unwrap_or_else(|_| Calendar::default())
    }
}

/// Missing-value sanitization policy (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizePolicy {
    /// Fail if any non-finite value is present.
    Error,
    /// Keep only rows where every dimension is finite.
    Drop,
    /// Replace every non-finite value with a constant.
    FillValue,
    /// Replace each non-finite value with the most recent finite value in
    /// its own dimension; a leading run of non-finites uses the initial fill.
    ForwardFill,
}

/// The immutable time series value object.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<i64>,
    dims: Vec<Vec<f64>>,
    dim_names: Vec<String>,
    regressors: HashMap<String, Vec<f64>>,
    metadata: HashMap<String, String>,
    calendar: Option<Calendar>,
    frequency: Option<i64>,
}

impl TimeSeries {
    /// Build from a single value dimension.
    pub fn new(timestamps: Vec<i64>, values: Vec<f64>) -> Result<Self> {
        Self::from_dims(timestamps, vec![values], vec!["value".to_string()])
    }

    /// Build from multiple, already column-major, value dimensions.
    pub fn from_dims(
        timestamps: Vec<i64>,
        dims: Vec<Vec<f64>>,
        dim_names: Vec<String>,
    ) -> Result<Self> {
        if dims.is_empty() {
            return Err(ForecastError::InvalidInput(
                "a TimeSeries needs at least one value dimension".to_string(),
            ));
        }
        if dim_names.len() != dims.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{} dimension names given for {} dimensions",
                dim_names.len(),
                dims.len()
            )));
        }
        for (i, d) in dims.iter().enumerate() {
            if d.len() != timestamps.len() {
                return Err(ForecastError::InvalidInput(format!(
                    "dimension '{}' has {} values but there are {} timestamps",
                    dim_names[i],
                    d.len(),
                    timestamps.len()
                )));
            }
        }
        Self::validate_monotonic(&timestamps)?;
        Ok(Self {
            timestamps,
            dims,
            dim_names,
            regressors: HashMap::new(),
            metadata: HashMap::new(),
            calendar: None,
            frequency: None,
        })
    }

    /// Build from a row-major layout: one row per timestamp, each row
    /// holding one value per dimension. Fails on ragged rows.
    pub fn from_rows(
        timestamps: Vec<i64>,
        rows: Vec<Vec<f64>>,
        dim_names: Vec<String>,
    ) -> Result<Self> {
        if rows.len() != timestamps.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{} rows given for {} timestamps",
                rows.len(),
                timestamps.len()
            )));
        }
        let n_dims = dim_names.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_dims {
                return Err(ForecastError::InvalidInput(format!(
                    "row {} has {} values, expected {} (ragged layout)",
                    i,
                    row.len(),
                    n_dims
                )));
            }
        }
        let mut dims = vec![Vec::with_capacity(rows.len()); n_dims];
        for row in &rows {
            for (j, v) in row.iter().enumerate() {
                dims[j].push(*v);
            }
        }
        Self::from_dims(timestamps, dims, dim_names)
    }

    fn validate_monotonic(timestamps: &[i64]) -> Result<()> {
        for w in timestamps.windows(2) {
            if w[1] <= w[0] {
                return Err(ForecastError::InvalidInput(format!(
                    "timestamps must be strictly increasing and unique, found {} after {}",
                    w[1], w[0]
                )));
            }
        }
        Ok(())
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = Some(calendar);
        self.frequency = None;
        self
    }

    pub fn with_regressor(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.timestamps.len() {
            return Err(ForecastError::InvalidInput(
                "regressor length must match the series length".to_string(),
            ));
        }
        self.regressors.insert(name.into(), values);
        Ok(self)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn dim(&self, index: usize) -> &[f64] {
        &self.dims[index]
    }

    /// The primary (first) value dimension, as used by every univariate
    /// forecaster.
    pub fn values(&self) -> &[f64] {
        &self.dims[0]
    }

    pub fn dim_names(&self) -> &[String] {
        &self.dim_names
    }

    pub fn regressor(&self, name: &str) -> Option<&[f64]> {
        self.regressors.get(name).map(|v| v.as_slice())
    }

    pub fn regressors(&self) -> &HashMap<String, Vec<f64>> {
        &self.regressors
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    /// Row `i` across every dimension.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.dims.iter().map(|d| d[i]).collect()
    }

    /// A sub-view over `[start, end)`, re-slicing regressors and calendar.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidInput(format!(
                "slice range [{start}, {end}) out of bounds for series of length {}",
                self.len()
            )));
        }
        let timestamps = self.timestamps[start..end].to_vec();
        let dims: Vec<Vec<f64>> = self.dims.iter().map(|d| d[start..end].to_vec()).collect();
        let regressors: HashMap<String, Vec<f64>> = self
            .regressors
            .iter()
            .map(|(k, v)| (k.clone(), v[start..end].to_vec()))
            .collect();
        let calendar = self.calendar.as_ref().map(|c| {
            if end == start {
                c.slice(0, 0)
            } else {
                c.slice(timestamps[0], timestamps[timestamps.len() - 1] + 1)
            }
        });
        Ok(Self {
            timestamps,
            dims,
            dim_names: self.dim_names.clone(),
            regressors,
            metadata: self.metadata.clone(),
            calendar,
            frequency: None,
        })
    }

    /// Infer the canonical sampling frequency (spec §4.1).
    ///
    /// Differences are first reduced by any holiday span they cross (when a
    /// calendar is attached). If every reduced difference is within
    /// `tolerance` of the first, that difference is returned. Otherwise the
    /// last (up to) five differences are clustered by tolerance; the unique
    /// majority cluster's value is returned, or `None` if there is no
    /// unique majority. Non-positive differences cause a soft `None`.
    pub fn infer_frequency(&self, tolerance: f64) -> Option<i64> {
        if self.timestamps.len() < 2 {
            return None;
        }
        let diffs: Vec<i64> = self
            .timestamps
            .windows(2)
            .map(|w| {
                let raw = w[1] - w[0];
                match &self.calendar {
                    Some(cal) => raw - cal.holiday_seconds_in(w[0], w[1]),
                    None => raw,
                }
            })
            .collect();
        if diffs.iter().any(|&d| d <= 0) {
            return None;
        }

        let first = diffs[0] as f64;
        if diffs
            .iter()
            .all(|&d| ((d as f64) - first).abs() <= tolerance * first.max(1.0))
        {
            return Some(diffs[0]);
        }

        let tail: Vec<i64> = diffs.iter().rev().take(5).cloned().collect();
        let mut clusters: Vec<(i64, usize)> = Vec::new();
        for &d in &tail {
            if let Some(c) = clusters
                .iter_mut()
                .find(|(v, _)| ((*v as f64) - d as f64).abs() <= tolerance * (*v as f64).max(1.0))
            {
                c.1 += 1;
            } else {
                clusters.push((d, 1));
            }
        }
        clusters.sort_by(|a, b| b.1.cmp(&a.1));
        match clusters.as_slice() {
            [only] => Some(only.0),
            [best, second, ..] if best.1 > second.1 => Some(best.0),
            _ => None,
        }
    }

    /// Apply a missing-value sanitization policy, returning a new series.
    pub fn sanitize(&self, policy: SanitizePolicy, fill_value: f64) -> Result<Self> {
        match policy {
            SanitizePolicy::Error => {
                for d in &self.dims {
                    if d.iter().any(|v| !v.is_finite()) {
                        return Err(ForecastError::InvalidInput(
                            "series contains non-finite values under policy Error".to_string(),
                        ));
                    }
                }
                Ok(self.clone())
            }
            SanitizePolicy::Drop => {
                let keep: Vec<usize> = (0..self.len())
                    .filter(|&i| self.dims.iter().all(|d| d[i].is_finite()))
                    .collect();
                let timestamps: Vec<i64> = keep.iter().map(|&i| self.timestamps[i]).collect();
                let dims: Vec<Vec<f64>> = self
                    .dims
                    .iter()
                    .map(|d| keep.iter().map(|&i| d[i]).collect())
                    .collect();
                let regressors: HashMap<String, Vec<f64>> = self
                    .regressors
                    .iter()
                    .map(|(k, v)| (k.clone(), keep.iter().map(|&i| v[i]).collect()))
                    .collect();
                Ok(Self {
                    timestamps,
                    dims,
                    dim_names: self.dim_names.clone(),
                    regressors,
                    metadata: self.metadata.clone(),
                    calendar: self.calendar.clone(),
                    frequency: None,
                })
            }
            SanitizePolicy::FillValue => {
                let dims: Vec<Vec<f64>> = self
                    .dims
                    .iter()
                    .map(|d| {
                        d.iter()
                            .map(|&v| if v.is_finite() { v } else { fill_value })
                            .collect()
                    })
                    .collect();
                Ok(Self {
                    dims,
                    ..self.clone()
                })
            }
            SanitizePolicy::ForwardFill => {
                let dims: Vec<Vec<f64>> = self
                    .dims
                    .iter()
                    .map(|d| {
                        let mut last = fill_value;
                        d.iter()
                            .map(|&v| {
                                if v.is_finite() {
                                    last = v;
                                    v
                                } else {
                                    last
                                }
                            })
                            .collect()
                    })
                    .collect();
                Ok(Self {
                    dims,
                    ..self.clone()
                })
            }
        }
    }

    /// Linearly interpolate non-finite runs in every dimension. Leading and
    /// trailing runs use `edge_value` when `fill_edges`, else the nearest
    /// finite value; an all-non-finite dimension is filled uniformly with
    /// `edge_value`.
    pub fn interpolate(&self, fill_edges: bool, edge_value: f64) -> Self {
        let dims: Vec<Vec<f64>> = self
            .dims
            .iter()
            .map(|d| interpolate_linear(d, fill_edges, edge_value))
            .collect();
        Self {
            dims,
            ..self.clone()
        }
    }
}

/// Free-standing linear interpolation used both by [`TimeSeries::interpolate`]
/// and the `LinearInterpolator` transform.
pub fn interpolate_linear(values: &[f64], fill_edges: bool, edge_value: f64) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    if values.iter().all(|v| !v.is_finite()) {
        return vec![edge_value; n];
    }

    let mut out = values.to_vec();
    let first_finite = out.iter().position(|v| v.is_finite()).unwrap();
    let last_finite = out.iter().rposition(|v| v.is_finite()).unwrap();

    for v in out.iter_mut().take(first_finite) {
        *v = if fill_edges { edge_value } else { values[first_finite] };
    }
    for v in out.iter_mut().skip(last_finite + 1) {
        *v = if fill_edges { edge_value } else { values[last_finite] };
    }

    let mut i = first_finite;
    while i < last_finite {
        if out[i].is_finite() && !out[i + 1].is_finite() {
            let start = i;
            let mut end = i + 1;
            while end < last_finite && !out[end].is_finite() {
                end += 1;
            }
            // `end` is now finite (interior gap, bounded by last_finite).
            let span = (end - start) as f64;
            let (v0, v1) = (out[start], out[end]);
            for (k, item) in out.iter_mut().enumerate().take(end).skip(start + 1) {
                let frac = (k - start) as f64 / span;
                *item = v0 + (v1 - v0) * frac;
            }
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn construct_and_validate() {
        let ts = TimeSeries::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        let err = TimeSeries::new(vec![1, 1, 3], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = TimeSeries::new(vec![1, 2, 3], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn slice_preserves_order_and_regressors() {
        let ts = TimeSeries::new(vec![1, 2, 3, 4], vec![10.0, 20.0, 30.0, 40.0])
            .unwrap()
            .with_regressor("x", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();
        let s = ts.slice(1, 3).unwrap();
        assert_eq!(s.values(), &[20.0, 30.0]);
        assert_eq!(s.regressor("x").unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn infer_frequency_regular() {
        let ts = TimeSeries::new(vec![0, 86400, 172800, 259200], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(ts.infer_frequency(0.01), Some(86400));
    }

    #[test]
    fn infer_frequency_no_majority_is_none() {
        let ts = TimeSeries::new(vec![0, 10, 25, 50], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(ts.infer_frequency(0.01), None);
    }

    #[test]
    fn sanitize_error_on_clean_series_is_bit_equal() {
        let ts = TimeSeries::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]).unwrap();
        let out = ts.sanitize(SanitizePolicy::Error, 0.0).unwrap();
        assert_eq!(out.values(), ts.values());
    }

    #[test]
    fn sanitize_drop_keeps_subset_in_order() {
        let ts = TimeSeries::new(vec![1, 2, 3, 4], vec![1.0, f64::NAN, 3.0, f64::NAN]).unwrap();
        let out = ts.sanitize(SanitizePolicy::Drop, 0.0).unwrap();
        assert_eq!(out.timestamps(), &[1, 3]);
        assert_eq!(out.values(), &[1.0, 3.0]);
    }

    #[test]
    fn sanitize_forward_fill() {
        let ts = TimeSeries::new(vec![1, 2, 3, 4], vec![f64::NAN, 2.0, f64::NAN, f64::NAN]).unwrap();
        let out = ts.sanitize(SanitizePolicy::ForwardFill, -1.0).unwrap();
        assert_eq!(out.values(), &[-1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn interpolate_fills_interior_gap() {
        let v = vec![1.0, f64::NAN, f64::NAN, 4.0];
        let out = interpolate_linear(&v, false, 0.0);
        assert_relative_eq!(out[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(out[2], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn interpolate_edges_nearest_by_default() {
        let v = vec![f64::NAN, 2.0, 3.0, f64::NAN];
        let out = interpolate_linear(&v, false, 0.0);
        assert_relative_eq!(out[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(out[3], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn interpolate_all_nan_uses_edge_value() {
        let v = vec![f64::NAN, f64::NAN];
        let out = interpolate_linear(&v, true, 7.0);
        assert_eq!(out, vec![7.0, 7.0]);
    }

    #[test]
    fn calendar_holiday_lookup() {
        let cal = Calendar::new(
            vec![Holiday {
                name: "test".to_string(),
                start: 0,
                end: SECONDS_PER_DAY,
            }],
            false,
        )
        .unwrap();
        assert!(cal.is_holiday(100));
        assert!(!cal.is_holiday(SECONDS_PER_DAY + 100));
    }

    #[test]
    fn calendar_rejects_non_positive_duration() {
        let err = Calendar::new(
            vec![Holiday {
                name: "bad".to_string(),
                start: 10,
                end: 10,
            }],
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }
}
