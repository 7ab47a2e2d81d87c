//! The linear-interpolation transform step, and the `ForecasterPipeline`
//! wrapper that composes a [`TransformPipeline`] with a forecaster by
//! composition rather than inheritance (spec §4.2/§9 redesign notes).

use super::{pipeline::TransformPipeline, Transform};
use crate::error::Result;
use crate::models::{Forecaster, InformationCriteria};
use crate::series::interpolate_linear;

/// Fills non-finite runs via linear interpolation. Not a reversible
/// transform in the usual sense — the original gap pattern is lost — so
/// `inverse` is the identity; it exists so interpolation can sit in a
/// [`TransformPipeline`] alongside the scaling and power transforms.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolator {
    fill_edges: bool,
    edge_value: f64,
}

impl LinearInterpolator {
    pub fn new(fill_edges: bool, edge_value: f64) -> Self {
        Self {
            fill_edges,
            edge_value,
        }
    }
}

impl Default for LinearInterpolator {
    fn default() -> Self {
        Self::new(false, 0.0)
    }
}

impl Transform for LinearInterpolator {
    fn fit(&mut self, _values: &[f64]) -> Result<()> {
        Ok(())
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        Ok(interpolate_linear(values, self.fill_edges, self.edge_value))
    }

    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>> {
        Ok(values.to_vec())
    }
}

/// A forecaster composed with a preprocessing pipeline: the pipeline's
/// `fit_transform` output is what the wrapped forecaster sees during
/// `fit`, and its forecasts are passed back through `inverse_transform`
/// before being returned.
#[derive(Debug)]
pub struct ForecasterPipeline {
    pipeline: TransformPipeline,
    forecaster: Box<dyn Forecaster>,
}

impl ForecasterPipeline {
    pub fn new(pipeline: TransformPipeline, forecaster: Box<dyn Forecaster>) -> Self {
        Self {
            pipeline,
            forecaster,
        }
    }

    pub fn fit(&mut self, values: &[f64]) -> Result<()> {
        let transformed = self.pipeline.fit_transform(values)?;
        self.forecaster.fit(&transformed)
    }

    pub fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let raw = self.forecaster.predict(horizon)?;
        self.pipeline.inverse_transform(&raw)
    }

    pub fn forecaster(&self) -> &dyn Forecaster {
        self.forecaster.as_ref()
    }
}

/// Lets a pipeline-wrapped model stand in anywhere a plain `Forecaster`
/// is expected — auto-selection candidates, backtest factories — per
/// spec §4.4's "optional pipeline-factory to wrap every candidate".
/// `FittedValues` is intentionally not bridged: the wrapped model's
/// fitted values live in transformed space, and inverse-transforming
/// them losslessly isn't always possible (e.g. after interpolation).
impl Forecaster for ForecasterPipeline {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        ForecasterPipeline::fit(self, values)
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        ForecasterPipeline::predict(self, horizon)
    }

    fn name(&self) -> String {
        format!("Pipeline({})", self.forecaster.name())
    }

    fn as_information_criteria(&self) -> Option<&dyn InformationCriteria> {
        self.forecaster.as_information_criteria()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::naive::Naive;
    use crate::transform::StandardScaler;
    use approx::assert_relative_eq;

    #[test]
    fn interpolator_fills_gaps() {
        let mut t = LinearInterpolator::default();
        let y = t.fit_transform(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_relative_eq!(y[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn pipeline_wraps_naive_forecaster() {
        let pipeline = TransformPipeline::new().push(Box::new(StandardScaler::new()));
        let mut wrapped = ForecasterPipeline::new(pipeline, Box::new(Naive::new()));
        wrapped.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let fc = wrapped.predict(3).unwrap();
        assert_eq!(fc.len(), 3);
        for v in fc {
            assert_relative_eq!(v, 5.0, epsilon = 1e-6);
        }
    }
}
