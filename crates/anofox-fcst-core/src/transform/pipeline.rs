//! Chains multiple [`Transform`]s into a single reversible step.

use super::Transform;
use crate::error::Result;

/// Applies a sequence of transforms in order, and undoes them in reverse.
#[derive(Debug, Default)]
pub struct TransformPipeline {
    steps: Vec<Box<dyn Transform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(mut self, step: Box<dyn Transform>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fit and apply every step in pipeline order, feeding each step's
    /// output to the next.
    pub fn fit_transform(&mut self, values: &[f64]) -> Result<Vec<f64>> {
        let mut current = values.to_vec();
        for step in &mut self.steps {
            current = step.fit_transform(&current)?;
        }
        Ok(current)
    }

    /// Apply already-fitted steps in pipeline order.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        let mut current = values.to_vec();
        for step in &self.steps {
            current = step.transform(&current)?;
        }
        Ok(current)
    }

    /// Undo every step in reverse pipeline order.
    pub fn inverse_transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        let mut current = values.to_vec();
        for step in self.steps.iter().rev() {
            current = step.inverse(&current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Log, StandardScaler};
    use approx::assert_relative_eq;

    #[test]
    fn composes_and_reverses_two_steps() {
        let mut pipeline = TransformPipeline::new()
            .push(Box::new(Log::default()))
            .push(Box::new(StandardScaler::new()));

        let x = vec![1.0, 2.0, 4.0, 8.0, 16.0];
        let y = pipeline.fit_transform(&x).unwrap();
        let back = pipeline.inverse_transform(&y).unwrap();
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let mut pipeline = TransformPipeline::new();
        let x = vec![1.0, 2.0, 3.0];
        let y = pipeline.fit_transform(&x).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn transform_after_fit_matches_fit_transform() {
        let mut pipeline = TransformPipeline::new().push(Box::new(StandardScaler::new()));
        let train = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let fitted = pipeline.fit_transform(&train).unwrap();
        let replayed = pipeline.transform(&train).unwrap();
        assert_eq!(fitted, replayed);
    }
}
