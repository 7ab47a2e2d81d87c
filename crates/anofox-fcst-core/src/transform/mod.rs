//! Reversible preprocessing transforms and the pipeline that chains them
//! (spec §4.2, new at this layer — the teacher has no analogue).
//!
//! A [`Transform`] learns its parameters from one series (`fit`), applies
//! itself forward (`transform`), and can undo itself exactly (`inverse`).
//! A [`TransformPipeline`] composes several transforms: `fit_transform`
//! applies them in pipeline order, `inverse_transform` undoes them in
//! reverse order, mirroring how the teacher's `Calendar`/series builders
//! are composed by method chaining rather than inheritance.

mod pipeline;
mod power;
mod scalers;
mod wrapper;

pub use pipeline::TransformPipeline;
pub use power::{BoxCox, YeoJohnson};
pub use scalers::{Log, Logit, MinMaxScaler, StandardScaler};
pub use wrapper::{ForecasterPipeline, LinearInterpolator};

use crate::error::Result;

/// A reversible, stateful preprocessing step over a single value dimension.
///
/// Implementations must satisfy `inverse(transform(x)) == x` (within
/// floating-point tolerance) after `fit`. `fit` is separate from
/// `transform` so a pipeline can be fit once on a training window and
/// applied identically to later windows during backtesting.
pub trait Transform: std::fmt::Debug {
    /// Learn parameters from `values`. Must be called before `transform`
    /// or `inverse`; re-fitting overwrites previous parameters.
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Apply the forward transform. Returns [`crate::error::ForecastError::NotFitted`]
    /// if called before `fit`.
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>>;

    /// Undo the forward transform.
    fn inverse(&self, values: &[f64]) -> Result<Vec<f64>>;

    /// Convenience: `fit` then `transform` in one call.
    fn fit_transform(&mut self, values: &[f64]) -> Result<Vec<f64>> {
        self.fit(values)?;
        self.transform(values)
    }
}

fn not_fitted(name: &str) -> crate::error::ForecastError {
    crate::error::ForecastError::NotFitted(name.to_string(), "transform".to_string())
}
