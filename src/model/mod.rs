//! Estimators that sit at the end of a predictive pipeline.
//!
//! An [`Estimator`] learns a mapping from a [`FeatureMatrix`] to one target
//! value per row. Unlike transformers, estimators are fitted in place: the
//! same value holds the hyperparameters and, after [`Estimator::fit`], the
//! learned coefficients. Calling `fit` again replaces them.

pub mod linear;

pub use linear::LinearRegression;

use crate::data::FeatureMatrix;
use crate::preprocessing::error::Result;
use ndarray::Array1;

/// A model that can be fitted on features and targets, then used for prediction.
pub trait Estimator {
    /// Short human-readable name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Learn from `x` (one row per sample) and `y` (one target per row).
    ///
    /// # Errors
    /// Returns [`PreprocessingError`](crate::preprocessing::PreprocessingError)
    /// if the target length differs from the row count, the features contain
    /// missing values, or the problem cannot be solved.
    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()>;

    /// Predict one value per row of `x`.
    ///
    /// # Errors
    /// Fails with `NotFitted` before [`fit`](Self::fit) has succeeded.
    fn predict(&self, x: &FeatureMatrix) -> Result<Array1<f64>>;
}
