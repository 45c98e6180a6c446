//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; holds hyperparameters and learns from data.
//! - [`FittedTransformer`]: After fitting; frozen parameters, ready for inference and serialization.
//!
//! Fitting never mutates the unfitted transformer: every call to
//! [`Transformer::fit`] produces a brand-new fitted value, so re-fitting
//! cannot accumulate state from earlier fits.

use crate::preprocessing::error::{PreprocessingError, Result};
use crate::serialization::SerializableParams;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Type Parameters
/// - `Input`: Data consumed by fit and transform (records, documents, or a matrix).
/// - `Output`: Data produced by transform (typically [`FeatureMatrix`](crate::data::FeatureMatrix)).
/// - `Fitted`: The corresponding fitted transformer type.
///
/// # Example
/// ```ignore
/// use featurecraft::preprocessing::{Transformer, FittedTransformer, StandardScaler};
///
/// let scaler = StandardScaler::new();
/// let fitted = scaler.fit(&train)?;
/// let transformed = fitted.transform(&test)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type.
    type Input: ?Sized + ToOwned;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty, a column cannot
    /// yield a statistic, or hyperparameters are invalid.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// The fitted value is plain data: it can be cloned, serialized with
/// `serde`, and written to disk with [`save_to_file`](Self::save_to_file).
pub trait FittedTransformer: Clone + Serialize + DeserializeOwned {
    /// Input data type.
    type Input: ?Sized + ToOwned;
    /// Output data type.
    type Output;

    /// Transform data using the frozen parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input columns or fields differ
    /// from what was seen during fit, or a value cannot be encoded.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Reverse the transformation, if supported.
    ///
    /// The default implementation reports the operation as unsupported.
    fn inverse_transform(
        &self,
        _data: &Self::Output,
    ) -> Result<<Self::Input as ToOwned>::Owned> {
        Err(PreprocessingError::InvalidParameter(format!(
            "{} does not support inverse_transform",
            self.name()
        )))
    }

    /// Short human-readable name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Number of input features (columns or fields) seen during fit.
    fn n_features_in(&self) -> usize;

    /// Names of the produced columns, in output order.
    fn feature_names_out(&self) -> Vec<String>;

    /// Serialize the fitted parameters to bytes.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(SerializableParams::to_bytes(self)?)
    }

    /// Restore a fitted transformer from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(<Self as SerializableParams>::from_bytes(bytes)?)
    }

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
