//! Predictive pipeline combining preprocessing and model inference.
//!
//! This module provides a unified wrapper for a complete ML pipeline that
//! combines a preprocessing [`Pipeline`] with a terminal [`Estimator`].

use crate::data::FeatureMatrix;
use crate::model::Estimator;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::pipeline::{FittedPipeline, Pipeline};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::SerializableParams;
use ndarray::Array1;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Preprocessing pipeline plus an unfitted estimator.
///
/// # Example
/// ```rust
/// use featurecraft::data::FeatureMatrix;
/// use featurecraft::model::LinearRegression;
/// use featurecraft::preprocessing::pipeline::Pipeline;
/// use featurecraft::preprocessing::{PredictivePipeline, StandardScaler};
///
/// let x = FeatureMatrix::from_columns(vec![
///     ("sqft".to_string(), vec![800.0, 1200.0, 1600.0]),
/// ]).unwrap();
/// let prices = [200.0, 300.0, 400.0];
///
/// let pipeline = Pipeline::new().add_standard_scaler(StandardScaler::new());
/// let fitted = PredictivePipeline::new(pipeline, LinearRegression::new())
///     .fit(&x, &prices)
///     .unwrap();
///
/// let predicted = fitted.predict(&x).unwrap();
/// assert!((predicted[2] - 400.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct PredictivePipeline<H, E> {
    pipeline: Pipeline<H>,
    estimator: E,
}

impl<H, E> PredictivePipeline<H, E>
where
    H: Transformer<Output = FeatureMatrix>,
    E: Estimator + Clone,
{
    /// Create a new predictive pipeline.
    pub fn new(pipeline: Pipeline<H>, estimator: E) -> Self {
        Self {
            pipeline,
            estimator,
        }
    }

    /// Fit the preprocessing stages, then the estimator on their output.
    ///
    /// The unfitted value is left untouched; the estimator is cloned before
    /// fitting.
    pub fn fit(
        &self,
        data: &H::Input,
        targets: &[f64],
    ) -> Result<FittedPredictivePipeline<H::Fitted, E>> {
        let (pipeline, features) = self.pipeline.fit_with_output(data)?;
        if features.n_rows() != targets.len() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} targets", features.n_rows()),
                got: format!("{} targets", targets.len()),
            });
        }

        let mut estimator = self.estimator.clone();
        estimator.fit(&features, targets)?;

        tracing::info!(
            estimator = estimator.name(),
            rows = features.n_rows(),
            features = features.n_columns(),
            "fitted predictive pipeline"
        );

        Ok(FittedPredictivePipeline {
            pipeline,
            estimator,
        })
    }
}

/// Fitted preprocessing stages plus a trained estimator.
///
/// The entire pipeline can be serialized and loaded for deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPredictivePipeline<F, E> {
    pipeline: FittedPipeline<F>,
    estimator: E,
}

impl<F, E> FittedPredictivePipeline<F, E>
where
    F: FittedTransformer<Output = FeatureMatrix>,
    E: Estimator,
{
    /// The fitted preprocessing stages.
    pub fn pipeline(&self) -> &FittedPipeline<F> {
        &self.pipeline
    }

    /// The trained estimator.
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Preprocess data without calling the estimator.
    pub fn transform(&self, data: &F::Input) -> Result<FeatureMatrix> {
        self.pipeline.transform(data)
    }

    /// Make predictions on new data.
    pub fn predict(&self, data: &F::Input) -> Result<Array1<f64>> {
        let features = self.transform(data)?;
        self.estimator.predict(&features)
    }
}

impl<F, E> FittedPredictivePipeline<F, E>
where
    F: FittedTransformer<Output = FeatureMatrix>,
    E: Estimator + Serialize + DeserializeOwned,
{
    /// Save the entire pipeline to a file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = SerializableParams::to_bytes(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a pipeline from a file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(<Self as SerializableParams>::from_bytes(&bytes)?)
    }
}
