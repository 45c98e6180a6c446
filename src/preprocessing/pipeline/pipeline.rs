//! Pipeline for chaining transformers.
//!
//! A pipeline starts with a head transformer that turns its input (records,
//! documents or an existing matrix) into a [`FeatureMatrix`]. Every following
//! stage is fitted on, and transforms, the output of the stage before it.
//!
//! # Example
//! ```ignore
//! use featurecraft::preprocessing::{OneHotEncoder, Pipeline, StandardScaler, Transformer};
//!
//! let pipeline = Pipeline::with_head(OneHotEncoder::new())
//!     .add_standard_scaler(StandardScaler::new());
//!
//! let fitted = pipeline.fit(&records)?;
//! let features = fitted.transform(&new_records)?;
//! ```

use crate::data::FeatureMatrix;
use crate::preprocessing::error::Result;
use crate::preprocessing::feature_engineering::{FittedPolynomialFeatures, PolynomialFeatures};
use crate::preprocessing::imputation::{FittedSimpleImputer, SimpleImputer};
use crate::preprocessing::scaling::{
    FittedMinMaxScaler, FittedStandardScaler, MinMaxScaler, StandardScaler,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};

/// A fitted matrix-to-matrix stage that can be part of a pipeline.
pub trait PipelineStep: Clone {
    /// Transform the data.
    fn transform_step(&self, data: &FeatureMatrix) -> Result<FeatureMatrix>;
    /// Inverse transform the data (if supported).
    fn inverse_transform_step(&self, data: &FeatureMatrix) -> Result<FeatureMatrix>;
    /// Get the step name for debugging.
    fn step_name(&self) -> &'static str;
}

/// A fitted step in the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PipelineStepEnum {
    /// SimpleImputer step.
    SimpleImputer(FittedSimpleImputer),
    /// StandardScaler step.
    StandardScaler(FittedStandardScaler),
    /// MinMaxScaler step.
    MinMaxScaler(FittedMinMaxScaler),
    /// PolynomialFeatures step.
    PolynomialFeatures(FittedPolynomialFeatures),
}

impl PipelineStep for PipelineStepEnum {
    fn transform_step(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.transform(data),
            PipelineStepEnum::StandardScaler(t) => t.transform(data),
            PipelineStepEnum::MinMaxScaler(t) => t.transform(data),
            PipelineStepEnum::PolynomialFeatures(t) => t.transform(data),
        }
    }

    fn inverse_transform_step(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.inverse_transform(data),
            PipelineStepEnum::StandardScaler(t) => t.inverse_transform(data),
            PipelineStepEnum::MinMaxScaler(t) => t.inverse_transform(data),
            PipelineStepEnum::PolynomialFeatures(t) => t.inverse_transform(data),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            PipelineStepEnum::SimpleImputer(t) => t.name(),
            PipelineStepEnum::StandardScaler(t) => t.name(),
            PipelineStepEnum::MinMaxScaler(t) => t.name(),
            PipelineStepEnum::PolynomialFeatures(t) => t.name(),
        }
    }
}

/// Builder for a fitted step (used during pipeline construction).
trait FittedStepBuilder: Clone {
    type Fitted: PipelineStep;
    fn fit(&self, data: &FeatureMatrix) -> Result<Self::Fitted>;
}

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum UnfittedStepEnum {
    SimpleImputer(SimpleImputer),
    StandardScaler(StandardScaler),
    MinMaxScaler(MinMaxScaler),
    PolynomialFeatures(PolynomialFeatures),
}

impl FittedStepBuilder for UnfittedStepEnum {
    type Fitted = PipelineStepEnum;

    fn fit(&self, data: &FeatureMatrix) -> Result<Self::Fitted> {
        match self {
            UnfittedStepEnum::SimpleImputer(t) => t.fit(data).map(PipelineStepEnum::SimpleImputer),
            UnfittedStepEnum::StandardScaler(t) => {
                t.fit(data).map(PipelineStepEnum::StandardScaler)
            }
            UnfittedStepEnum::MinMaxScaler(t) => t.fit(data).map(PipelineStepEnum::MinMaxScaler),
            UnfittedStepEnum::PolynomialFeatures(t) => {
                t.fit(data).map(PipelineStepEnum::PolynomialFeatures)
            }
        }
    }
}

impl From<SimpleImputer> for UnfittedStepEnum {
    fn from(t: SimpleImputer) -> Self {
        UnfittedStepEnum::SimpleImputer(t)
    }
}

impl From<StandardScaler> for UnfittedStepEnum {
    fn from(t: StandardScaler) -> Self {
        UnfittedStepEnum::StandardScaler(t)
    }
}

impl From<MinMaxScaler> for UnfittedStepEnum {
    fn from(t: MinMaxScaler) -> Self {
        UnfittedStepEnum::MinMaxScaler(t)
    }
}

impl From<PolynomialFeatures> for UnfittedStepEnum {
    fn from(t: PolynomialFeatures) -> Self {
        UnfittedStepEnum::PolynomialFeatures(t)
    }
}

/// Head for input that is already a [`FeatureMatrix`].
///
/// Fitting records the column names; transform checks them and hands the
/// matrix on unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Transformer for Passthrough {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;
    type Fitted = FittedPassthrough;

    fn fit(&self, data: &FeatureMatrix) -> Result<FittedPassthrough> {
        Ok(FittedPassthrough {
            columns: data.columns().to_vec(),
        })
    }
}

/// Fitted [`Passthrough`] head.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPassthrough {
    columns: Vec<String>,
}

impl FittedTransformer for FittedPassthrough {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;

    fn transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.columns)?;
        Ok(data.clone())
    }

    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.transform(data)
    }

    fn name(&self) -> &'static str {
        "Passthrough"
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.clone()
    }
}

/// Pipeline transformer (unfitted).
///
/// Chains a head transformer with matrix stages.
#[derive(Clone, Debug)]
pub struct Pipeline<H = Passthrough> {
    head: H,
    steps: Vec<UnfittedStepEnum>,
}

impl Default for Pipeline<Passthrough> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<Passthrough> {
    /// Create a new empty pipeline over numeric matrices.
    pub fn new() -> Self {
        Self::with_head(Passthrough)
    }
}

impl<H> Pipeline<H>
where
    H: Transformer<Output = FeatureMatrix>,
{
    /// Create a new empty pipeline whose first stage is `head`.
    pub fn with_head(head: H) -> Self {
        Self {
            head,
            steps: Vec::new(),
        }
    }

    /// Append any matrix stage.
    pub fn add_step(mut self, step: impl Into<UnfittedStepEnum>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Add a SimpleImputer to the pipeline.
    pub fn add_simple_imputer(self, imputer: SimpleImputer) -> Self {
        self.add_step(imputer)
    }

    /// Add a StandardScaler to the pipeline.
    pub fn add_standard_scaler(self, scaler: StandardScaler) -> Self {
        self.add_step(scaler)
    }

    /// Add a MinMaxScaler to the pipeline.
    pub fn add_minmax_scaler(self, scaler: MinMaxScaler) -> Self {
        self.add_step(scaler)
    }

    /// Add a PolynomialFeatures expansion to the pipeline.
    pub fn add_polynomial_features(self, poly: PolynomialFeatures) -> Self {
        self.add_step(poly)
    }

    /// Get the number of stages after the head.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline has no stages after the head.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fit every stage and return the fitted pipeline together with the
    /// transformed training data.
    pub(crate) fn fit_with_output(
        &self,
        data: &H::Input,
    ) -> Result<(FittedPipeline<H::Fitted>, FeatureMatrix)> {
        let head = self.head.fit(data)?;
        let mut current = head.transform(data)?;

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let fitted = step.fit(&current)?;
            current = fitted.transform_step(&current)?;
            fitted_steps.push(fitted);
        }

        let fitted = FittedPipeline {
            head,
            steps: fitted_steps,
            columns_out: current.columns().to_vec(),
        };

        tracing::info!(
            head = fitted.head.name(),
            steps = ?fitted.step_names(),
            rows = current.n_rows(),
            columns_out = current.n_columns(),
            "fitted pipeline"
        );

        Ok((fitted, current))
    }
}

impl<H> Transformer for Pipeline<H>
where
    H: Transformer<Output = FeatureMatrix>,
{
    type Input = H::Input;
    type Output = FeatureMatrix;
    type Fitted = FittedPipeline<H::Fitted>;

    fn fit(&self, data: &H::Input) -> Result<Self::Fitted> {
        self.fit_with_output(data).map(|(fitted, _)| fitted)
    }

    fn fit_transform(&self, data: &H::Input) -> Result<FeatureMatrix> {
        self.fit_with_output(data).map(|(_, output)| output)
    }
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPipeline<F> {
    head: F,
    steps: Vec<PipelineStepEnum>,
    columns_out: Vec<String>,
}

impl<F> FittedPipeline<F>
where
    F: FittedTransformer<Output = FeatureMatrix>,
{
    /// The fitted head transformer.
    pub fn head(&self) -> &F {
        &self.head
    }

    /// The fitted stages after the head, in order.
    pub fn steps(&self) -> &[PipelineStepEnum] {
        &self.steps
    }

    /// Get the number of stages after the head.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline has no stages after the head.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the names of all stages after the head.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

impl<F> FittedTransformer for FittedPipeline<F>
where
    F: FittedTransformer<Output = FeatureMatrix>,
{
    type Input = F::Input;
    type Output = FeatureMatrix;

    fn transform(&self, data: &F::Input) -> Result<FeatureMatrix> {
        let mut result = self.head.transform(data)?;
        for step in &self.steps {
            result = step.transform_step(&result)?;
        }
        Ok(result)
    }

    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<<F::Input as ToOwned>::Owned> {
        let mut result = data.clone();
        // Apply inverse transforms in reverse order
        for step in self.steps.iter().rev() {
            result = step.inverse_transform_step(&result)?;
        }
        self.head.inverse_transform(&result)
    }

    fn name(&self) -> &'static str {
        "Pipeline"
    }

    fn n_features_in(&self) -> usize {
        self.head.n_features_in()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns_out.clone()
    }
}
