//! Declarative pipeline configuration.
//!
//! A [`PipelineConfig`] lists matrix stages as tagged JSON objects and builds
//! the matching [`Pipeline`]. Omitted fields take the same defaults as the
//! transformer builders.
//!
//! ```rust
//! use featurecraft::preprocessing::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{
//!     "steps": [
//!         {"type": "simple_imputer", "strategy": "Median"},
//!         {"type": "standard_scaler", "degenerate": "PassThrough"},
//!         {"type": "polynomial_features", "degree": 2}
//!     ]
//! }"#).unwrap();
//!
//! let pipeline = config.build().unwrap();
//! assert_eq!(pipeline.len(), 3);
//! ```

use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::feature_engineering::PolynomialFeatures;
use crate::preprocessing::imputation::{FillEdge, ImputeStrategy, SimpleImputer};
use crate::preprocessing::pipeline::{Passthrough, Pipeline, UnfittedStepEnum};
use crate::preprocessing::scaling::{
    MinMaxScaler, MinMaxScalerConfig, StandardScaler, StandardScalerConfig,
};
use crate::preprocessing::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_degree() -> usize {
    2
}

/// One matrix stage of a configured pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    SimpleImputer {
        #[serde(default)]
        strategy: ImputeStrategy,
        #[serde(default)]
        fill_edge: FillEdge,
        #[serde(default)]
        add_indicator: bool,
    },
    StandardScaler(StandardScalerConfig),
    MinMaxScaler(MinMaxScalerConfig),
    PolynomialFeatures {
        #[serde(default = "default_degree")]
        degree: usize,
        #[serde(default)]
        include_bias: bool,
        #[serde(default)]
        interaction_only: bool,
    },
}

impl StepConfig {
    /// Build the unfitted stage, rejecting hyperparameters that could never fit.
    pub fn build(&self) -> Result<UnfittedStepEnum> {
        let step: UnfittedStepEnum = match self {
            StepConfig::SimpleImputer {
                strategy,
                fill_edge,
                add_indicator,
            } => SimpleImputer::new(*strategy)
                .with_fill_edge(*fill_edge)
                .with_indicators(*add_indicator)
                .into(),
            StepConfig::StandardScaler(config) => StandardScaler::from_config(config.clone()).into(),
            StepConfig::MinMaxScaler(config) => {
                if !(config.min < config.max) {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "min_max_scaler range must satisfy min < max, got [{}, {}]",
                        config.min, config.max
                    )));
                }
                MinMaxScaler::from_config(config.clone()).into()
            }
            StepConfig::PolynomialFeatures {
                degree,
                include_bias,
                interaction_only,
            } => {
                if *degree == 0 {
                    return Err(PreprocessingError::InvalidParameter(
                        "polynomial_features degree must be at least 1".to_string(),
                    ));
                }
                PolynomialFeatures::new()
                    .with_degree(*degree)
                    .with_include_bias(*include_bias)
                    .with_interaction_only(*interaction_only)
                    .into()
            }
        };
        Ok(step)
    }
}

/// Ordered list of matrix stages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl PipelineConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a pipeline over numeric matrices.
    pub fn build(&self) -> Result<Pipeline<Passthrough>> {
        self.build_with_head(Passthrough)
    }

    /// Build a pipeline whose stages follow `head`.
    pub fn build_with_head<H>(&self, head: H) -> Result<Pipeline<H>>
    where
        H: Transformer<Output = FeatureMatrix>,
    {
        let pipeline = self
            .steps
            .iter()
            .try_fold(Pipeline::with_head(head), |pipeline, step| {
                Ok::<_, PreprocessingError>(pipeline.add_step(step.build()?))
            })?;

        tracing::debug!(steps = pipeline.len(), "built pipeline from config");
        Ok(pipeline)
    }
}
