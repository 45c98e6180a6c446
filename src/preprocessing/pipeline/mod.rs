//! Pipeline utilities for chaining transformers.
//!
//! This module provides tools for combining a head transformer and several
//! matrix stages into a single value that can be fitted and used for
//! inference.
//!
//! # Available Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Head transformer followed by sequential matrix stages |
//! | [`Passthrough`] | Head for data that is already a [`FeatureMatrix`](crate::data::FeatureMatrix) |
//!
//! # Example
//!
//! ```rust
//! use featurecraft::data::FeatureMatrix;
//! use featurecraft::preprocessing::pipeline::Pipeline;
//! use featurecraft::preprocessing::{
//!     FittedTransformer, ImputeStrategy, MinMaxScaler, SimpleImputer, Transformer,
//! };
//!
//! let data = FeatureMatrix::from_columns(vec![
//!     ("sqft".to_string(), vec![800.0, f64::NAN, 2800.0]),
//! ]).unwrap();
//!
//! let pipeline = Pipeline::new()
//!     .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Mean))
//!     .add_minmax_scaler(MinMaxScaler::new());
//!
//! let fitted = pipeline.fit(&data).unwrap();
//! assert_eq!(fitted.step_names(), vec!["SimpleImputer", "MinMaxScaler"]);
//! assert_eq!(fitted.transform(&data).unwrap().to_rows(), vec![vec![0.0], vec![0.5], vec![1.0]]);
//! ```

#[allow(clippy::module_inception)]
pub mod pipeline;

pub use pipeline::{
    FittedPassthrough, FittedPipeline, Passthrough, Pipeline, PipelineStep, PipelineStepEnum,
    UnfittedStepEnum,
};
