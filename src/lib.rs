//! # featurecraft
//!
//! Type-safe feature engineering in Rust: turn raw records, free text and
//! numeric tables into dense feature matrices, with a strict separation
//! between fitting and inference.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: `fit` learns parameters from training data
//!   and returns a new fitted value; `transform` is a pure function of those
//!   frozen parameters and its input.
//! - **Named Columns**: every transformer produces a [`data::FeatureMatrix`]
//!   whose column names say where each feature came from.
//! - **Explicit Policies**: unseen categories, degenerate columns and
//!   unfillable gaps are handled by configured policies, never silently.
//! - **Persistence**: every fitted transformer, pipeline and estimator can be
//!   written to bytes with `bincode` and restored later.
//!
//! ## Quick Start
//!
//! ```rust
//! use featurecraft::data::FeatureMatrix;
//! use featurecraft::preprocessing::{
//!     FittedTransformer, ImputeStrategy, Pipeline, SimpleImputer, StandardScaler, Transformer,
//! };
//!
//! let train = FeatureMatrix::from_columns(vec![
//!     ("age".to_string(), vec![1.0, f64::NAN, 3.0, 3.0, 4.0, 8.0]),
//! ]).unwrap();
//!
//! let pipeline = Pipeline::new()
//!     .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Mean))
//!     .add_standard_scaler(StandardScaler::new());
//!
//! let fitted = pipeline.fit(&train).unwrap();
//! let features = fitted.transform(&train).unwrap();
//! assert!(!features.has_missing());
//! ```
//!
//! ## Module Structure
//!
//! - `data` — Raw values, records, datasets, CSV loading and `FeatureMatrix`
//! - `preprocessing` — Encoders, text vectorizer, polynomial features,
//!   imputer, scalers, pipelines and their configuration
//! - `model` — Estimators that terminate a predictive pipeline
//! - `serialization` — Byte encoding of fitted parameters

/// Raw records and numeric feature matrices.
pub mod data;

/// Estimators fitted on the output of a pipeline.
pub mod model;

/// Feature engineering transformers and pipelines.
pub mod preprocessing;

/// Persistence of fitted parameters.
pub mod serialization;

/// Re-export of core types for convenient usage.
pub use data::{Dataset, FeatureMatrix, Record, Value};
pub use preprocessing::{FittedTransformer, PreprocessingError, Transformer};
