//! Feature engineering transformers for machine learning pipelines.
//!
//! Every transformer comes in two halves: an unfitted value holding
//! hyperparameters, and the fitted value that [`Transformer::fit`] returns.
//!
//! # Design Philosophy
//!
//! - **Type Safety**: Unfitted and fitted transformers are distinct types, so
//!   transforming with an unfitted transformer does not compile
//! - **Pure transforms**: Fitted parameters are frozen; transform never learns
//! - **Serializable**: Fitted transformers can be saved and loaded
//! - **sklearn-compatible**: API familiar to users of scikit-learn
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Encoding (records → matrix)
//! - [`OneHotEncoder`]: One binary column per category
//! - [`OrdinalEncoder`]: One integer code column per field
//!
//! ## Text (documents → matrix)
//! - [`TextVectorizer`]: Term counts or TF-IDF over a learned vocabulary
//!
//! ## Feature Engineering
//! - [`PolynomialFeatures`]: Polynomial and interaction terms
//!
//! ## Imputation
//! - [`SimpleImputer`]: Fill missing values with mean, median, most_frequent,
//!   constant, or forward/backward fill
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//! - [`MinMaxScaler`]: Scale to [0, 1] or custom range
//!
//! ## Pipeline
//! - [`Pipeline`]: Chain a head transformer with matrix stages
//! - [`PredictivePipeline`]: A pipeline plus a terminal estimator
//! - [`PipelineConfig`]: Build a pipeline from JSON
//!
//! # Example
//!
//! ```rust
//! use featurecraft::data::Dataset;
//! use featurecraft::preprocessing::{
//!     FeatureNaming, FittedTransformer, OneHotEncoder, Transformer,
//! };
//!
//! let data = Dataset::from_column("neighborhood", ["Fremont", "Queen Anne", "Fremont"]);
//!
//! let fitted = OneHotEncoder::new()
//!     .with_naming(FeatureNaming::ValueOnly)
//!     .fit(&data)
//!     .unwrap();
//! let encoded = fitted.transform(&data).unwrap();
//!
//! assert_eq!(encoded.columns(), &["Fremont", "Queen Anne"]);
//! assert_eq!(
//!     encoded.to_rows(),
//!     vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]
//! );
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod feature_engineering;
pub mod imputation;
pub mod pipeline;
pub mod predictive_pipeline;
pub mod scaling;
pub mod text;
pub mod traits;

// Re-export main types
pub use config::{PipelineConfig, StepConfig};
pub use encoding::{
    FeatureNaming, FittedOneHotEncoder, FittedOrdinalEncoder, HandleUnknown, OneHotEncoder,
    OrdinalEncoder,
};
pub use error::{PreprocessingError, Result};
pub use feature_engineering::{FittedPolynomialFeatures, PolynomialFeatures};
pub use imputation::{FillEdge, FittedSimpleImputer, ImputeStrategy, SimpleImputer};
pub use pipeline::{FittedPipeline, Passthrough, Pipeline, PipelineStep, PipelineStepEnum};
pub use predictive_pipeline::{FittedPredictivePipeline, PredictivePipeline};
pub use scaling::{
    DegeneratePolicy, FittedMinMaxScaler, FittedStandardScaler, MinMaxScaler, MinMaxScalerConfig,
    StandardScaler, StandardScalerConfig,
};
pub use text::{FittedTextVectorizer, Norm, Scoring, TextVectorizer, Tokenizer};
pub use traits::{FittedTransformer, Transformer};
