//! Imputation transformers for handling missing values.
//!
//! This module provides transformers for imputing (filling in) missing values
//! in datasets.
//!
//! # Available Transformers
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`SimpleImputer`] | Impute with mean, median, most_frequent, constant, forward or backward fill |
//!
//! # Example
//!
//! ```ignore
//! use featurecraft::preprocessing::imputation::{FillEdge, SimpleImputer};
//! use featurecraft::preprocessing::{Transformer, ImputeStrategy};
//!
//! let imputer = SimpleImputer::new(ImputeStrategy::ForwardFill).with_fill_edge(FillEdge::Fail);
//! let fitted = imputer.fit(&data)?;
//! let imputed = fitted.transform(&new_data)?;
//! ```

pub mod simple;

pub use simple::{FillEdge, FittedSimpleImputer, ImputeStrategy, SimpleImputer};
