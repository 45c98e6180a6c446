//! Scaling transformers for feature normalization.
//!
//! This module provides transformers that scale features to a common range
//! or distribution.
//!
//! # Available Transformers
//!
//! | Transformer | Description | Use Case |
//! |-------------|-------------|----------|
//! | [`StandardScaler`] | Z-score normalization (mean=0, std=1) | Default choice for most models |
//! | [`MinMaxScaler`] | Scale to [0, 1] or custom range | When bounded output is needed |
//!
//! Statistics are computed from non-missing cells only; missing cells stay
//! missing. A column whose standard deviation or range is zero is handled by
//! [`DegeneratePolicy`].
//!
//! # Example
//!
//! ```ignore
//! use featurecraft::preprocessing::scaling::{DegeneratePolicy, StandardScaler};
//! use featurecraft::preprocessing::Transformer;
//!
//! let scaler = StandardScaler::new().with_degenerate(DegeneratePolicy::PassThrough);
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&new_data)?;
//! ```

pub mod minmax;
pub mod standard;

pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerConfig};
pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerConfig};

use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// What a scaler does with a zero-variance or constant-range column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Fail with `DegenerateColumn`.
    #[default]
    Fail,
    /// Emit the column unchanged.
    PassThrough,
}

/// Non-missing values of every column, failing on empty data or a column
/// with nothing to learn from.
pub(crate) fn present_columns(data: &FeatureMatrix, scaler: &str) -> Result<Vec<Vec<f64>>> {
    if data.n_rows() == 0 {
        return Err(PreprocessingError::EmptyData(format!(
            "Cannot fit {} on empty data",
            scaler
        )));
    }

    data.values()
        .axis_iter(Axis(1))
        .zip(data.columns())
        .map(|(column, name)| {
            let present: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
            if present.is_empty() {
                Err(PreprocessingError::InsufficientData {
                    column: name.clone(),
                })
            } else {
                Ok(present)
            }
        })
        .collect()
}

/// True when every value is bit-for-bit the same as the first.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0].to_bits() == w[1].to_bits())
}

/// Apply `policy` to a degenerate column: `Ok(true)` means pass it through.
pub(crate) fn handle_degenerate(policy: DegeneratePolicy, column: &str, scaler: &str) -> Result<bool> {
    match policy {
        DegeneratePolicy::Fail => Err(PreprocessingError::DegenerateColumn {
            column: column.to_string(),
        }),
        DegeneratePolicy::PassThrough => {
            tracing::warn!(column, scaler, "degenerate column passed through unscaled");
            Ok(true)
        }
    }
}
