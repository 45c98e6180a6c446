//! Min-Max Scaler.
//!
//! Transforms features by scaling each feature to a given range (default [0, 1]).
//!
//! The transformation is given by:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (max - min) + min
//! ```
//! and the result is clamped into `[min, max]`, so values outside the
//! fitted range never leave the feature range.
//!
//! # Example
//! ```rust
//! use featurecraft::data::FeatureMatrix;
//! use featurecraft::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//!
//! let data = FeatureMatrix::from_columns(vec![
//!     ("sqft".to_string(), vec![800.0, 1200.0, 2800.0]),
//! ]).unwrap();
//!
//! let fitted = MinMaxScaler::new().fit(&data).unwrap();
//! let scaled = fitted.transform(&data).unwrap();
//!
//! assert_eq!(scaled.to_rows(), vec![vec![0.0], vec![0.2], vec![1.0]]);
//! ```

use super::{handle_degenerate, present_columns, DegeneratePolicy};
use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// Configuration for MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinMaxScalerConfig {
    /// Minimum value of the target range.
    pub min: f64,
    /// Maximum value of the target range.
    pub max: f64,
    /// Handling of constant columns.
    pub degenerate: DegeneratePolicy,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            degenerate: DegeneratePolicy::Fail,
        }
    }
}

/// MinMaxScaler transformer (unfitted).
///
/// Transforms features by scaling each feature to a given range.
#[derive(Clone, Debug, Default)]
pub struct MinMaxScaler {
    config: MinMaxScalerConfig,
}

impl MinMaxScaler {
    /// Create a new MinMaxScaler with default range [0, 1].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MinMaxScaler from an explicit configuration.
    pub fn from_config(config: MinMaxScalerConfig) -> Self {
        Self { config }
    }

    /// Set the target range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.config.min = min;
        self.config.max = max;
        self
    }

    /// Set the handling of constant columns.
    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.config.degenerate = policy;
        self
    }
}

impl Transformer for MinMaxScaler {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;
    type Fitted = FittedMinMaxScaler;

    fn fit(&self, data: &FeatureMatrix) -> Result<FittedMinMaxScaler> {
        let (lo, hi) = (self.config.min, self.config.max);
        if !(lo < hi) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "MinMaxScaler range must satisfy min < max, got [{}, {}]",
                lo, hi
            )));
        }

        let present = present_columns(data, "MinMaxScaler")?;

        let mut data_min = Vec::with_capacity(present.len());
        let mut data_max = Vec::with_capacity(present.len());
        let mut passthrough = Vec::with_capacity(present.len());
        for (values, name) in present.iter().zip(data.columns()) {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            passthrough
                .push(max == min && handle_degenerate(self.config.degenerate, name, "MinMaxScaler")?);
            data_min.push(min);
            data_max.push(max);
        }

        tracing::debug!(
            columns = data_min.len(),
            range = ?(lo, hi),
            "fitted MinMaxScaler"
        );

        Ok(FittedMinMaxScaler {
            config: self.config.clone(),
            columns: data.columns().to_vec(),
            data_min,
            data_max,
            passthrough,
        })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedMinMaxScaler {
    config: MinMaxScalerConfig,
    columns: Vec<String>,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    /// Constant columns emitted unchanged.
    passthrough: Vec<bool>,
}

impl FittedMinMaxScaler {
    /// Get the minimum of each feature seen during fit.
    pub fn data_min(&self) -> &[f64] {
        &self.data_min
    }

    /// Get the maximum of each feature seen during fit.
    pub fn data_max(&self) -> &[f64] {
        &self.data_max
    }
}

impl FittedTransformer for FittedMinMaxScaler {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;

    fn transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.columns)?;

        let (lo, hi) = (self.config.min, self.config.max);
        let mut values = data.values().clone();
        for (j, mut column) in values.axis_iter_mut(Axis(1)).enumerate() {
            if self.passthrough[j] {
                continue;
            }
            let (min, range) = (self.data_min[j], self.data_max[j] - self.data_min[j]);
            // NaN survives clamp
            column.mapv_inplace(|x| ((x - min) / range * (hi - lo) + lo).clamp(lo, hi));
        }

        FeatureMatrix::new(values, self.columns.clone())
    }

    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.columns)?;

        let (lo, hi) = (self.config.min, self.config.max);
        let mut values = data.values().clone();
        for (j, mut column) in values.axis_iter_mut(Axis(1)).enumerate() {
            if self.passthrough[j] {
                continue;
            }
            let (min, range) = (self.data_min[j], self.data_max[j] - self.data_min[j]);
            column.mapv_inplace(|y| (y - lo) / (hi - lo) * range + min);
        }

        FeatureMatrix::new(values, self.columns.clone())
    }

    fn name(&self) -> &'static str {
        "MinMaxScaler"
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data() -> FeatureMatrix {
        // [[1, 10], [2, 20], [3, 40]]
        FeatureMatrix::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 40.0]],
        )
        .unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_minmax_scaler_fit() {
        let fitted = MinMaxScaler::new().fit(&create_test_data()).unwrap();
        assert_eq!(fitted.data_min(), &[1.0, 10.0]);
        assert_eq!(fitted.data_max(), &[3.0, 40.0]);
    }

    #[test]
    fn test_minmax_scaler_transform() {
        let out = MinMaxScaler::new().fit_transform(&create_test_data()).unwrap();
        let rows = out.to_rows();

        assert_eq!(rows[0], vec![0.0, 0.0]);
        assert_close(rows[1][0], 0.5);
        assert_close(rows[1][1], 1.0 / 3.0);
        assert_eq!(rows[2], vec![1.0, 1.0]);
    }

    #[test]
    fn test_minmax_scaler_clamps_out_of_range() {
        let fitted = MinMaxScaler::new().fit(&create_test_data()).unwrap();
        let test = FeatureMatrix::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![-5.0, 100.0]],
        )
        .unwrap();

        assert_eq!(fitted.transform(&test).unwrap().to_rows(), vec![vec![0.0, 1.0]]);
    }

    #[test]
    fn test_minmax_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = MinMaxScaler::new().fit(&data).unwrap();
        let back = fitted
            .inverse_transform(&fitted.transform(&data).unwrap())
            .unwrap();

        for (a, b) in back.values().iter().zip(data.values().iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_minmax_scaler_custom_range() {
        let out = MinMaxScaler::new()
            .with_range(-1.0, 1.0)
            .fit_transform(&create_test_data())
            .unwrap();
        assert_eq!(out.values().column(0).to_vec(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_minmax_scaler_invalid_range() {
        let result = MinMaxScaler::new()
            .with_range(1.0, 1.0)
            .fit(&create_test_data());
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_minmax_scaler_zero_range() {
        let data = FeatureMatrix::from_columns(vec![("c".to_string(), vec![5.0, 5.0])]).unwrap();

        assert!(matches!(
            MinMaxScaler::new().fit(&data),
            Err(PreprocessingError::DegenerateColumn { .. })
        ));

        let out = MinMaxScaler::new()
            .with_degenerate(DegeneratePolicy::PassThrough)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_minmax_scaler_inexact_constant_columns() {
        for value in [0.1, 1e10 + 0.1] {
            let data =
                FeatureMatrix::from_columns(vec![("c".to_string(), vec![value; 5])]).unwrap();

            assert!(matches!(
                MinMaxScaler::new().fit(&data),
                Err(PreprocessingError::DegenerateColumn { .. })
            ));
            let out = MinMaxScaler::new()
                .with_degenerate(DegeneratePolicy::PassThrough)
                .fit_transform(&data)
                .unwrap();
            assert_eq!(out, data);
        }
    }

    #[test]
    fn test_minmax_scaler_missing_values() {
        let data = FeatureMatrix::from_columns(vec![(
            "a".to_string(),
            vec![0.0, f64::NAN, 4.0],
        )])
        .unwrap();
        let out = MinMaxScaler::new().fit_transform(&data).unwrap();

        assert_eq!(out.get(2, 0), 1.0);
        assert!(out.get(1, 0).is_nan());
    }

    #[test]
    fn test_minmax_scaler_feature_mismatch() {
        let fitted = MinMaxScaler::new().fit(&create_test_data()).unwrap();
        let wrong = FeatureMatrix::from_columns(vec![("a".to_string(), vec![1.0])]).unwrap();

        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            fitted.inverse_transform(&wrong),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_minmax_scaler_empty_data() {
        let data = FeatureMatrix::empty(vec!["a".to_string()]).unwrap();
        assert!(MinMaxScaler::new().fit(&data).is_err());
    }

    #[test]
    fn test_minmax_scaler_from_config() {
        let config: MinMaxScalerConfig = serde_json::from_str(r#"{"min": 0.0, "max": 10.0}"#).unwrap();
        assert_eq!(config.degenerate, DegeneratePolicy::Fail);

        let out = MinMaxScaler::from_config(config)
            .fit_transform(&create_test_data())
            .unwrap();
        assert_eq!(out.get(1, 0), 5.0);
    }

    #[test]
    fn test_minmax_scaler_save_load_file() {
        let data = create_test_data();
        let fitted = MinMaxScaler::new().fit(&data).unwrap();

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fitted.save_to_file(temp_file.path()).unwrap();
        let loaded = FittedMinMaxScaler::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.data_min(), fitted.data_min());
        assert_eq!(
            loaded.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }
}
