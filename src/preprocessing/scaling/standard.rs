//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation (ddof = 0).
//!
//! # Example
//! ```ignore
//! use featurecraft::preprocessing::{FittedStandardScaler, FittedTransformer, Transformer, StandardScaler};
//!
//! let scaler = StandardScaler::new()
//!     .with_mean(true)
//!     .with_std(true);
//!
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//!
//! // Later, for inference:
//! fitted.save_to_file("scaler.bin")?;
//! let loaded = FittedStandardScaler::load_from_file("scaler.bin")?;
//! let new_scaled = loaded.transform(&new_data)?;
//! ```

use super::{handle_degenerate, is_constant, present_columns, DegeneratePolicy};
use crate::data::FeatureMatrix;
use crate::preprocessing::error::Result;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
    /// Handling of zero-variance columns.
    pub degenerate: DegeneratePolicy,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
            degenerate: DegeneratePolicy::Fail,
        }
    }
}

/// StandardScaler transformer (unfitted).
///
/// Transforms features by removing the mean and scaling to unit variance.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a StandardScaler from an explicit configuration.
    pub fn from_config(config: StandardScalerConfig) -> Self {
        Self { config }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Set the handling of zero-variance columns.
    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.config.degenerate = policy;
        self
    }
}

impl Transformer for StandardScaler {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &FeatureMatrix) -> Result<FittedStandardScaler> {
        let present = present_columns(data, "StandardScaler")?;

        let mut mean = Vec::with_capacity(present.len());
        let mut std = Vec::with_capacity(present.len());
        let mut passthrough = Vec::with_capacity(present.len());
        for (values, name) in present.iter().zip(data.columns()) {
            let n = values.len() as f64;
            let (m, s) = if is_constant(values) {
                // the summed mean of a repeated inexact value can drift off it
                (values[0], 0.0)
            } else {
                let m = values.iter().sum::<f64>() / n;
                // population std (ddof=0)
                let s = (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n).sqrt();
                (m, s)
            };

            // rounding noise of the mean, not spread in the data
            let noise = f64::EPSILON * m.abs().max(1.0) * n.sqrt();
            let degenerate = self.config.with_std && s <= noise;
            passthrough.push(
                degenerate && handle_degenerate(self.config.degenerate, name, "StandardScaler")?,
            );
            mean.push(m);
            std.push(s);
        }

        tracing::debug!(
            columns = mean.len(),
            passthrough = passthrough.iter().filter(|&&p| p).count(),
            "fitted StandardScaler"
        );

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            columns: data.columns().to_vec(),
            mean,
            std,
            passthrough,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    columns: Vec<String>,
    mean: Vec<f64>,
    std: Vec<f64>,
    /// Degenerate columns emitted unchanged.
    passthrough: Vec<bool>,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    fn apply(&self, data: &FeatureMatrix, forward: bool) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.columns)?;

        let mut values = data.values().clone();
        for (j, mut column) in values.axis_iter_mut(Axis(1)).enumerate() {
            if self.passthrough[j] {
                continue;
            }
            let shift = if self.config.with_mean { self.mean[j] } else { 0.0 };
            let scale = if self.config.with_std { self.std[j] } else { 1.0 };
            if forward {
                column.mapv_inplace(|x| (x - shift) / scale);
            } else {
                column.mapv_inplace(|z| z * scale + shift);
            }
        }

        FeatureMatrix::new(values, self.columns.clone())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;

    fn transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.apply(data, true)
    }

    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.apply(data, false)
    }

    fn name(&self) -> &'static str {
        "StandardScaler"
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
    use crate::preprocessing::error::PreprocessingError;

    fn create_test_data() -> FeatureMatrix {
        // [[1, 2], [3, 4], [5, 6]]
        FeatureMatrix::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
        .unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        assert_eq!(fitted.mean(), &[3.0, 4.0]);
        // population std of [1, 3, 5] = sqrt(8/3)
        assert_close(fitted.std()[0], (8.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_standard_scaler_transform() {
        let data = create_test_data();
        let out = StandardScaler::new().fit_transform(&data).unwrap();

        for column in out.values().axis_iter(Axis(1)) {
            let mean = column.sum() / 3.0;
            let var = column.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 3.0;
            assert_close(mean, 0.0);
            assert_close(var, 1.0);
        }
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let back = fitted
            .inverse_transform(&fitted.transform(&data).unwrap())
            .unwrap();

        for (a, b) in back.values().iter().zip(data.values().iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_standard_scaler_without_mean() {
        let data = create_test_data();
        let out = StandardScaler::new()
            .with_mean(false)
            .fit_transform(&data)
            .unwrap();
        assert_close(out.get(0, 0), 1.0 / (8.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_standard_scaler_without_std() {
        let data = create_test_data();
        let out = StandardScaler::new()
            .with_std(false)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(out.to_rows(), vec![vec![-2.0, -2.0], vec![0.0, 0.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn test_standard_scaler_missing_values_ignored() {
        let data = FeatureMatrix::from_columns(vec![(
            "a".to_string(),
            vec![1.0, f64::NAN, 3.0],
        )])
        .unwrap();
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let out = fitted.transform(&data).unwrap();

        assert_eq!(fitted.mean(), &[2.0]);
        assert_close(out.get(0, 0), -1.0);
        assert!(out.get(1, 0).is_nan());
    }

    #[test]
    fn test_standard_scaler_constant_feature_fails() {
        let data = FeatureMatrix::from_columns(vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("c".to_string(), vec![7.0, 7.0]),
        ])
        .unwrap();

        match StandardScaler::new().fit(&data) {
            Err(PreprocessingError::DegenerateColumn { column }) => assert_eq!(column, "c"),
            other => panic!("expected DegenerateColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_standard_scaler_constant_feature_pass_through() {
        let data = FeatureMatrix::from_columns(vec![
            ("a".to_string(), vec![1.0, 3.0]),
            ("c".to_string(), vec![7.0, 7.0]),
        ])
        .unwrap();

        let out = StandardScaler::new()
            .with_degenerate(DegeneratePolicy::PassThrough)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(out.to_rows(), vec![vec![-1.0, 7.0], vec![1.0, 7.0]]);
    }

    #[test]
    fn test_standard_scaler_constant_without_std_is_fine() {
        let data = FeatureMatrix::from_columns(vec![("c".to_string(), vec![7.0, 7.0])]).unwrap();
        let out = StandardScaler::new()
            .with_std(false)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(out.to_rows(), vec![vec![0.0], vec![0.0]]);
    }

    #[test]
    fn test_standard_scaler_inexact_constant_columns() {
        for value in [0.1, 1e10 + 0.1, -3.3] {
            let data =
                FeatureMatrix::from_columns(vec![("c".to_string(), vec![value; 7])]).unwrap();

            assert!(matches!(
                StandardScaler::new().fit(&data),
                Err(PreprocessingError::DegenerateColumn { .. })
            ));

            let fitted = StandardScaler::new()
                .with_degenerate(DegeneratePolicy::PassThrough)
                .fit(&data)
                .unwrap();
            assert_eq!(fitted.std(), &[0.0]);
            assert_eq!(fitted.transform(&data).unwrap(), data);

            // centering only: the column is not degenerate and lands on zero
            let centered = StandardScaler::new()
                .with_std(false)
                .fit_transform(&data)
                .unwrap();
            assert!(centered.values().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_standard_scaler_near_constant_within_rounding() {
        let x = 0.1f64;
        let next = f64::from_bits(x.to_bits() + 1);
        let data =
            FeatureMatrix::from_columns(vec![("c".to_string(), vec![x, next, x, next])]).unwrap();

        assert!(matches!(
            StandardScaler::new().fit(&data),
            Err(PreprocessingError::DegenerateColumn { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();
        let reordered = create_test_data().select(&["b", "a"]).unwrap();

        assert!(matches!(
            fitted.transform(&reordered),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let data = FeatureMatrix::empty(vec!["a".to_string()]).unwrap();
        assert!(matches!(
            StandardScaler::new().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_standard_scaler_n_features_in() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();
        assert_eq!(fitted.n_features_in(), 2);
        assert_eq!(fitted.feature_names_out(), vec!["a", "b"]);
    }

    #[test]
    fn test_standard_scaler_save_load_file() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fitted.save_to_file(temp_file.path()).unwrap();
        let loaded = FittedStandardScaler::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.mean(), fitted.mean());
        assert_eq!(loaded.std(), fitted.std());
        assert_eq!(
            loaded.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }
}
