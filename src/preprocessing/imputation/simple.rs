//! Simple Imputer.
//!
//! Imputation transformer for completing missing values.
//! Supports mean, median, most_frequent and constant statistics, and
//! forward/backward filling from neighbouring rows.
//!
//! Note: This implementation treats NaN as missing values.
//!
//! # Example
//! ```rust
//! use featurecraft::data::FeatureMatrix;
//! use featurecraft::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let data = FeatureMatrix::from_columns(vec![
//!     ("rooms".to_string(), vec![1.0, f64::NAN, 3.0, 3.0, 4.0, 8.0]),
//! ]).unwrap();
//!
//! let fitted = SimpleImputer::new(ImputeStrategy::Mean).fit(&data).unwrap();
//! let imputed = fitted.transform(&data).unwrap();
//!
//! assert!((imputed.get(1, 0) - 3.8).abs() < 1e-12);
//! ```

use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayViewMut1, Axis};
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    #[default]
    Mean,
    /// Replace missing values with the median of each column.
    Median,
    /// Replace missing values with the most frequent value of each column.
    /// Ties go to the value seen first during fit.
    MostFrequent,
    /// Replace missing values with a constant value.
    Constant(f64),
    /// Copy the nearest preceding non-missing value in the same column.
    ForwardFill,
    /// Copy the nearest following non-missing value in the same column.
    BackwardFill,
}

impl ImputeStrategy {
    fn is_fill(self) -> bool {
        matches!(self, ImputeStrategy::ForwardFill | ImputeStrategy::BackwardFill)
    }
}

/// What forward/backward fill does with a gap that has no neighbour.
///
/// A leading gap has no predecessor for forward fill; a trailing gap has no
/// successor for backward fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillEdge {
    /// Keep the cell missing.
    #[default]
    LeaveMissing,
    /// Fail with `UnfillableEdge`.
    Fail,
    /// Use the column mean learned during fit.
    UseStatistic,
}

/// SimpleImputer transformer (unfitted).
///
/// Imputation transformer for completing missing values.
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
    fill_edge: FillEdge,
    add_indicator: bool,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Set the policy for forward/backward fill gaps at the edges.
    pub fn with_fill_edge(mut self, fill_edge: FillEdge) -> Self {
        self.fill_edge = fill_edge;
        self
    }

    /// Append a `missing(<column>)` indicator for every column that had
    /// missing values during fit.
    pub fn with_indicators(mut self, add_indicator: bool) -> Self {
        self.add_indicator = add_indicator;
        self
    }
}

/// Compute the fill value of one column, ignoring NaN values.
fn compute_statistic(values: &[f64], strategy: ImputeStrategy) -> f64 {
    match strategy {
        ImputeStrategy::Constant(val) => val,
        ImputeStrategy::Median => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len();
            if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        }
        ImputeStrategy::MostFrequent => {
            // (value, count) in order of first appearance
            let mut counts: Vec<(f64, usize)> = Vec::new();
            for &v in values {
                match counts.iter_mut().find(|(seen, _)| *seen == v) {
                    Some(entry) => entry.1 += 1,
                    None => counts.push((v, 1)),
                }
            }
            let mut best = counts[0];
            for &entry in &counts[1..] {
                if entry.1 > best.1 {
                    best = entry;
                }
            }
            best.0
        }
        // The mean also backs FillEdge::UseStatistic for the fill strategies.
        ImputeStrategy::Mean | ImputeStrategy::ForwardFill | ImputeStrategy::BackwardFill => {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

impl Transformer for SimpleImputer {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &FeatureMatrix) -> Result<FittedSimpleImputer> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        let mut statistics = Vec::with_capacity(data.n_columns());
        let mut indicator_columns = Vec::new();
        for (j, (name, column)) in data
            .columns()
            .iter()
            .zip(data.values().axis_iter(Axis(1)))
            .enumerate()
        {
            let present: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
            if present.len() < column.len() {
                indicator_columns.push(j);
            }

            let statistic = match self.strategy {
                ImputeStrategy::Constant(val) => val,
                _ if present.is_empty() => {
                    return Err(PreprocessingError::InsufficientData {
                        column: name.clone(),
                    })
                }
                strategy => compute_statistic(&present, strategy),
            };
            statistics.push(statistic);
        }

        if !self.add_indicator {
            indicator_columns.clear();
        }
        for &j in &indicator_columns {
            let indicator = indicator_name(&data.columns()[j]);
            if data.column_index(&indicator).is_some() {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "SimpleImputer indicator '{}' clashes with an input column of the same name",
                    indicator
                )));
            }
        }

        tracing::debug!(
            strategy = ?self.strategy,
            columns = statistics.len(),
            indicators = indicator_columns.len(),
            "fitted SimpleImputer"
        );

        Ok(FittedSimpleImputer {
            strategy: self.strategy,
            fill_edge: self.fill_edge,
            columns: data.columns().to_vec(),
            statistics,
            indicator_columns,
        })
    }
}

fn indicator_name(column: &str) -> String {
    format!("missing({})", column)
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    fill_edge: FillEdge,
    columns: Vec<String>,
    /// Fill value per column (the mean for forward/backward fill).
    statistics: Vec<f64>,
    /// Columns that get a missing indicator.
    indicator_columns: Vec<usize>,
}

impl FittedSimpleImputer {
    /// Get the imputation statistics (fill values) for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }

    /// Get the strategy used for imputation.
    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    fn indicator_names(&self) -> Vec<String> {
        self.indicator_columns
            .iter()
            .map(|&j| indicator_name(&self.columns[j]))
            .collect()
    }

    /// Fill one column in place, walking it in order (or reversed for bfill).
    fn fill_column(&self, col: usize, mut column: ArrayViewMut1<'_, f64>) -> Result<()> {
        let n = column.len();
        let order: Box<dyn Iterator<Item = usize>> = match self.strategy {
            ImputeStrategy::BackwardFill => Box::new((0..n).rev()),
            _ => Box::new(0..n),
        };

        let mut last: Option<f64> = None;
        for row in order {
            let value = column[row];
            if !value.is_nan() {
                last = Some(value);
                continue;
            }
            column[row] = match (last, self.fill_edge) {
                (Some(prev), _) => prev,
                (None, FillEdge::LeaveMissing) => f64::NAN,
                (None, FillEdge::UseStatistic) => self.statistics[col],
                (None, FillEdge::Fail) => {
                    return Err(PreprocessingError::UnfillableEdge {
                        column: self.columns[col].clone(),
                        row,
                    })
                }
            };
        }
        Ok(())
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;

    fn transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.columns)?;

        let mut values = data.values().clone();
        if self.strategy.is_fill() {
            for (col, column) in values.axis_iter_mut(Axis(1)).enumerate() {
                self.fill_column(col, column)?;
            }
        } else {
            for (column, &stat) in values.axis_iter_mut(Axis(1)).zip(&self.statistics) {
                for cell in column {
                    if cell.is_nan() {
                        *cell = stat;
                    }
                }
            }
        }

        let imputed = FeatureMatrix::new(values, self.columns.clone())?;
        if self.indicator_columns.is_empty() {
            return Ok(imputed);
        }

        let mut indicators = Array2::zeros((data.n_rows(), self.indicator_columns.len()));
        for (k, &j) in self.indicator_columns.iter().enumerate() {
            for (row, value) in data.values().column(j).iter().enumerate() {
                if value.is_nan() {
                    indicators[[row, k]] = 1.0;
                }
            }
        }
        imputed.hstack(&FeatureMatrix::new(indicators, self.indicator_names())?)
    }

    /// Drops the indicator columns; imputed cells are not restored.
    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.feature_names_out())?;
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        data.select(&names)
    }

    fn name(&self) -> &'static str {
        "SimpleImputer"
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        let mut names = self.columns.clone();
        names.extend(self.indicator_names());
        names
    }
}
