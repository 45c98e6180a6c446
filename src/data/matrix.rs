//! Dense numeric matrix with named columns.

use crate::preprocessing::error::{PreprocessingError, Result};
use ndarray::{concatenate, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A 2D matrix of `f64` cells whose columns carry names.
///
/// Rows correspond one-to-one to input records or documents. Missing cells
/// are represented as `NaN`. Column names are unique.
///
/// # Example
/// ```rust
/// use featurecraft::data::FeatureMatrix;
///
/// let m = FeatureMatrix::from_rows(
///     vec!["x".to_string(), "y".to_string()],
///     vec![vec![1.0, 2.0], vec![3.0, f64::NAN]],
/// ).unwrap();
///
/// assert_eq!(m.shape(), (2, 2));
/// assert!(m.has_missing());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    values: Array2<f64>,
    columns: Vec<String>,
}

impl FeatureMatrix {
    /// Wrap an array with column names.
    ///
    /// # Errors
    /// `ShapeMismatch` if the name count differs from the column count,
    /// `InvalidParameter` if names repeat.
    pub fn new(values: Array2<f64>, columns: Vec<String>) -> Result<Self> {
        if values.ncols() != columns.len() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} column names", values.ncols()),
                got: format!("{} column names", columns.len()),
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
        }
        Ok(Self { values, columns })
    }

    /// Build from row vectors.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_cols = columns.len();
        let n_rows = rows.len();
        let mut flat = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(PreprocessingError::ShapeMismatch {
                    expected: format!("{} values in row {}", n_cols, i),
                    got: format!("{} values", row.len()),
                });
            }
            flat.extend(row);
        }
        let values = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| PreprocessingError::InvalidParameter(e.to_string()))?;
        Self::new(values, columns)
    }

    /// Build from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut values = Array2::zeros((n_rows, columns.len()));
        let mut names = Vec::with_capacity(columns.len());
        for (j, (name, col)) in columns.into_iter().enumerate() {
            if col.len() != n_rows {
                return Err(PreprocessingError::ShapeMismatch {
                    expected: format!("{} rows in column '{}'", n_rows, name),
                    got: format!("{} rows", col.len()),
                });
            }
            for (i, v) in col.into_iter().enumerate() {
                values[[i, j]] = v;
            }
            names.push(name);
        }
        Self::new(values, names)
    }

    /// Wrap an array, naming columns `x0`, `x1`, ...
    pub fn with_default_names(values: Array2<f64>) -> Self {
        let columns = (0..values.ncols()).map(|j| format!("x{}", j)).collect();
        Self { values, columns }
    }

    /// A matrix with the given columns and no rows.
    pub fn empty(columns: Vec<String>) -> Result<Self> {
        let n = columns.len();
        Self::new(Array2::zeros((0, n)), columns)
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The underlying array.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consume the matrix, returning the array and the column names.
    pub fn into_parts(self) -> (Array2<f64>, Vec<String>) {
        (self.values, self.columns)
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A view of one column by name.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name)
            .map(|j| self.values.index_axis(Axis(1), j))
    }

    /// A single cell.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    /// Returns `true` if any cell is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Row-major copy of the cells.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Keep only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = self.column_index(name).ok_or_else(|| {
                PreprocessingError::ShapeMismatch {
                    expected: format!("column '{}'", name),
                    got: format!("columns {:?}", self.columns),
                }
            })?;
            indices.push(idx);
        }
        let values = self.values.select(Axis(1), &indices);
        Self::new(values, names.iter().map(|s| s.to_string()).collect())
    }

    /// Append the columns of `other` to the right.
    pub fn hstack(&self, other: &FeatureMatrix) -> Result<Self> {
        if self.n_rows() != other.n_rows() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows", other.n_rows()),
            });
        }
        let values = concatenate(Axis(1), &[self.values.view(), other.values.view()])
            .map_err(|e| PreprocessingError::InvalidParameter(e.to_string()))?;
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Self::new(values, columns)
    }

    /// Fail with `ShapeMismatch` unless the columns equal `expected`, in order.
    pub fn ensure_columns(&self, expected: &[String]) -> Result<()> {
        if self.columns.as_slice() != expected {
            return Err(PreprocessingError::columns_mismatch(expected, &self.columns));
        }
        Ok(())
    }
}
