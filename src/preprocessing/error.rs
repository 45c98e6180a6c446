//! Error types for preprocessing operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = PreprocessingError> = std::result::Result<T, E>;

/// Error type for fitting and transforming data.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// An ordinal encoder met a category it did not see during fit.
    #[error("Unseen category '{value}' in field '{field}'")]
    UnseenCategory { field: String, value: String },

    /// A column had no non-missing values at fit time.
    #[error("Insufficient data: column '{column}' has no non-missing values")]
    InsufficientData { column: String },

    /// A column has zero variance or a constant range.
    #[error("Degenerate column '{column}': zero variance or constant range")]
    DegenerateColumn { column: String },

    /// The input columns (or fields) differ from what was seen during fit.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// A model or transformer was used before being fitted.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Forward or backward fill found no neighbour to copy from.
    #[error("Cannot fill column '{column}' at row {row}: no neighbouring value")]
    UnfillableEdge { column: String, row: usize },

    /// A field holds a value of a different kind than during fit.
    #[error("Field '{field}' expected a {expected} value")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    /// Data contains missing values (NaN) when not expected.
    #[error("Missing values: {0}")]
    MissingValues(String),

    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid hyperparameter value or unsupported operation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical computation failed (e.g. singular system).
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreprocessingError {
    /// Build a [`PreprocessingError::ShapeMismatch`] from two column lists.
    pub fn columns_mismatch(expected: &[String], got: &[String]) -> Self {
        PreprocessingError::ShapeMismatch {
            expected: format!("columns {:?}", expected),
            got: format!("columns {:?}", got),
        }
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for PreprocessingError {
    fn from(err: csv::Error) -> Self {
        PreprocessingError::Csv(err.to_string())
    }
}
