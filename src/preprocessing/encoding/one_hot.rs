//! One-hot encoding for categorical fields.
//!
//! Transforms text categories to binary indicator columns.

use crate::data::{Dataset, FeatureMatrix};
use crate::preprocessing::encoding::{
    check_fields, learn_fields, FeatureNaming, FieldKind, FieldSchema, HandleUnknown,
};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One-hot encoder for categorical fields.
///
/// Every categorical field contributes one column per category seen during
/// fitting; numeric fields pass through as a single column. The output
/// columns are sorted lexicographically by name.
///
/// # Example
/// ```rust
/// use featurecraft::data::Dataset;
/// use featurecraft::preprocessing::{FeatureNaming, FittedTransformer, OneHotEncoder, Transformer};
///
/// let data = Dataset::from_column("neighborhood", ["Fremont", "Queen Anne", "Fremont"]);
///
/// let encoder = OneHotEncoder::new().with_naming(FeatureNaming::ValueOnly);
/// let fitted = encoder.fit(&data).unwrap();
/// let encoded = fitted.transform(&data).unwrap();
///
/// assert_eq!(encoded.columns(), &["Fremont".to_string(), "Queen Anne".to_string()]);
/// assert_eq!(encoded.to_rows(), vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
    /// How output columns are named.
    naming: FeatureNaming,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Set the column naming policy.
    pub fn with_naming(mut self, naming: FeatureNaming) -> Self {
        self.naming = naming;
        self
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    /// Fitted fields, in sorted field order.
    fields: Vec<FieldSchema>,
    /// Output column of each category (or of the numeric value) per field.
    positions: Vec<Vec<usize>>,
    /// Sorted output column names.
    columns: Vec<String>,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the fields and categories learned during fit.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.columns.len()
    }
}

impl Transformer for OneHotEncoder {
    type Input = Dataset;
    type Output = FeatureMatrix;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Dataset) -> Result<FittedOneHotEncoder> {
        let fields = learn_fields(data, "OneHotEncoder")?;

        // Unsorted names, one group per field
        let mut raw: Vec<Vec<String>> = Vec::with_capacity(fields.len());
        for field in &fields {
            let names = match &field.kind {
                FieldKind::Numeric => vec![field.name.clone()],
                FieldKind::Categorical(cats) => cats
                    .iter()
                    .map(|c| self.naming.column_name(&field.name, c))
                    .collect(),
            };
            raw.push(names);
        }

        let mut seen = HashSet::new();
        for name in raw.iter().flatten() {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "OneHotEncoder produced column '{}' twice; use FeatureNaming::Prefixed",
                    name
                )));
            }
        }

        // (name, field, slot) sorted by name; the sorted rank is the column
        let mut order: Vec<(&String, usize, usize)> = raw
            .iter()
            .enumerate()
            .flat_map(|(f, names)| names.iter().enumerate().map(move |(k, n)| (n, f, k)))
            .collect();
        order.sort_by(|a, b| a.0.cmp(b.0));

        let mut positions: Vec<Vec<usize>> = raw.iter().map(|names| vec![0; names.len()]).collect();
        for (column, &(_, f, k)) in order.iter().enumerate() {
            positions[f][k] = column;
        }
        let columns: Vec<String> = order.into_iter().map(|(name, _, _)| name.clone()).collect();

        tracing::debug!(
            fields = fields.len(),
            columns = columns.len(),
            "fitted OneHotEncoder"
        );

        Ok(FittedOneHotEncoder {
            fields,
            positions,
            columns,
            handle_unknown: self.handle_unknown,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Dataset;
    type Output = FeatureMatrix;

    fn transform(&self, data: &Dataset) -> Result<FeatureMatrix> {
        if data.is_empty() {
            return FeatureMatrix::empty(self.columns.clone());
        }
        check_fields(&self.fields, data)?;

        let mut values = Array2::zeros((data.len(), self.columns.len()));
        for row in 0..data.len() {
            for (field, positions) in self.fields.iter().zip(&self.positions) {
                let value = data.value(row, &field.name);
                match &field.kind {
                    FieldKind::Numeric => {
                        values[[row, positions[0]]] = field.numeric_cell(value)?;
                    }
                    FieldKind::Categorical(_) => {
                        let Some(category) = field.text_cell(value)? else {
                            continue;
                        };
                        match field.category_index(category) {
                            Some(idx) => values[[row, positions[idx]]] = 1.0,
                            None if self.handle_unknown == HandleUnknown::Error => {
                                return Err(PreprocessingError::UnseenCategory {
                                    field: field.name.clone(),
                                    value: category.to_string(),
                                });
                            }
                            // With Ignore, leave as zeros
                            None => {}
                        }
                    }
                }
            }
        }

        FeatureMatrix::new(values, self.columns.clone())
    }

    fn name(&self) -> &'static str {
        "OneHotEncoder"
    }

    fn n_features_in(&self) -> usize {
        self.fields.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.clone()
    }
}
