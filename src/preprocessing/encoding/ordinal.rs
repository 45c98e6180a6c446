//! Ordinal encoding for categorical fields.
//!
//! Maps text categories to integer ordinals (0, 1, 2, ...).

use crate::data::{Dataset, FeatureMatrix, Record, Value};
use crate::preprocessing::encoding::{check_fields, learn_fields, FieldKind, FieldSchema};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Ordinal encoder for categorical fields.
///
/// Maps each category to its position in the lexicographically sorted list
/// of categories seen during fit. Emits one column per field, named after
/// the field; numeric fields pass through.
///
/// # Example
/// ```rust
/// use featurecraft::data::Dataset;
/// use featurecraft::preprocessing::{FittedTransformer, OrdinalEncoder, Transformer};
///
/// let data = Dataset::from_column("size", ["medium", "large", "small", "medium"]);
///
/// let fitted = OrdinalEncoder::new().fit(&data).unwrap();
/// let encoded = fitted.transform(&data).unwrap();
///
/// // large=0, medium=1, small=2
/// assert_eq!(encoded.to_rows(), vec![vec![1.0], vec![0.0], vec![2.0], vec![1.0]]);
///
/// let decoded = fitted.inverse_transform(&encoded).unwrap();
/// assert_eq!(decoded, data);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrdinalEncoder {
    /// Code emitted for categories not seen during fit.
    unknown_value: Option<f64>,
}

impl OrdinalEncoder {
    /// Create a new OrdinalEncoder that fails on unseen categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode unseen categories as `code` instead of failing.
    ///
    /// The code must lie outside `0..n_categories` (e.g. `-1.0`); fitting
    /// fails with `InvalidParameter` when it equals a learned category code.
    pub fn with_unknown_value(mut self, code: f64) -> Self {
        self.unknown_value = Some(code);
        self
    }
}

/// Fitted OrdinalEncoder ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedOrdinalEncoder {
    /// Fitted fields, in sorted field order.
    fields: Vec<FieldSchema>,
    unknown_value: Option<f64>,
}

impl FittedOrdinalEncoder {
    /// Get the fields and categories learned during fit.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Get the categories of one field, in code order.
    pub fn categories(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(FieldSchema::categories)
    }

    fn encode(&self, field: &FieldSchema, value: &Value) -> Result<f64> {
        match &field.kind {
            FieldKind::Numeric => field.numeric_cell(value),
            FieldKind::Categorical(_) => {
                let Some(category) = field.text_cell(value)? else {
                    return Ok(f64::NAN);
                };
                match (field.category_index(category), self.unknown_value) {
                    (Some(idx), _) => Ok(idx as f64),
                    (None, Some(code)) => Ok(code),
                    (None, None) => Err(PreprocessingError::UnseenCategory {
                        field: field.name.clone(),
                        value: category.to_string(),
                    }),
                }
            }
        }
    }

    fn decode(&self, field: &FieldSchema, code: f64) -> Result<Value> {
        if code.is_nan() {
            return Ok(Value::Missing);
        }
        match &field.kind {
            FieldKind::Numeric => Ok(Value::Number(code)),
            FieldKind::Categorical(cats) => {
                if self.unknown_value == Some(code) {
                    return Ok(Value::Missing);
                }
                let valid = code >= 0.0 && code.fract() == 0.0 && (code as usize) < cats.len();
                if !valid {
                    return Err(PreprocessingError::UnseenCategory {
                        field: field.name.clone(),
                        value: code.to_string(),
                    });
                }
                Ok(Value::Text(cats[code as usize].clone()))
            }
        }
    }
}

impl Transformer for OrdinalEncoder {
    type Input = Dataset;
    type Output = FeatureMatrix;
    type Fitted = FittedOrdinalEncoder;

    fn fit(&self, data: &Dataset) -> Result<FittedOrdinalEncoder> {
        let fields = learn_fields(data, "OrdinalEncoder")?;

        if let Some(code) = self.unknown_value {
            for field in &fields {
                if let FieldKind::Categorical(cats) = &field.kind {
                    if code >= 0.0 && code.fract() == 0.0 && code < cats.len() as f64 {
                        return Err(PreprocessingError::InvalidParameter(format!(
                            "OrdinalEncoder unknown_value {} is the code of category '{}' in field '{}'",
                            code, cats[code as usize], field.name
                        )));
                    }
                }
            }
        }

        tracing::debug!(
            fields = fields.len(),
            categorical = fields
                .iter()
                .filter(|f| matches!(f.kind, FieldKind::Categorical(_)))
                .count(),
            "fitted OrdinalEncoder"
        );

        Ok(FittedOrdinalEncoder {
            fields,
            unknown_value: self.unknown_value,
        })
    }
}

impl FittedTransformer for FittedOrdinalEncoder {
    type Input = Dataset;
    type Output = FeatureMatrix;

    fn transform(&self, data: &Dataset) -> Result<FeatureMatrix> {
        let columns = self.feature_names_out();
        if data.is_empty() {
            return FeatureMatrix::empty(columns);
        }
        check_fields(&self.fields, data)?;

        let mut values = Array2::zeros((data.len(), self.fields.len()));
        for row in 0..data.len() {
            for (col, field) in self.fields.iter().enumerate() {
                values[[row, col]] = self.encode(field, data.value(row, &field.name))?;
            }
        }

        FeatureMatrix::new(values, columns)
    }

    fn inverse_transform(&self, data: &FeatureMatrix) -> Result<Dataset> {
        data.ensure_columns(&self.feature_names_out())?;

        let mut records = Vec::with_capacity(data.n_rows());
        for row in data.values().outer_iter() {
            let mut record = Record::new();
            for (field, &code) in self.fields.iter().zip(row.iter()) {
                record.insert(field.name.clone(), self.decode(field, code)?);
            }
            records.push(record);
        }

        Ok(Dataset::new(records))
    }

    fn name(&self) -> &'static str {
        "OrdinalEncoder"
    }

    fn n_features_in(&self) -> usize {
        self.fields.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}
