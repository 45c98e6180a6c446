//! Categorical feature encoding transformers.
//!
//! Encoders consume a [`Dataset`] of records and emit a [`FeatureMatrix`].
//!
//! # Available Encoders
//!
//! ## OneHotEncoder
//! One binary column per category seen at fit time.
//!
//! ```ignore
//! // neighborhood: ["Fremont", "Queen Anne", "Fremont"]
//! // columns:      ["neighborhood=Fremont", "neighborhood=Queen Anne"]
//! // rows:         [1, 0], [0, 1], [1, 0]
//! ```
//!
//! ## OrdinalEncoder
//! One integer-coded column per field.
//!
//! # Field kinds
//!
//! A field is categorical if any fit-time record holds text for it. All
//! other fields are numeric and pass through as a single column, with
//! missing values becoming `NaN`. Categories are kept sorted
//! lexicographically, so repeated fits on the same data always produce the
//! same columns.
//!
//! [`FeatureMatrix`]: crate::data::FeatureMatrix

mod one_hot;
mod ordinal;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};
pub use ordinal::{FittedOrdinalEncoder, OrdinalEncoder};

use crate::data::{Dataset, Value};
use crate::preprocessing::error::{PreprocessingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Strategy for handling unknown categories during one-hot transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Raise an `UnseenCategory` error.
    Error,
    /// Emit an all-zero block for the field.
    #[default]
    Ignore,
}

/// How one-hot columns are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureNaming {
    /// `field=value`.
    #[default]
    Prefixed,
    /// `value` alone. Two fields sharing a category value is an error.
    ValueOnly,
}

impl FeatureNaming {
    pub(crate) fn column_name(self, field: &str, category: &str) -> String {
        match self {
            FeatureNaming::Prefixed => format!("{}={}", field, category),
            FeatureNaming::ValueOnly => category.to_string(),
        }
    }
}

/// What an encoder learned about one input field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Numbers, passed through unchanged.
    Numeric,
    /// Text categories, sorted lexicographically.
    Categorical(Vec<String>),
}

/// A named input field and its learned kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    /// The categories of a categorical field, empty for numeric ones.
    pub fn categories(&self) -> &[String] {
        match &self.kind {
            FieldKind::Categorical(cats) => cats,
            FieldKind::Numeric => &[],
        }
    }

    /// Position of `category` among the fitted categories.
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories()
            .binary_search_by(|c| c.as_str().cmp(category))
            .ok()
    }

    /// Read a numeric cell, failing on text.
    pub(crate) fn numeric_cell(&self, value: &Value) -> Result<f64> {
        match value {
            Value::Number(v) => Ok(*v),
            Value::Missing => Ok(f64::NAN),
            Value::Text(_) => Err(PreprocessingError::FieldType {
                field: self.name.clone(),
                expected: "numeric",
            }),
        }
    }

    /// Read a categorical cell, failing on numbers. `None` means missing.
    pub(crate) fn text_cell<'a>(&self, value: &'a Value) -> Result<Option<&'a str>> {
        match value {
            Value::Text(s) => Ok(Some(s)),
            Value::Missing => Ok(None),
            Value::Number(_) => Err(PreprocessingError::FieldType {
                field: self.name.clone(),
                expected: "text",
            }),
        }
    }
}

/// Learn the kind and categories of every field in `data`.
pub(crate) fn learn_fields(data: &Dataset, encoder: &str) -> Result<Vec<FieldSchema>> {
    if data.is_empty() {
        return Err(PreprocessingError::EmptyData(format!(
            "Cannot fit {} on an empty dataset",
            encoder
        )));
    }

    let mut schema = Vec::with_capacity(data.fields().len());
    for field in data.fields() {
        let categorical = data.column(field).any(|v| matches!(v, Value::Text(_)));
        let kind = if categorical {
            let mut categories = BTreeSet::new();
            for value in data.column(field) {
                match value {
                    Value::Text(s) => {
                        categories.insert(s.clone());
                    }
                    Value::Missing => {}
                    Value::Number(_) => {
                        return Err(PreprocessingError::FieldType {
                            field: field.clone(),
                            expected: "text",
                        })
                    }
                }
            }
            FieldKind::Categorical(categories.into_iter().collect())
        } else {
            FieldKind::Numeric
        };
        schema.push(FieldSchema {
            name: field.clone(),
            kind,
        });
    }
    Ok(schema)
}

/// Fail unless `data` carries exactly the fitted fields.
pub(crate) fn check_fields(schema: &[FieldSchema], data: &Dataset) -> Result<()> {
    let expected: Vec<String> = schema.iter().map(|f| f.name.clone()).collect();
    if data.fields() != expected.as_slice() {
        return Err(PreprocessingError::columns_mismatch(&expected, data.fields()));
    }
    Ok(())
}
