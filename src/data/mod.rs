//! In-memory data model: raw records and numeric feature matrices.
//!
//! # Core Concepts
//!
//! - **Value** — a raw cell: a number, a piece of text, or a missing marker.
//! - **Record** — an ordered mapping from field name to [`Value`].
//! - **Dataset** — a collection of records sharing one field set. Fields a
//!   record does not carry are read back as [`Value::Missing`].
//! - **FeatureMatrix** — a dense `f64` matrix with named columns, the common
//!   currency of every transformer. Missing cells are `NaN`.
//!
//! # Example
//!
//! ```rust
//! use featurecraft::data::{Dataset, Record, Value};
//!
//! let data = Dataset::new(vec![
//!     Record::new().with("price", 850_000.0).with("neighborhood", "Queen Anne"),
//!     Record::new().with("price", 700_000.0).with("neighborhood", "Fremont"),
//! ]);
//!
//! assert_eq!(data.fields(), &["neighborhood".to_string(), "price".to_string()]);
//! assert_eq!(data.value(1, "neighborhood"), &Value::from("Fremont"));
//! ```

mod io;
mod matrix;

pub use matrix::FeatureMatrix;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

static MISSING: Value = Value::Missing;

/// A raw cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A numeric value. Never NaN; see [`Value::number`].
    Number(f64),
    /// A textual (categorical) value.
    Text(String),
    /// No value.
    Missing,
}

impl Value {
    /// Build a numeric value, mapping NaN to [`Value::Missing`].
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            Value::Number(v)
        }
    }

    /// Returns `true` for [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The textual payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// An ordered mapping from field name to raw value.
///
/// Insertion order is kept; inserting an existing field replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// Iterate over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// A collection of records with a consistent, sorted field set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
    fields: Vec<String>,
}

impl Dataset {
    /// Build a dataset. The field set is the sorted union of all record fields.
    pub fn new(records: Vec<Record>) -> Self {
        let fields: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.iter().map(|(k, _)| k.to_string()))
            .collect();
        Self {
            records,
            fields: fields.into_iter().collect(),
        }
    }

    /// Build a single-field dataset from a column of values.
    ///
    /// ```rust
    /// use featurecraft::data::Dataset;
    ///
    /// let data = Dataset::from_column("neighborhood", ["Fremont", "Queen Anne", "Fremont"]);
    /// assert_eq!(data.len(), 3);
    /// ```
    pub fn from_column<V, I>(field: &str, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let records = values
            .into_iter()
            .map(|v| Record::new().with(field, v))
            .collect();
        Self::new(records)
    }

    /// The records, in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorted field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The value of `field` in record `row`; absent fields read as missing.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn value(&self, row: usize, field: &str) -> &Value {
        self.records[row].get(field).unwrap_or(&MISSING)
    }

    /// All values of one field, in record order.
    pub fn column<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records
            .iter()
            .map(move |r| r.get(field).unwrap_or(&MISSING))
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}
