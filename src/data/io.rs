//! CSV loading into [`Dataset`].
//!
//! Cells are typed on the fly: empty / `NA` / `NaN` / `null` become
//! [`Value::Missing`], anything parseable as `f64` becomes a number, and the
//! rest is kept as text.

use super::{Dataset, Record, Value};
use crate::preprocessing::error::Result;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const MISSING_MARKERS: [&str; 4] = ["", "na", "nan", "null"];

fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        return Value::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Value::number(v),
        Err(_) => Value::Text(trimmed.to_string()),
    }
}

impl Dataset {
    /// Read a headered CSV stream.
    ///
    /// # Errors
    /// Returns `Csv` for malformed input, including rows whose length
    /// differs from the header.
    ///
    /// # Example
    /// ```rust
    /// use featurecraft::data::{Dataset, Value};
    ///
    /// let csv = "price,neighborhood\n850000,Queen Anne\n,Fremont\n";
    /// let data = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
    ///
    /// assert_eq!(data.len(), 2);
    /// assert_eq!(data.value(0, "price"), &Value::Number(850000.0));
    /// assert!(data.value(1, "price").is_missing());
    /// ```
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.clone(), parse_cell(cell)))
                .collect();
            records.push(record);
        }

        tracing::debug!(rows = records.len(), fields = headers.len(), "loaded CSV dataset");
        Ok(Dataset::new(records))
    }

    /// Read a headered CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }
}
