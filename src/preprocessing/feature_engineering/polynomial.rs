//! Polynomial feature generation.
//!
//! Generates polynomial and interaction features from input data.

use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// PolynomialFeatures transformer for generating polynomial and interaction features.
///
/// Generates a new feature matrix consisting of all monomials of the input
/// columns with total degree between 1 and `degree`, in graded
/// lexicographic order: every degree-1 term, then every degree-2 term, and
/// so on, each degree enumerated as combinations with replacement in column
/// order.
///
/// For example, if the input has columns `[a, b]`, the degree-2 features
/// are `[a, b, a^2, a b, b^2]`, preceded by the bias column `1` when
/// `include_bias` is set. Inputs whose names contain a space, `^`, `*` or a
/// parenthesis (text n-grams, for instance) switch products to the
/// `a*(b c)` form.
///
/// The expansion depends only on the column names, so it can be applied
/// directly with [`expand`](Self::expand) without fitting.
///
/// # Example
/// ```rust
/// use featurecraft::data::FeatureMatrix;
/// use featurecraft::preprocessing::PolynomialFeatures;
///
/// let data = FeatureMatrix::from_rows(
///     vec!["a".to_string(), "b".to_string()],
///     vec![vec![2.0, 3.0]],
/// ).unwrap();
///
/// let expanded = PolynomialFeatures::new().with_degree(2).expand(&data).unwrap();
///
/// assert_eq!(expanded.columns(), &["a", "b", "a^2", "a b", "b^2"]);
/// assert_eq!(expanded.to_rows(), vec![vec![2.0, 3.0, 4.0, 6.0, 9.0]]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    /// Maximum degree of polynomial features.
    degree: usize,
    /// If true, include a bias column (feature of all 1s).
    include_bias: bool,
    /// If true, only produce interaction features (products of distinct features).
    interaction_only: bool,
}

impl Default for PolynomialFeatures {
    fn default() -> Self {
        Self::new()
    }
}

impl PolynomialFeatures {
    /// Create a new PolynomialFeatures with default settings (degree=2, no bias).
    pub fn new() -> Self {
        Self {
            degree: 2,
            include_bias: false,
            interaction_only: false,
        }
    }

    /// Set the maximum degree of polynomial features.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Set whether to include a bias column (all 1s).
    pub fn with_include_bias(mut self, include_bias: bool) -> Self {
        self.include_bias = include_bias;
        self
    }

    /// Set whether to only produce interaction features.
    pub fn with_interaction_only(mut self, interaction_only: bool) -> Self {
        self.interaction_only = interaction_only;
        self
    }

    /// Expand `data` without keeping any fitted state.
    pub fn expand(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.fit_transform(data)
    }
}

/// Fitted PolynomialFeatures ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPolynomialFeatures {
    /// Input columns seen during fit.
    input_columns: Vec<String>,
    /// Input column indices multiplied together for each output column.
    /// `[]` is the bias, `[0]` the first input, `[0, 0]` its square.
    output_combinations: Vec<Vec<usize>>,
    /// Output column names.
    output_columns: Vec<String>,
}

impl FittedPolynomialFeatures {
    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.output_combinations.len()
    }

    /// Get the output feature combinations.
    pub fn output_combinations(&self) -> &[Vec<usize>] {
        &self.output_combinations
    }
}

impl Transformer for PolynomialFeatures {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;
    type Fitted = FittedPolynomialFeatures;

    fn fit(&self, data: &FeatureMatrix) -> Result<FittedPolynomialFeatures> {
        if self.degree == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "PolynomialFeatures degree must be at least 1".to_string(),
            ));
        }
        if data.n_columns() == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit PolynomialFeatures on data with no features".to_string(),
            ));
        }

        let output_combinations = generate_polynomial_combinations(
            data.n_columns(),
            self.degree,
            self.include_bias,
            self.interaction_only,
        );
        let explicit = data.columns().iter().any(|name| needs_grouping(name));
        let output_columns: Vec<String> = output_combinations
            .iter()
            .map(|combo| monomial_name(data.columns(), combo, explicit))
            .collect();

        let mut seen = HashSet::with_capacity(output_columns.len());
        for name in &output_columns {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "PolynomialFeatures output name '{}' is produced twice from input columns {:?}",
                    name,
                    data.columns()
                )));
            }
        }

        tracing::debug!(
            degree = self.degree,
            inputs = data.n_columns(),
            outputs = output_combinations.len(),
            "fitted PolynomialFeatures"
        );

        Ok(FittedPolynomialFeatures {
            input_columns: data.columns().to_vec(),
            output_combinations,
            output_columns,
        })
    }
}

impl FittedTransformer for FittedPolynomialFeatures {
    type Input = FeatureMatrix;
    type Output = FeatureMatrix;

    fn transform(&self, data: &FeatureMatrix) -> Result<FeatureMatrix> {
        data.ensure_columns(&self.input_columns)?;

        let mut values = Array2::zeros((data.n_rows(), self.n_features_out()));
        for (row, input) in data.values().outer_iter().enumerate() {
            for (col, indices) in self.output_combinations.iter().enumerate() {
                values[[row, col]] = indices.iter().map(|&idx| input[idx]).product::<f64>();
            }
        }

        FeatureMatrix::new(values, self.output_columns.clone())
    }

    fn name(&self) -> &'static str {
        "PolynomialFeatures"
    }

    fn n_features_in(&self) -> usize {
        self.input_columns.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.output_columns.clone()
    }
}

/// Characters that make a column name ambiguous inside a product name.
const RESERVED: [char; 5] = [' ', '^', '*', '(', ')'];

fn needs_grouping(name: &str) -> bool {
    name.contains(&RESERVED[..])
}

/// Name of the monomial over `indices`, e.g. `a^2 b`; the bias is `1`.
///
/// When any input name contains a reserved character the products switch
/// to `*` as separator and such names are parenthesized, so the bigram
/// column `new york` times `new` reads `new*(new york)` while `new` times
/// `york` reads `new*york`. Degree-1 terms always keep the input name.
fn monomial_name(columns: &[String], indices: &[usize], explicit: bool) -> String {
    match indices {
        [] => return "1".to_string(),
        [idx] => return columns[*idx].clone(),
        _ => {}
    }
    let mut parts = Vec::new();
    let mut i = 0;
    while i < indices.len() {
        let idx = indices[i];
        let power = indices[i..].iter().take_while(|&&j| j == idx).count();
        let base = if explicit && needs_grouping(&columns[idx]) {
            format!("({})", columns[idx])
        } else {
            columns[idx].clone()
        };
        parts.push(if power == 1 {
            base
        } else {
            format!("{}^{}", base, power)
        });
        i += power;
    }
    parts.join(if explicit { "*" } else { " " })
}

/// Generate all polynomial combinations up to given degree.
fn generate_polynomial_combinations(
    n_features: usize,
    degree: usize,
    include_bias: bool,
    interaction_only: bool,
) -> Vec<Vec<usize>> {
    let mut combinations = Vec::new();

    if include_bias {
        combinations.push(Vec::new());
    }

    for d in 1..=degree {
        generate_degree_combinations(
            n_features,
            d,
            interaction_only,
            &mut Vec::new(),
            &mut combinations,
        );
    }

    combinations
}

/// Recursively generate the non-decreasing index sequences of one degree.
fn generate_degree_combinations(
    n_features: usize,
    remaining_degree: usize,
    interaction_only: bool,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if remaining_degree == 0 {
        result.push(current.clone());
        return;
    }

    // Strictly increasing indices when only interactions are wanted
    let start = match current.last() {
        None => 0,
        Some(&last) if interaction_only => last + 1,
        Some(&last) => last,
    };

    for i in start..n_features {
        current.push(i);
        generate_degree_combinations(n_features, remaining_degree - 1, interaction_only, current, result);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(names: &[&str], rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix::from_rows(names.iter().map(|s| s.to_string()).collect(), rows).unwrap()
    }

    #[test]
    fn test_polynomial_features_basic() {
        let data = matrix(&["a", "b"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let fitted = PolynomialFeatures::new()
            .with_include_bias(true)
            .fit(&data)
            .unwrap();
        let out = fitted.transform(&data).unwrap();

        assert_eq!(out.columns(), &["1", "a", "b", "a^2", "a b", "b^2"]);
        assert_eq!(
            out.to_rows(),
            vec![
                vec![1.0, 1.0, 2.0, 1.0, 2.0, 4.0],
                vec![1.0, 3.0, 4.0, 9.0, 12.0, 16.0]
            ]
        );
    }

    #[test]
    fn test_polynomial_features_degree_one_is_identity() {
        let data = matrix(&["x", "y", "z"], vec![vec![1.0, 2.0, 3.0]]);
        let out = PolynomialFeatures::new().with_degree(1).expand(&data).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_polynomial_features_degree_three_names() {
        let data = matrix(&["a", "b"], vec![vec![2.0, 3.0]]);
        let out = PolynomialFeatures::new().with_degree(3).expand(&data).unwrap();

        assert_eq!(
            out.columns(),
            &["a", "b", "a^2", "a b", "b^2", "a^3", "a^2 b", "a b^2", "b^3"]
        );
        assert_eq!(out.get(0, 6), 12.0);
    }

    #[test]
    fn test_polynomial_features_interaction_only() {
        let data = matrix(&["a", "b", "c"], vec![vec![2.0, 3.0, 5.0]]);
        let out = PolynomialFeatures::new()
            .with_degree(3)
            .with_interaction_only(true)
            .expand(&data)
            .unwrap();

        assert_eq!(out.columns(), &["a", "b", "c", "a b", "a c", "b c", "a b c"]);
        assert_eq!(out.to_rows(), vec![vec![2.0, 3.0, 5.0, 6.0, 10.0, 15.0, 30.0]]);
    }

    #[test]
    fn test_polynomial_features_bigram_names() {
        let data = matrix(&["new", "new york", "york"], vec![vec![1.0, 1.0, 2.0]]);
        let out = PolynomialFeatures::new().expand(&data).unwrap();

        assert_eq!(
            out.columns(),
            &[
                "new",
                "new york",
                "york",
                "new^2",
                "new*(new york)",
                "new*york",
                "(new york)^2",
                "(new york)*york",
                "york^2"
            ]
        );
        assert_eq!(out.get(0, 5), 2.0);
    }

    #[test]
    fn test_polynomial_features_name_collision() {
        // `a*b` at degree 1 and the product of `a` and `b` spell the same name
        let data = matrix(&["a", "a*b", "b"], vec![vec![1.0, 2.0, 3.0]]);
        match PolynomialFeatures::new().fit(&data) {
            Err(PreprocessingError::InvalidParameter(msg)) => assert!(msg.contains("'a*b'")),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_polynomial_features_no_duplicate_monomials() {
        let data = matrix(&["a", "b", "c"], vec![vec![1.0, 1.0, 1.0]]);
        for degree in 1..=4 {
            let fitted = PolynomialFeatures::new()
                .with_degree(degree)
                .fit(&data)
                .unwrap();
            let unique: HashSet<&Vec<usize>> = fitted.output_combinations().iter().collect();
            assert_eq!(unique.len(), fitted.n_features_out());
        }
    }

    #[test]
    fn test_polynomial_features_output_count() {
        // C(n + d, d) - 1 monomials without bias
        let data = matrix(&["a", "b", "c"], vec![vec![1.0, 1.0, 1.0]]);
        let fitted = PolynomialFeatures::new().with_degree(2).fit(&data).unwrap();
        assert_eq!(fitted.n_features_out(), 9);
    }

    #[test]
    fn test_polynomial_features_degree_zero() {
        let data = matrix(&["a"], vec![vec![1.0]]);
        let result = PolynomialFeatures::new().with_degree(0).fit(&data);
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_polynomial_features_column_mismatch() {
        let train = matrix(&["a", "b"], vec![vec![1.0, 2.0]]);
        let test = matrix(&["a", "c"], vec![vec![1.0, 2.0]]);

        let fitted = PolynomialFeatures::new().fit(&train).unwrap();
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_polynomial_features_nan_propagates() {
        let data = matrix(&["a", "b"], vec![vec![f64::NAN, 2.0]]);
        let out = PolynomialFeatures::new().expand(&data).unwrap();
        let row = &out.to_rows()[0];

        assert!(row[0].is_nan());
        assert_eq!(row[1], 2.0);
        assert!(row[3].is_nan());
        assert_eq!(row[4], 4.0);
    }

    #[test]
    fn test_polynomial_features_inverse_unsupported() {
        let data = matrix(&["a"], vec![vec![1.0]]);
        let fitted = PolynomialFeatures::new().fit(&data).unwrap();
        assert!(fitted.inverse_transform(&data).is_err());
    }

    #[test]
    fn test_polynomial_features_serialization() {
        let data = matrix(&["a", "b"], vec![vec![1.0, 2.0]]);
        let fitted = PolynomialFeatures::new().fit(&data).unwrap();

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fitted.save_to_file(temp_file.path()).unwrap();
        let loaded = FittedPolynomialFeatures::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.feature_names_out(), fitted.feature_names_out());
        assert_eq!(loaded.output_combinations(), fitted.output_combinations());
    }
}
