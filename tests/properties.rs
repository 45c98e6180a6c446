//! Property-based tests for transformer invariants using proptest.

use proptest::prelude::*;

use featurecraft::data::{Dataset, FeatureMatrix};
use featurecraft::preprocessing::{
    DegeneratePolicy, FittedTransformer, ImputeStrategy, MinMaxScaler, OneHotEncoder, Pipeline,
    PolynomialFeatures, PreprocessingError, SimpleImputer, StandardScaler, TextVectorizer,
    Transformer,
};
use std::collections::HashSet;

const CATEGORIES: [&str; 5] = ["alder", "birch", "cedar", "maple", "oak"];
const WORDS: [&str; 6] = ["red", "green", "blue", "small", "large", "round"];

fn matrix(columns: Vec<Vec<f64>>) -> FeatureMatrix {
    FeatureMatrix::from_columns(
        columns
            .into_iter()
            .enumerate()
            .map(|(j, values)| (format!("c{}", j), values))
            .collect(),
    )
    .unwrap()
}

/// 1..4 columns of equal length, finite values.
fn finite_columns() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..4, 2usize..20).prop_flat_map(|(cols, rows)| {
        prop::collection::vec(prop::collection::vec(-1e6f64..1e6, rows), cols)
    })
}

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

// --- Encoding properties ---

proptest! {
    #[test]
    fn one_hot_marks_exactly_one_seen_category(
        train in prop::collection::vec(0usize..CATEGORIES.len(), 1..30),
        test in prop::collection::vec(0usize..CATEGORIES.len() + 1, 1..30),
    ) {
        let train_data = Dataset::from_column("tree", train.iter().map(|&i| CATEGORIES[i]));
        let seen: HashSet<&str> = train.iter().map(|&i| CATEGORIES[i]).collect();
        let fitted = OneHotEncoder::new().fit(&train_data).unwrap();

        // index CATEGORIES.len() stands for a value never seen at fit
        let labels: Vec<&str> = test
            .iter()
            .map(|&i| CATEGORIES.get(i).copied().unwrap_or("willow"))
            .collect();
        let out = fitted
            .transform(&Dataset::from_column("tree", labels.iter().copied()))
            .unwrap();

        prop_assert_eq!(out.n_columns(), seen.len());
        for (row, label) in out.values().outer_iter().zip(&labels) {
            prop_assert!(row.iter().all(|&v| v == 0.0 || v == 1.0));
            let expected = if seen.contains(label) { 1.0 } else { 0.0 };
            prop_assert_eq!(row.sum(), expected);
        }
    }
}

// --- Text properties ---

proptest! {
    #[test]
    fn tfidf_term_in_every_document_has_unit_idf(
        docs in prop::collection::vec(prop::collection::vec(0usize..WORDS.len(), 0..6), 1..15),
    ) {
        let documents: Vec<String> = docs
            .iter()
            .map(|words| {
                let mut tokens = vec!["common"];
                tokens.extend(words.iter().map(|&w| WORDS[w]));
                tokens.join(" ")
            })
            .collect();

        let fitted = TextVectorizer::tfidf().fit_documents(&documents).unwrap();
        let idx = fitted.vocabulary()["common"];
        let idf = fitted.idf().unwrap();

        prop_assert_eq!(idf[idx], 1.0);
        prop_assert!(idf.iter().all(|v| v.is_finite() && *v >= 1.0));
    }
}

// --- Imputation properties ---

proptest! {
    #[test]
    fn imputing_complete_data_is_identity(
        columns in finite_columns(),
        strategy in prop_oneof![
            Just(ImputeStrategy::Mean),
            Just(ImputeStrategy::Median),
            Just(ImputeStrategy::MostFrequent),
            Just(ImputeStrategy::ForwardFill),
            Just(ImputeStrategy::BackwardFill),
        ],
    ) {
        let data = matrix(columns);
        let out = SimpleImputer::new(strategy).fit_transform(&data).unwrap();
        prop_assert_eq!(out, data);
    }

    #[test]
    fn mean_imputation_leaves_no_gaps(
        columns in finite_columns(),
        holes in prop::collection::vec(any::<bool>(), 20),
    ) {
        let columns: Vec<Vec<f64>> = columns
            .into_iter()
            .map(|col| {
                let mut col: Vec<f64> = col
                    .iter()
                    .zip(&holes)
                    .map(|(&v, &hole)| if hole { f64::NAN } else { v })
                    .collect();
                // keep at least one observed value
                col[0] = 1.0;
                col
            })
            .collect();
        let data = matrix(columns);

        let out = SimpleImputer::new(ImputeStrategy::Mean).fit_transform(&data).unwrap();
        prop_assert!(!out.has_missing());
    }
}

// --- Scaling properties ---

proptest! {
    #[test]
    fn min_max_output_within_unit_range(columns in finite_columns()) {
        for col in &columns {
            let min = col.iter().copied().fold(f64::INFINITY, f64::min);
            let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assume!(max > min);
        }
        let data = matrix(columns);
        let out = MinMaxScaler::new().fit_transform(&data).unwrap();

        prop_assert!(out.values().iter().all(|v| (0.0..=1.0).contains(v)));
        for (scaled, original) in out
            .values()
            .columns()
            .into_iter()
            .zip(data.values().columns())
        {
            let (argmin, argmax) = original.iter().enumerate().fold(
                (0, 0),
                |(lo, hi), (i, &v)| {
                    (
                        if v < original[lo] { i } else { lo },
                        if v > original[hi] { i } else { hi },
                    )
                },
            );
            prop_assert_eq!(scaled[argmin], 0.0);
            prop_assert_eq!(scaled[argmax], 1.0);
        }
    }

    #[test]
    fn constant_columns_are_degenerate(value in -1e12f64..1e12, n in 1usize..50) {
        let data = matrix(vec![vec![value; n]]);

        prop_assert!(matches!(
            StandardScaler::new().fit(&data),
            Err(PreprocessingError::DegenerateColumn { .. })
        ), "expected DegenerateColumn error from StandardScaler");
        prop_assert!(matches!(
            MinMaxScaler::new().fit(&data),
            Err(PreprocessingError::DegenerateColumn { .. })
        ), "expected DegenerateColumn error from MinMaxScaler");

        let kept = StandardScaler::new()
            .with_degenerate(DegeneratePolicy::PassThrough)
            .fit_transform(&data)
            .unwrap();
        prop_assert_eq!(kept, data);
    }

    #[test]
    fn standard_scaler_inverse_recovers_input(columns in finite_columns()) {
        for col in &columns {
            let min = col.iter().copied().fold(f64::INFINITY, f64::min);
            let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assume!(max - min > 1e-3);
        }
        let data = matrix(columns);
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let back = fitted.inverse_transform(&fitted.transform(&data).unwrap()).unwrap();

        for (a, b) in back.values().iter().zip(data.values().iter()) {
            prop_assert!((a - b).abs() <= 1e-6 * (1.0 + b.abs()), "{} != {}", a, b);
        }
    }
}

// --- Polynomial properties ---

proptest! {
    #[test]
    fn polynomial_degree_one_is_identity(columns in finite_columns(), bias in any::<bool>()) {
        let data = matrix(columns);
        let out = PolynomialFeatures::new()
            .with_degree(1)
            .with_include_bias(bias)
            .expand(&data)
            .unwrap();

        if bias {
            prop_assert!(out.values().column(0).iter().all(|&v| v == 1.0));
            prop_assert_eq!(out.select(&data.columns().iter().map(String::as_str).collect::<Vec<_>>()).unwrap(), data);
        } else {
            prop_assert_eq!(out, data);
        }
    }

    #[test]
    fn polynomial_monomials_are_unique(k in 1usize..5, degree in 1usize..4) {
        let data = matrix(vec![vec![1.0]; k]);
        let fitted = PolynomialFeatures::new().with_degree(degree).fit(&data).unwrap();

        let combinations = fitted.output_combinations();
        let distinct: HashSet<&Vec<usize>> = combinations.iter().collect();
        prop_assert_eq!(distinct.len(), combinations.len());
        // monomials of total degree 1..=d in k variables
        prop_assert_eq!(combinations.len(), binomial(k + degree, degree) - 1);
    }
}

// --- Pipeline properties ---

proptest! {
    #[test]
    fn pipeline_transform_is_deterministic(columns in finite_columns()) {
        let data = matrix(columns);
        let fitted = Pipeline::new()
            .add_simple_imputer(SimpleImputer::new(ImputeStrategy::Median))
            .add_minmax_scaler(MinMaxScaler::new().with_degenerate(DegeneratePolicy::PassThrough))
            .add_polynomial_features(PolynomialFeatures::new())
            .fit(&data)
            .unwrap();

        let a = fitted.transform(&data).unwrap();
        let b = fitted.transform(&data).unwrap();
        let bits = |m: &FeatureMatrix| m.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a), bits(&b));
    }
}
