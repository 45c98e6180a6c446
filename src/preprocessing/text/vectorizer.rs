//! Count and TF-IDF vectorization of text documents.

use super::tokenizer::Tokenizer;
use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How term occurrences are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scoring {
    /// Raw term counts per document.
    #[default]
    Count,
    /// Term count multiplied by inverse document frequency.
    TfIdf,
}

/// Row normalization applied after scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    /// Divide each row by the sum of absolute values.
    L1,
    /// Divide each row by its Euclidean length.
    L2,
}

/// Text vectorizer producing one column per vocabulary term.
///
/// The vocabulary is the set of terms seen during fit, sorted
/// lexicographically. Terms outside the vocabulary are dropped at
/// transform time.
///
/// With [`Scoring::TfIdf`] the inverse document frequency of a term is
///
/// ```text
/// idf(t) = ln((1 + n) / (1 + df(t))) + 1     (smooth_idf, default)
/// idf(t) = ln(n / df(t)) + 1                 (otherwise)
/// ```
///
/// where `n` is the number of fit documents and `df(t)` the number of them
/// containing `t`. A term present in every document gets idf 1.0.
///
/// # Example
/// ```rust
/// use featurecraft::preprocessing::{FittedTransformer, TextVectorizer, Transformer};
///
/// let docs = vec![
///     "the cat sat".to_string(),
///     "the dog sat".to_string(),
/// ];
///
/// let fitted = TextVectorizer::counts().fit(&docs).unwrap();
/// let counts = fitted.transform(&docs).unwrap();
///
/// assert_eq!(counts.columns(), &["cat", "dog", "sat", "the"]);
/// assert_eq!(counts.to_rows()[0], vec![1.0, 0.0, 1.0, 1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct TextVectorizer {
    tokenizer: Tokenizer,
    scoring: Scoring,
    norm: Option<Norm>,
    smooth_idf: bool,
    binary: bool,
    min_df: usize,
    max_df: f64,
    max_features: Option<usize>,
    ngram_range: (usize, usize),
}

impl TextVectorizer {
    /// Raw counts, no normalization.
    pub fn counts() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            scoring: Scoring::Count,
            norm: None,
            smooth_idf: true,
            binary: false,
            min_df: 1,
            max_df: 1.0,
            max_features: None,
            ngram_range: (1, 1),
        }
    }

    /// Smoothed TF-IDF with L2-normalized rows.
    pub fn tfidf() -> Self {
        Self {
            scoring: Scoring::TfIdf,
            norm: Some(Norm::L2),
            ..Self::counts()
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the row normalization (`None` disables it).
    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    /// Add one to document counts when computing idf.
    pub fn with_smooth_idf(mut self, smooth: bool) -> Self {
        self.smooth_idf = smooth;
        self
    }

    /// Clip term counts to 1.
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Ignore terms found in fewer than `min_df` fit documents.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Ignore terms found in more than this fraction of fit documents.
    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    /// Keep only the `n` most document-frequent terms.
    pub fn with_max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Emit word n-grams with `min..=max` tokens, joined by a space.
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram_range = (min, max);
        self
    }

    fn validate(&self) -> Result<()> {
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(PreprocessingError::InvalidParameter(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({}, {})",
                lo, hi
            )));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.max_features == Some(0) {
            return Err(PreprocessingError::InvalidParameter(
                "max_features must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Learn the vocabulary (and idf weights) from any string-like documents.
    pub fn fit_documents<S: AsRef<str>>(&self, documents: &[S]) -> Result<FittedTextVectorizer> {
        self.validate()?;
        if documents.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit TextVectorizer on zero documents".to_string(),
            ));
        }

        let n_docs = documents.len();
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = terms(&self.tokenizer, self.ngram_range, doc.as_ref())
                .into_iter()
                .collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_df_count = self.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && (*df as f64) <= max_df_count)
            .collect();

        if let Some(max_n) = self.max_features {
            // Most frequent first, ties lexicographic; the map below re-sorts.
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(max_n);
        }

        if kept.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "TextVectorizer vocabulary is empty after fitting".to_string(),
            ));
        }

        let df_by_term: BTreeMap<String, usize> = kept.into_iter().collect();
        let idf: Option<Vec<f64>> = match self.scoring {
            Scoring::Count => None,
            Scoring::TfIdf => Some(
                df_by_term
                    .values()
                    .map(|&df| idf_weight(n_docs, df, self.smooth_idf))
                    .collect(),
            ),
        };
        let vocabulary: BTreeMap<String, usize> = df_by_term
            .into_keys()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        tracing::debug!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            scoring = ?self.scoring,
            "fitted TextVectorizer"
        );

        Ok(FittedTextVectorizer {
            tokenizer: self.tokenizer.clone(),
            ngram_range: self.ngram_range,
            vocabulary,
            idf,
            norm: self.norm,
            binary: self.binary,
        })
    }
}

impl Default for TextVectorizer {
    fn default() -> Self {
        Self::counts()
    }
}

fn idf_weight(n_docs: usize, df: usize, smooth: bool) -> f64 {
    let (n, df) = (n_docs as f64, df as f64);
    if smooth {
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    } else {
        (n / df).ln() + 1.0
    }
}

/// Tokens of `text` expanded into n-grams.
fn terms(tokenizer: &Tokenizer, (lo, hi): (usize, usize), text: &str) -> Vec<String> {
    let tokens = tokenizer.tokenize(text);
    let mut out = Vec::new();
    for n in lo..=hi {
        if tokens.len() >= n {
            out.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
    }
    out
}

/// Fitted TextVectorizer ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedTextVectorizer {
    tokenizer: Tokenizer,
    ngram_range: (usize, usize),
    /// Term to column index, in lexicographic order.
    vocabulary: BTreeMap<String, usize>,
    /// Per-column idf weights, present for TF-IDF scoring.
    idf: Option<Vec<f64>>,
    norm: Option<Norm>,
    binary: bool,
}

impl FittedTextVectorizer {
    /// Get the learned vocabulary.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Get the idf weight of each column, if scoring is TF-IDF.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Vectorize any string-like documents.
    pub fn transform_documents<S: AsRef<str>>(&self, documents: &[S]) -> Result<FeatureMatrix> {
        let mut values = Array2::<f64>::zeros((documents.len(), self.vocabulary.len()));

        for (row, doc) in documents.iter().enumerate() {
            let mut counts: HashMap<usize, f64> = HashMap::new();
            for term in terms(&self.tokenizer, self.ngram_range, doc.as_ref()) {
                if let Some(&idx) = self.vocabulary.get(&term) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
            for (idx, count) in counts {
                values[[row, idx]] = if self.binary { 1.0 } else { count };
            }
        }

        if let Some(idf) = &self.idf {
            for mut row in values.axis_iter_mut(Axis(0)) {
                for (cell, weight) in row.iter_mut().zip(idf) {
                    *cell *= weight;
                }
            }
        }

        if let Some(norm) = self.norm {
            for mut row in values.axis_iter_mut(Axis(0)) {
                let length = match norm {
                    Norm::L1 => row.iter().map(|v| v.abs()).sum::<f64>(),
                    Norm::L2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
                };
                if length > 0.0 {
                    row.mapv_inplace(|v| v / length);
                }
            }
        }

        FeatureMatrix::new(values, self.feature_names_out())
    }
}

impl Transformer for TextVectorizer {
    type Input = [String];
    type Output = FeatureMatrix;
    type Fitted = FittedTextVectorizer;

    fn fit(&self, data: &[String]) -> Result<FittedTextVectorizer> {
        self.fit_documents(data)
    }
}

impl FittedTransformer for FittedTextVectorizer {
    type Input = [String];
    type Output = FeatureMatrix;

    fn transform(&self, data: &[String]) -> Result<FeatureMatrix> {
        self.transform_documents(data)
    }

    fn name(&self) -> &'static str {
        "TextVectorizer"
    }

    fn n_features_in(&self) -> usize {
        1
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.vocabulary.keys().cloned().collect()
    }
}
