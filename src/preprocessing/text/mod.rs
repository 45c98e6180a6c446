//! Text feature extraction.
//!
//! [`TextVectorizer`] turns a collection of documents into a
//! [`FeatureMatrix`](crate::data::FeatureMatrix) with one column per
//! vocabulary term, scored either as raw counts or as TF-IDF. Documents are
//! split into words by a [`Tokenizer`]; the same tokenizer is stored in the
//! fitted vectorizer so fit and transform always agree.

mod tokenizer;
mod vectorizer;

pub use tokenizer::Tokenizer;
pub use vectorizer::{FittedTextVectorizer, Norm, Scoring, TextVectorizer};
