//! Word tokenization shared by fit and transform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "i", "in", "is", "it", "its", "of", "on", "or", "she", "that", "the", "they", "this", "to",
    "was", "we", "were", "with", "you",
];

/// Splits documents into word tokens.
///
/// Text is optionally lowercased, then split on every character that is not
/// alphanumeric. Tokens shorter than `min_token_length` characters and stop
/// words are dropped. Stop words are compared after lowercasing.
///
/// # Example
/// ```rust
/// use featurecraft::preprocessing::text::Tokenizer;
///
/// let tokenizer = Tokenizer::new().with_stop_words(["the"]);
/// assert_eq!(tokenizer.tokenize("The cat, the HAT!"), vec!["cat", "hat"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tokenizer {
    lowercase: bool,
    min_token_length: usize,
    stop_words: BTreeSet<String>,
}

impl Tokenizer {
    /// Lowercasing tokenizer keeping every non-empty token.
    pub fn new() -> Self {
        Self {
            lowercase: true,
            min_token_length: 1,
            stop_words: BTreeSet::new(),
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Drop tokens with fewer characters than `len`.
    pub fn with_min_token_length(mut self, len: usize) -> Self {
        self.min_token_length = len;
        self
    }

    /// Add stop words.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Add a short list of common English function words.
    pub fn with_english_stop_words(self) -> Self {
        self.with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Split `text` into tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let processed = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        processed
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .filter(|s| s.chars().count() >= self.min_token_length)
            .filter(|s| !self.stop_words.contains(&s.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
