//! Weighted n-gram text representation
//!
//! A TF-IDF vectorizer over word n-grams. Fitting derives the vocabulary and
//! inverse-document-frequency weights from a corpus; transforming encodes
//! text samples as sparse weighted vectors for the learned classifier.
//! Fitting is deterministic: vocabulary order is fixed by (corpus frequency,
//! term) so repeated training on the same corpus yields identical parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vectorizer hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Maximum vocabulary size, kept by descending corpus frequency
    pub max_features: usize,

    /// Smallest n-gram length
    pub ngram_min: usize,

    /// Largest n-gram length
    pub ngram_max: usize,

    /// Minimum number of documents a term must appear in
    pub min_df: usize,

    /// Maximum fraction of documents a term may appear in
    pub max_df: f64,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_min: 1,
            ngram_max: 3,
            min_df: 2,
            max_df: 0.8,
        }
    }
}

/// A sparse TF-IDF document vector as (vocabulary index, weight) pairs
pub type SparseVector = Vec<(usize, f64)>;

/// TF-IDF vectorizer with fit/transform lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer
    pub fn new(params: TfidfParams) -> Self {
        Self {
            params,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Vocabulary size after fitting
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Fit vocabulary and IDF weights on a corpus, replacing any prior fit
    pub fn fit(&mut self, corpus: &[String]) {
        let n_docs = corpus.len();
        let max_df_count = (self.params.max_df * n_docs as f64).floor() as usize;

        // Document frequency and total frequency per term
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_freq: BTreeMap<String, usize> = BTreeMap::new();

        for text in corpus {
            let terms = self.ngrams(text);
            let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
            for term in &terms {
                *seen.entry(term.as_str()).or_insert(0) += 1;
            }
            for (term, count) in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
                *total_freq.entry(term.to_string()).or_insert(0) += count;
            }
        }

        // Filter by document frequency bounds, then keep the most frequent
        // terms up to max_features with a deterministic tie order.
        let mut kept: Vec<(String, usize)> = doc_freq
            .iter()
            .filter(|(_, &df)| df >= self.params.min_df && df <= max_df_count.max(1))
            .map(|(term, &df)| (term.clone(), df))
            .collect();
        kept.sort_by(|a, b| {
            let fa = total_freq[&a.0];
            let fb = total_freq[&b.0];
            fb.cmp(&fa).then_with(|| a.0.cmp(&b.0))
        });
        kept.truncate(self.params.max_features);
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        self.vocabulary = kept
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.clone(), idx))
            .collect();

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, df) in &kept {
            let idx = self.vocabulary[term];
            self.idf[idx] = ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0;
        }
    }

    /// Encode one text sample as an L2-normalized sparse TF-IDF vector
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.ngrams(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm: f64 = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }

        vector
    }

    /// Lowercased alphanumeric tokens expanded to n-grams
    fn ngrams(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let mut terms = Vec::new();
        for n in self.params.ngram_min..=self.params.ngram_max {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}
