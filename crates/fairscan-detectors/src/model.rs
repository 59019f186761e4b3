//! Learned text-category classifier
//!
//! A multinomial naive-Bayes model over the TF-IDF representation with an
//! explicit two-state lifecycle: `Untrained -> Trained`. Every inference
//! entry point checks the state once and fails with [`Error::NotTrained`]
//! before touching parameters. Training replaces the full parameter bundle
//! atomically; the category vocabulary is re-derived from the corpus on
//! every call, never extended additively.

use crate::tfidf::{SparseVector, TfidfParams, TfidfVectorizer};
use fairscan_core::{Error, Result, CLASSIFY_CAP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Artifact schema version; bumped on any incompatible layout change
pub const SCHEMA_VERSION: u32 = 1;

/// Laplace smoothing constant for feature likelihoods
const SMOOTHING: f64 = 1.0;

/// Naive-Bayes parameters: per-class log priors and feature log likelihoods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesParams {
    /// Log prior per class, indexed like `labels`
    pub log_priors: Vec<f64>,

    /// Per-class feature log likelihoods, dense over the vocabulary
    pub feature_log_probs: Vec<Vec<f64>>,
}

/// Persisted parameter bundle for a trained classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModelArtifact {
    /// Artifact layout version; load rejects mismatches
    pub schema_version: u32,

    /// Fitted text representation
    pub vectorizer: TfidfVectorizer,

    /// Fitted classifier parameters
    pub classifier: BayesParams,

    /// Category vocabulary, index-aligned with classifier parameters
    pub labels: Vec<String>,

    /// Whether the bundle holds usable parameters
    pub is_trained: bool,
}

/// Outcome of classifying a batch of text samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchClassification {
    /// Majority-vote category across the batch
    pub predicted_category: String,

    /// Mean top-class probability across the batch, in [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone)]
struct TrainedModel {
    vectorizer: TfidfVectorizer,
    bayes: BayesParams,
    labels: Vec<String>,
}

#[derive(Debug, Clone)]
enum ClassifierState {
    Untrained,
    Trained(TrainedModel),
}

/// Two-state learned classifier over the weighted n-gram representation
#[derive(Debug, Clone)]
pub struct TextCategoryClassifier {
    params: TfidfParams,
    state: ClassifierState,
}

impl TextCategoryClassifier {
    /// Create an untrained classifier with default representation parameters
    pub fn new() -> Self {
        Self::with_params(TfidfParams::default())
    }

    /// Create an untrained classifier with explicit representation parameters
    pub fn with_params(params: TfidfParams) -> Self {
        Self {
            params,
            state: ClassifierState::Untrained,
        }
    }

    /// Build a classifier directly from a persisted parameter bundle
    pub fn from_artifact(artifact: TrainedModelArtifact) -> Result<Self> {
        if artifact.schema_version != SCHEMA_VERSION {
            return Err(Error::config(format!(
                "model artifact schema version {} is not supported (expected {})",
                artifact.schema_version, SCHEMA_VERSION
            )));
        }

        let state = if artifact.is_trained {
            ClassifierState::Trained(TrainedModel {
                vectorizer: artifact.vectorizer,
                bayes: artifact.classifier,
                labels: artifact.labels,
            })
        } else {
            ClassifierState::Untrained
        };

        Ok(Self {
            params: TfidfParams::default(),
            state,
        })
    }

    /// Whether the classifier holds trained parameters
    pub fn is_trained(&self) -> bool {
        matches!(self.state, ClassifierState::Trained(_))
    }

    /// Category vocabulary, empty when untrained
    pub fn labels(&self) -> &[String] {
        match &self.state {
            ClassifierState::Trained(model) => &model.labels,
            ClassifierState::Untrained => &[],
        }
    }

    /// Train on a labelled corpus, replacing any prior parameters
    ///
    /// The label vocabulary is re-derived from `corpus`; categories absent
    /// from it are forgotten. Fails on an empty corpus.
    pub fn train(&mut self, corpus: &[(String, String)]) -> Result<()> {
        if corpus.is_empty() {
            return Err(Error::config("training corpus is empty"));
        }

        let texts: Vec<String> = corpus.iter().map(|(text, _)| text.clone()).collect();

        let mut vectorizer = TfidfVectorizer::new(self.params.clone());
        vectorizer.fit(&texts);

        // Fresh label vocabulary, sorted for a stable index assignment
        let mut labels: Vec<String> = corpus
            .iter()
            .map(|(_, label)| label.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        labels.sort();

        let label_index: BTreeMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let n_classes = labels.len();
        let vocab_size = vectorizer.vocabulary_size();

        let mut class_counts = vec![0usize; n_classes];
        let mut feature_sums = vec![vec![0.0f64; vocab_size]; n_classes];

        for (text, label) in corpus {
            let class = label_index[label.as_str()];
            class_counts[class] += 1;
            for (idx, weight) in vectorizer.transform(text) {
                feature_sums[class][idx] += weight;
            }
        }

        let n_docs = corpus.len() as f64;
        let log_priors: Vec<f64> = class_counts
            .iter()
            .map(|&c| (c as f64 / n_docs).ln())
            .collect();

        let feature_log_probs: Vec<Vec<f64>> = feature_sums
            .iter()
            .map(|sums| {
                let total: f64 = sums.iter().sum::<f64>() + SMOOTHING * vocab_size as f64;
                sums.iter()
                    .map(|&s| ((s + SMOOTHING) / total).ln())
                    .collect()
            })
            .collect();

        info!(
            samples = corpus.len(),
            vocabulary = vocab_size,
            classes = n_classes,
            "trained text category classifier"
        );

        self.state = ClassifierState::Trained(TrainedModel {
            vectorizer,
            bayes: BayesParams {
                log_priors,
                feature_log_probs,
            },
            labels,
        });

        Ok(())
    }

    /// Classify a batch of samples; at most [`CLASSIFY_CAP`] are evaluated
    ///
    /// Returns the majority-vote category (ties broken toward the
    /// lexicographically smaller label) and the mean top-class probability.
    /// Fails with [`Error::NotTrained`] when no parameters are loaded.
    pub fn classify(&self, samples: &[String]) -> Result<BatchClassification> {
        let model = match &self.state {
            ClassifierState::Trained(model) => model,
            ClassifierState::Untrained => return Err(Error::NotTrained),
        };

        if samples.is_empty() {
            return Err(Error::detector("no samples to classify"));
        }

        let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
        let mut confidence_sum = 0.0;
        let mut evaluated = 0usize;

        for text in samples.iter().take(CLASSIFY_CAP) {
            let encoded = model.vectorizer.transform(text);
            let (class, top_prob) = model.posterior_argmax(&encoded);
            *votes.entry(model.labels[class].as_str()).or_insert(0) += 1;
            confidence_sum += top_prob;
            evaluated += 1;
        }

        // BTreeMap iteration order makes the smaller label win ties
        let predicted_category = votes
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(label, _)| label.to_string())
            .unwrap_or_default();

        debug!(
            category = %predicted_category,
            samples = evaluated,
            "classified sample batch"
        );

        Ok(BatchClassification {
            predicted_category,
            confidence: confidence_sum / evaluated as f64,
        })
    }

    /// Serialize the trained parameter bundle to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let model = match &self.state {
            ClassifierState::Trained(model) => model,
            ClassifierState::Untrained => return Err(Error::NotTrained),
        };

        let artifact = TrainedModelArtifact {
            schema_version: SCHEMA_VERSION,
            vectorizer: model.vectorizer.clone(),
            classifier: model.bayes.clone(),
            labels: model.labels.clone(),
            is_trained: true,
        };

        let json = serde_json::to_string(&artifact)?;
        fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "saved model artifact");

        Ok(())
    }

    /// Load a parameter bundle from a JSON file, replacing current state
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let json = fs::read_to_string(path.as_ref())?;
        let artifact: TrainedModelArtifact = serde_json::from_str(&json)?;

        if artifact.schema_version != SCHEMA_VERSION {
            return Err(Error::config(format!(
                "model artifact schema version {} is not supported (expected {})",
                artifact.schema_version, SCHEMA_VERSION
            )));
        }

        self.state = if artifact.is_trained {
            ClassifierState::Trained(TrainedModel {
                vectorizer: artifact.vectorizer,
                bayes: artifact.classifier,
                labels: artifact.labels,
            })
        } else {
            ClassifierState::Untrained
        };

        info!(path = %path.as_ref().display(), "loaded model artifact");
        Ok(())
    }
}

impl Default for TextCategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainedModel {
    /// Argmax class under the naive-Bayes posterior with its probability
    fn posterior_argmax(&self, encoded: &SparseVector) -> (usize, f64) {
        let scores: Vec<f64> = self
            .bayes
            .log_priors
            .iter()
            .enumerate()
            .map(|(class, prior)| {
                prior
                    + encoded
                        .iter()
                        .map(|&(idx, w)| w * self.bayes.feature_log_probs[class][idx])
                        .sum::<f64>()
            })
            .collect();

        // Softmax over joint log scores, shifted for stability
        let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max_score).exp()).collect();
        let total: f64 = exps.iter().sum();

        let mut best = 0;
        for (i, &e) in exps.iter().enumerate() {
            if e > exps[best] {
                best = i;
            }
        }

        (best, exps[best] / total)
    }
}
