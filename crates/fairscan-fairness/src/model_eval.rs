//! Binary model evaluation
//!
//! Confusion-matrix metrics with zero-division guards, plus a rank-based
//! ROC-AUC (Mann-Whitney form with tie-averaged ranks) that is only defined
//! when the ground truth carries exactly two classes and scores are
//! provided.

use crate::metrics::{safe_rate, EvalSet, POSITIVE_CLASS};
use fairscan_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Binary confusion matrix counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

/// Evaluation metrics for a binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Share of correct predictions
    pub accuracy: f64,

    /// TP / (TP + FP); 0 when nothing was predicted positive
    pub precision: f64,

    /// TP / (TP + FN); 0 when there are no actual positives
    pub recall: f64,

    /// Harmonic mean of precision and recall; 0 when both are 0
    pub f1_score: f64,

    /// Rank-based ROC-AUC; `None` without scores or for non-binary truth
    pub roc_auc: Option<f64>,

    /// Underlying confusion counts
    pub confusion: ConfusionMatrix,
}

/// Evaluate binary predictions, optionally with positive-class scores
pub fn evaluate_binary(eval: &EvalSet, y_score: Option<&[f64]>) -> Result<ModelMetrics> {
    if let Some(scores) = y_score {
        if scores.len() != eval.len() {
            return Err(Error::config(format!(
                "y_score has {} rows but evaluation set has {}",
                scores.len(),
                eval.len()
            )));
        }
    }

    let mut confusion = ConfusionMatrix {
        true_positives: 0,
        false_positives: 0,
        true_negatives: 0,
        false_negatives: 0,
    };

    for (&actual, &predicted) in eval.y_true.iter().zip(&eval.y_pred) {
        match (actual == POSITIVE_CLASS, predicted == POSITIVE_CLASS) {
            (true, true) => confusion.true_positives += 1,
            (false, true) => confusion.false_positives += 1,
            (false, false) => confusion.true_negatives += 1,
            (true, false) => confusion.false_negatives += 1,
        }
    }

    let correct = confusion.true_positives + confusion.true_negatives;
    let accuracy = safe_rate(correct, eval.len());
    let precision = safe_rate(
        confusion.true_positives,
        confusion.true_positives + confusion.false_positives,
    );
    let recall = safe_rate(
        confusion.true_positives,
        confusion.true_positives + confusion.false_negatives,
    );
    let f1_score = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    let roc_auc = y_score.and_then(|scores| rank_auc(&eval.y_true, scores));

    Ok(ModelMetrics {
        accuracy,
        precision,
        recall,
        f1_score,
        roc_auc,
        confusion,
    })
}

/// Mann-Whitney AUC over positive-class scores
///
/// Ties receive averaged ranks. Returns `None` unless the ground truth holds
/// both a positive and a negative class.
fn rank_auc(y_true: &[i64], scores: &[f64]) -> Option<f64> {
    let classes: std::collections::BTreeSet<i64> = y_true.iter().copied().collect();
    if classes.len() != 2 || !classes.contains(&POSITIVE_CLASS) {
        return None;
    }

    let n_pos = y_true.iter().filter(|&&y| y == POSITIVE_CLASS).count();
    let n_neg = y_true.len() - n_pos;

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0_f64; scores.len()];
    let mut i = 0;
    while i < indices.len() {
        let mut j = i;
        while j + 1 < indices.len() && scores[indices[j + 1]] == scores[indices[i]] {
            j += 1;
        }
        // ranks are 1-based; tied scores share the mean rank of their span
        let mean_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &indices[i..=j] {
            ranks[idx] = mean_rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y == POSITIVE_CLASS)
        .map(|(_, &rank)| rank)
        .sum();

    let u = positive_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}
