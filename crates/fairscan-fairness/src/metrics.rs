//! Per-group confusion metrics
//!
//! Row-aligned predictions are split by protected-attribute value and each
//! group gets its selection rate, true positive rate, and false positive
//! rate. Zero denominators yield 0 rather than NaN. Groups are reported in
//! first-seen row order so the reference group is stable for a given input.

use fairscan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Positive class label for binary outcomes
pub const POSITIVE_CLASS: i64 = 1;

/// Row-aligned ground truth and predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSet {
    /// True outcome per row
    pub y_true: Vec<i64>,

    /// Predicted outcome per row
    pub y_pred: Vec<i64>,
}

impl EvalSet {
    /// Build an evaluation set, rejecting misaligned inputs
    pub fn new(y_true: Vec<i64>, y_pred: Vec<i64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(Error::config(format!(
                "y_true has {} rows but y_pred has {}",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(Error::empty_dataset(
                "evaluation set has no rows".to_string(),
            ));
        }
        Ok(Self { y_true, y_pred })
    }

    /// Number of evaluated rows
    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    /// Whether the set holds no rows
    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }
}

/// Confusion-derived rates for one protected-attribute group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    /// Group label (rendered attribute value)
    pub group_label: String,

    /// Rows belonging to the group
    pub sample_size: usize,

    /// Share of rows predicted positive (selection rate)
    pub positive_rate: f64,

    /// TP / (TP + FN); 0 when the group has no actual positives
    pub true_positive_rate: f64,

    /// FP / (FP + TN); 0 when the group has no actual negatives
    pub false_positive_rate: f64,
}

/// Compute per-group metrics for one protected attribute
///
/// `group_labels` is row-aligned with `eval`; the returned groups keep
/// first-seen order.
pub fn group_metrics(eval: &EvalSet, group_labels: &[String]) -> Result<Vec<GroupMetrics>> {
    if group_labels.len() != eval.len() {
        return Err(Error::config(format!(
            "protected attribute has {} rows but evaluation set has {}",
            group_labels.len(),
            eval.len()
        )));
    }

    let mut order: Vec<&String> = Vec::new();
    let mut rows_by_group: BTreeMap<&String, Vec<usize>> = BTreeMap::new();
    for (row, label) in group_labels.iter().enumerate() {
        let bucket = rows_by_group.entry(label).or_insert_with(|| {
            order.push(label);
            Vec::new()
        });
        bucket.push(row);
    }

    let mut metrics = Vec::with_capacity(order.len());
    for label in order {
        let rows = &rows_by_group[label];

        let mut predicted_positive = 0usize;
        let mut true_positives = 0usize;
        let mut false_positives = 0usize;
        let mut actual_positives = 0usize;
        let mut actual_negatives = 0usize;

        for &row in rows {
            let actual = eval.y_true[row] == POSITIVE_CLASS;
            let predicted = eval.y_pred[row] == POSITIVE_CLASS;

            if predicted {
                predicted_positive += 1;
            }
            if actual {
                actual_positives += 1;
                if predicted {
                    true_positives += 1;
                }
            } else {
                actual_negatives += 1;
                if predicted {
                    false_positives += 1;
                }
            }
        }

        metrics.push(GroupMetrics {
            group_label: label.clone(),
            sample_size: rows.len(),
            positive_rate: safe_rate(predicted_positive, rows.len()),
            true_positive_rate: safe_rate(true_positives, actual_positives),
            false_positive_rate: safe_rate(false_positives, actual_negatives),
        });
    }

    Ok(metrics)
}

/// Numerator over denominator, 0 when the denominator is 0
pub(crate) fn safe_rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
