//! Demographic disparity summary
//!
//! A descriptive (non-thresholded) breakdown per protected-attribute group:
//! approval rate as a percentage, per-group accuracy, and positive/negative
//! outcome counts, plus the spread between the best and worst approved
//! groups. Intended for reports where the pass/fail tables of the fairness
//! scorer are too coarse.

use crate::metrics::{safe_rate, EvalSet, POSITIVE_CLASS};
use fairscan_core::{Column, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDisparity {
    /// Group label (rendered attribute value)
    pub group_label: String,

    /// Rows belonging to the group
    pub sample_size: usize,

    /// Share of rows predicted positive, as a percentage
    pub approval_rate_pct: f64,

    /// Share of rows where prediction matches ground truth
    pub accuracy: f64,

    /// Rows predicted positive
    pub positive_count: usize,

    /// Rows predicted negative
    pub negative_count: usize,
}

/// Per-attribute disparity breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicDisparityReport {
    /// Protected attribute column name
    pub attribute: String,

    /// Groups in first-seen row order
    pub groups: Vec<GroupDisparity>,

    /// Highest minus lowest approval rate across groups, in percentage points
    pub max_disparity_pct: f64,
}

/// Summarize approval disparity across the groups of one attribute
pub fn demographic_disparity(
    eval: &EvalSet,
    attribute: &Column,
) -> Result<DemographicDisparityReport> {
    if attribute.len() != eval.len() {
        return Err(Error::config(format!(
            "protected attribute '{}' has {} rows but evaluation set has {}",
            attribute.name,
            attribute.len(),
            eval.len()
        )));
    }

    let mut order: Vec<String> = Vec::new();
    let mut rows_by_group: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, value) in attribute.values.iter().enumerate() {
        let label = value.render();
        rows_by_group
            .entry(label.clone())
            .or_insert_with(|| {
                order.push(label);
                Vec::new()
            })
            .push(row);
    }

    let mut groups = Vec::with_capacity(order.len());
    for label in order {
        let rows = &rows_by_group[&label];

        let positive_count = rows
            .iter()
            .filter(|&&row| eval.y_pred[row] == POSITIVE_CLASS)
            .count();
        let correct = rows
            .iter()
            .filter(|&&row| eval.y_pred[row] == eval.y_true[row])
            .count();

        groups.push(GroupDisparity {
            group_label: label,
            sample_size: rows.len(),
            approval_rate_pct: safe_rate(positive_count, rows.len()) * 100.0,
            accuracy: safe_rate(correct, rows.len()),
            positive_count,
            negative_count: rows.len() - positive_count,
        });
    }

    let max_rate = groups
        .iter()
        .map(|g| g.approval_rate_pct)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_rate = groups
        .iter()
        .map(|g| g.approval_rate_pct)
        .fold(f64::INFINITY, f64::min);
    let max_disparity_pct = if groups.is_empty() {
        0.0
    } else {
        max_rate - min_rate
    };

    Ok(DemographicDisparityReport {
        attribute: attribute.name.clone(),
        groups,
        max_disparity_pct,
    })
}
