//! Fairness Scoring Integration Tests
//!
//! End-to-end checks of the group fairness pipeline on a skewed two-group
//! cohort, plus determinism of the derived metrics.

use fairscan_core::{Column, Dataset, Severity, Value};
use fairscan_fairness::{group_metrics, EvalSet, FairnessScorer};
use proptest::prelude::*;

/// Two groups of 50: group A approved at 0.9, group B at 0.3
fn skewed_cohort() -> (Dataset, EvalSet) {
    let mut groups = Vec::with_capacity(100);
    let mut y_true = Vec::with_capacity(100);
    let mut y_pred = Vec::with_capacity(100);

    for i in 0..50 {
        groups.push(Value::from("A"));
        y_true.push(1);
        y_pred.push(if i < 45 { 1 } else { 0 });
    }
    for i in 0..50 {
        groups.push(Value::from("B"));
        y_true.push(1);
        y_pred.push(if i < 15 { 1 } else { 0 });
    }

    let dataset = Dataset::new("loans", vec![Column::new("group", groups)]);
    let eval = EvalSet::new(y_true, y_pred).unwrap();
    (dataset, eval)
}

#[test]
fn test_skewed_cohort_metric_values() {
    let (dataset, eval) = skewed_cohort();
    let report = FairnessScorer::new()
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    let analysis = &report.attribute_analysis["group"];
    assert_eq!(analysis.reference_group, "A");
    assert_eq!(analysis.comparison_group, "B");
    assert_eq!(analysis.group_metrics[0].sample_size, 50);
    assert_eq!(analysis.group_metrics[0].positive_rate, 0.9);
    assert_eq!(analysis.group_metrics[1].positive_rate, 0.3);

    // 0.3 / 0.9 rounded to three decimals
    assert_eq!(analysis.disparate_impact, 0.333);
    assert_eq!(analysis.statistical_parity_difference, -0.6);
}

#[test]
fn test_skewed_cohort_fails_with_high_violations() {
    let (dataset, eval) = skewed_cohort();
    let report = FairnessScorer::new()
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    assert!(!report.passes_fairness_checks);

    let di = report
        .violations
        .iter()
        .find(|v| v.metric == "disparate_impact")
        .unwrap();
    assert_eq!(di.severity, Severity::High);

    let spd = report
        .violations
        .iter()
        .find(|v| v.metric == "statistical_parity_difference")
        .unwrap();
    assert_eq!(spd.severity, Severity::High);
}

#[test]
fn test_violations_carry_their_thresholds() {
    let (dataset, eval) = skewed_cohort();
    let report = FairnessScorer::new()
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    let di = report
        .violations
        .iter()
        .find(|v| v.metric == "disparate_impact")
        .unwrap();
    assert_eq!(di.threshold, 0.8);

    let spd = report
        .violations
        .iter()
        .find(|v| v.metric == "statistical_parity_difference")
        .unwrap();
    assert_eq!(spd.threshold, 0.1);

    let eod = report
        .violations
        .iter()
        .find(|v| v.metric == "equal_opportunity_difference")
        .unwrap();
    assert_eq!(eod.threshold, 0.1);
}

#[test]
fn test_report_includes_demographic_breakdown() {
    let (dataset, eval) = skewed_cohort();
    let report = FairnessScorer::new()
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    let disparity = &report.demographic_analysis["group"];
    assert_eq!(disparity.groups.len(), 2);
    assert_eq!(disparity.groups[0].group_label, "A");
    assert_eq!(disparity.groups[0].approval_rate_pct, 90.0);
    assert_eq!(disparity.groups[1].approval_rate_pct, 30.0);
    assert_eq!(disparity.max_disparity_pct, 60.0);
}

#[test]
fn test_metrics_are_deterministic() {
    let (dataset, eval) = skewed_cohort();
    let scorer = FairnessScorer::new();

    let first = scorer
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();
    let second = scorer
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    let a = &first.attribute_analysis["group"];
    let b = &second.attribute_analysis["group"];
    assert_eq!(a.disparate_impact, b.disparate_impact);
    assert_eq!(a.statistical_parity_difference, b.statistical_parity_difference);
    assert_eq!(a.equal_opportunity_difference, b.equal_opportunity_difference);
    assert_eq!(first.bias_score, second.bias_score);
    assert_eq!(first.violations, second.violations);
}

#[test]
fn test_bias_score_reflects_violated_metrics() {
    let (dataset, eval) = skewed_cohort();
    let report = FairnessScorer::new()
        .analyze(&dataset, &eval, &["group".to_string()])
        .unwrap();

    // all three sub-scores are driven by the same skew: |1 - 0.333| = 0.667,
    // |−0.6| × 5 capped at 1, |eod| × 5 capped at 1 (y_true is all ones, so
    // TPR equals the positive rate)
    assert_eq!(report.bias_score, 0.889);
    assert!(report.bias_score <= 1.0);
}

proptest! {
    #[test]
    fn prop_group_rates_stay_in_unit_interval(
        outcomes in proptest::collection::vec((0_i64..2, 0_i64..2), 1..60),
        group_count in 1_usize..4,
    ) {
        let y_true: Vec<i64> = outcomes.iter().map(|&(t, _)| t).collect();
        let y_pred: Vec<i64> = outcomes.iter().map(|&(_, p)| p).collect();
        let labels: Vec<String> = (0..outcomes.len())
            .map(|i| format!("g{}", i % group_count))
            .collect();

        let eval = EvalSet::new(y_true, y_pred).unwrap();
        let metrics = group_metrics(&eval, &labels).unwrap();

        let total: usize = metrics.iter().map(|m| m.sample_size).sum();
        prop_assert_eq!(total, outcomes.len());
        for group in &metrics {
            prop_assert!((0.0..=1.0).contains(&group.positive_rate));
            prop_assert!((0.0..=1.0).contains(&group.true_positive_rate));
            prop_assert!((0.0..=1.0).contains(&group.false_positive_rate));
        }
    }
}
