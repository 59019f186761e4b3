//! Orchestrator Integration Tests
//!
//! Hybrid routing, one-way backend downgrade, result merging, progress
//! events, and the full combined report.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fairscan_core::{Column, Dataset, Error, Result, RiskLevel, Value};
use fairscan_detectors::{
    ColumnRiskResult, DatasetRiskReport, DetectionBackend, FastBackend,
};
use fairscan_engine::{
    AnalysisMode, AnalysisOrchestrator, AnalysisRequest, ProgressEvent, ProgressLog,
};
use fairscan_fairness::EvalSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn text_column(name: &str, values: &[&str]) -> Column {
    Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
}

fn clean_dataset() -> Dataset {
    Dataset::new(
        "t",
        vec![
            text_column("category", &["alpha", "beta", "gamma"]),
            text_column("approved", &["1", "0", "1"]),
        ],
    )
}

/// Enough identical national-ID rows to push the untrained fast path past
/// the high-risk threshold (10 matches at weight 1.0 give a regex score of
/// 1.0 and a combined score of 0.6)
fn risky_dataset() -> Dataset {
    Dataset::new(
        "t",
        vec![
            text_column("ssn", &["123-45-6789"; 10]),
            text_column("category", &["alpha"; 10]),
        ],
    )
}

/// Deep backend delegating to a fast backend while counting invocations
struct CountingBackend {
    inner: FastBackend,
    dataset_calls: Rc<Cell<usize>>,
}

impl CountingBackend {
    fn boxed(dataset_calls: Rc<Cell<usize>>) -> Result<Box<dyn DetectionBackend>> {
        Ok(Box::new(Self {
            inner: FastBackend::new()?,
            dataset_calls,
        }))
    }
}

impl DetectionBackend for CountingBackend {
    fn name(&self) -> &str {
        "probe"
    }

    fn analyze_column(&self, column: &Column) -> Result<ColumnRiskResult> {
        self.inner.analyze_column(column)
    }

    fn analyze_dataset(&self, dataset: &Dataset) -> Result<DatasetRiskReport> {
        self.dataset_calls.set(self.dataset_calls.get() + 1);
        self.inner.analyze_dataset(dataset)
    }
}

#[test]
fn test_hybrid_without_flags_never_invokes_deep_backend() {
    let calls = Rc::new(Cell::new(0));
    let probe = Rc::clone(&calls);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Hybrid, move || {
            CountingBackend::boxed(probe)
        })
        .unwrap();

    let output = orchestrator.analyze_risk(&clean_dataset()).unwrap();

    assert_eq!(calls.get(), 0);
    assert_eq!(output.report.analysis_method, "pattern_only");
}

#[test]
fn test_hybrid_escalates_only_flagged_columns() {
    let calls = Rc::new(Cell::new(0));
    let probe = Rc::clone(&calls);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Hybrid, move || {
            CountingBackend::boxed(probe)
        })
        .unwrap();

    let output = orchestrator.analyze_risk(&risky_dataset()).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(output.report.analysis_method, "hybrid_pattern_probe");

    let ssn = &output.report.column_analysis["ssn"];
    let deep = ssn.deep_findings.as_ref().expect("flagged column carries deep findings");
    assert_eq!(deep.backend, "probe");
    assert_eq!(deep.result.column_name, "ssn");

    // the unflagged column is untouched
    assert!(output.report.column_analysis["category"]
        .deep_findings
        .is_none());
}

#[test]
fn test_failed_backend_downgrades_permanently() {
    let attempts = Rc::new(Cell::new(0));
    let probe = Rc::clone(&attempts);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Hybrid, move || {
            probe.set(probe.get() + 1);
            Err(Error::backend("deep model weights missing".to_string()))
        })
        .unwrap();

    assert_eq!(orchestrator.mode(), AnalysisMode::Fast);

    // repeated calls run fast and never retry construction
    let first = orchestrator.analyze_risk(&risky_dataset()).unwrap();
    let second = orchestrator.analyze_risk(&risky_dataset()).unwrap();
    assert_eq!(attempts.get(), 1);
    assert_eq!(first.report.analysis_method, "fast_pattern");
    assert_eq!(second.report.analysis_method, "fast_pattern");
}

#[test]
fn test_progress_events_for_escalated_run() {
    let log = Rc::new(RefCell::new(ProgressLog::new()));
    let calls = Rc::new(Cell::new(0));
    let probe = Rc::clone(&calls);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Hybrid, move || {
            CountingBackend::boxed(probe)
        })
        .unwrap()
        .with_progress_sink(Box::new(Rc::clone(&log)));

    orchestrator.analyze_risk(&risky_dataset()).unwrap();

    let log = log.borrow();
    let events = log.events();
    assert!(matches!(events[0], ProgressEvent::AnalysisStarted { .. }));
    assert!(events.iter().any(|e| matches!(
        e,
        ProgressEvent::FastScreeningCompleted {
            high_risk_columns: 1,
            ..
        }
    )));
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::DeepAnalysisStarted { columns: 1, .. })));
    assert!(matches!(
        events.last().unwrap(),
        ProgressEvent::AnalysisCompleted { .. }
    ));
}

#[test]
fn test_full_report_combines_all_sections() {
    init_tracing();
    let calls = Rc::new(Cell::new(0));
    let probe = Rc::clone(&calls);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Hybrid, move || {
            CountingBackend::boxed(probe)
        })
        .unwrap();

    let dataset = Dataset::new(
        "loans",
        vec![
            text_column("gender", &["a", "a", "b", "b"]),
            text_column("email", &["x@y.com", "q@r.org", "s@t.net", "u@v.io"]),
            text_column("approved", &["1", "0", "1", "0"]),
        ],
    );
    let eval = EvalSet::new(vec![1, 0, 1, 0], vec![1, 1, 0, 0]).unwrap();
    let attributes = vec!["gender".to_string()];

    let report = orchestrator
        .analyze_full(AnalysisRequest {
            dataset: &dataset,
            protected_attributes: &attributes,
            target_column: "approved",
            eval: Some(&eval),
            model_metrics: None,
        })
        .unwrap();

    assert_eq!(report.dataset_name, "loans");
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.total_columns, 3);
    assert_eq!(report.analysis_mode, AnalysisMode::Hybrid);
    assert_eq!(report.risk_categories.categories.len(), 5);
    assert!(report.bias_analysis.statistical.is_some());

    // an email column is a direct identifier, so Art. 32 must be flagged
    assert!(report
        .gdpr_compliance
        .articles_applicable
        .iter()
        .any(|a| a.starts_with("Art. 32")));
}

#[test]
fn test_accurate_mode_runs_deep_backend_directly() {
    let calls = Rc::new(Cell::new(0));
    let probe = Rc::clone(&calls);
    let mut orchestrator =
        AnalysisOrchestrator::with_backend(AnalysisMode::Accurate, move || {
            CountingBackend::boxed(probe)
        })
        .unwrap();

    let output = orchestrator.analyze_risk(&clean_dataset()).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(output.report.analysis_method, "probe");
    assert_eq!(output.report.risk_level, RiskLevel::Low);
}
