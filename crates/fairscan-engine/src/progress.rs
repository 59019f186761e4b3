//! Progress event stream
//!
//! The orchestrator emits structured events instead of printing progress.
//! Consumers implement [`ProgressSink`]; the built-in [`ProgressLog`]
//! collects events in memory, mostly for tests and post-run inspection.

use fairscan_core::RiskLevel;
use serde::Serialize;

/// One step of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// An analysis call began
    AnalysisStarted {
        /// Mode string the run executes under
        mode: String,
    },

    /// The fast screening pass over the full dataset finished
    FastScreeningCompleted {
        /// Dataset-level risk level from the fast pass
        risk_level: RiskLevel,

        /// Number of columns flagged for escalation
        high_risk_columns: usize,
    },

    /// The deep backend was invoked on flagged columns
    DeepAnalysisStarted {
        /// Backend name
        backend: String,

        /// Number of escalated columns
        columns: usize,
    },

    /// The deep backend could not be constructed; mode fell back to fast
    BackendDowngraded {
        /// Construction failure description
        reason: String,
    },

    /// An analysis call finished
    AnalysisCompleted {
        /// Method tag recorded in the report
        analysis_method: String,

        /// Wall-clock duration of the call
        elapsed_ms: u64,
    },
}

/// Consumer of orchestrator progress events
pub trait ProgressSink {
    /// Receive one event
    fn emit(&mut self, event: &ProgressEvent);
}

/// In-memory sink collecting every emitted event
#[derive(Debug, Default)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far, in order
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }
}

impl ProgressSink for ProgressLog {
    fn emit(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Shared-handle sink, lets a caller keep reading a log it handed to the
/// orchestrator
impl<S: ProgressSink> ProgressSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn emit(&mut self, event: &ProgressEvent) {
        self.borrow_mut().emit(event);
    }
}
