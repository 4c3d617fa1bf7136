//! Single-flow orchestration state machine: Idle → Loading → Success | Error.
//!
//! One `AnalysisFlow` owns the whole analysis lifecycle. At most one request
//! is ever in flight; a submit attempt while loading is refused, never
//! queued. There is no cancellation — an issued call runs to completion or
//! failure, and `reset` only stops the UI from waiting on it.

use tokio::sync::{watch, Mutex};

use crate::error::AppError;
use crate::gemini::Analyzer;
use crate::model::{AdInput, DiagnosticResult};

/// The one user-visible failure message. Underlying causes stay in the logs.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Analysis failed. Please try again later. Ensure the video isn't too large or corrupted.";

/// The full UI state as one tagged value. `Success` retains the exact input
/// that produced the result so the original copy/video can be re-rendered
/// alongside it.
#[derive(Debug, Clone)]
pub enum AnalysisState {
    Idle,
    Loading { input: AdInput },
    Success { input: AdInput, result: DiagnosticResult },
    Error { message: String },
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AnalysisState::Idle)
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Loading { .. } => "loading",
            AnalysisState::Success { .. } => "success",
            AnalysisState::Error { .. } => "error",
        }
    }
}

/// What happened to a submit attempt. `Analyzed` is the presentation
/// layer's cue to scroll/focus to the top of the result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Refused: another analysis is already in flight.
    Rejected,
    /// Completed and the flow now holds the result.
    Analyzed,
    /// Completed with a failure; the flow holds the generic error message.
    Failed,
}

/// Controller owning the single analysis flow.
///
/// State transitions are published on a watch channel so a presentation
/// layer can render purely from the latest state.
pub struct AnalysisFlow<A: Analyzer> {
    analyzer: A,
    state: Mutex<AnalysisState>,
    state_tx: watch::Sender<AnalysisState>,
}

impl<A: Analyzer> AnalysisFlow<A> {
    pub fn new(analyzer: A) -> Self {
        let (state_tx, _) = watch::channel(AnalysisState::Idle);
        Self {
            analyzer,
            state: Mutex::new(AnalysisState::Idle),
            state_tx,
        }
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> AnalysisState {
        self.state.lock().await.clone()
    }

    /// Submit a validated input for analysis.
    ///
    /// Refused while another analysis is loading. Otherwise transitions to
    /// `Loading`, awaits the analyzer, and lands in `Success` or `Error`.
    pub async fn submit(&self, input: AdInput) -> SubmitOutcome {
        {
            let mut state = self.state.lock().await;
            if state.is_loading() {
                tracing::warn!("submit refused: analysis already in flight");
                return SubmitOutcome::Rejected;
            }
            *state = AnalysisState::Loading {
                input: input.clone(),
            };
            self.publish(&state);
        }

        // The lock is not held across the await: the Loading state itself is
        // the concurrency guard, observable by concurrent submitters.
        let outcome = self.analyzer.analyze(&input).await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(result) => {
                *state = AnalysisState::Success { input, result };
                self.publish(&state);
                SubmitOutcome::Analyzed
            }
            Err(err) => {
                self.log_failure(&err);
                *state = AnalysisState::Error {
                    message: ANALYSIS_FAILED_MESSAGE.to_string(),
                };
                self.publish(&state);
                SubmitOutcome::Failed
            }
        }
    }

    /// Dismiss the error banner without touching anything else.
    /// Only meaningful from `Error`; a no-op everywhere else.
    pub async fn dismiss_error(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, AnalysisState::Error { .. }) {
            *state = AnalysisState::Idle;
            self.publish(&state);
        }
    }

    /// Return to a fresh input view, discarding the held result and input.
    /// Idempotent; a no-op while loading (there is no cancellation).
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        match *state {
            AnalysisState::Success { .. } | AnalysisState::Error { .. } => {
                *state = AnalysisState::Idle;
                self.publish(&state);
            }
            AnalysisState::Idle | AnalysisState::Loading { .. } => {}
        }
    }

    fn publish(&self, state: &AnalysisState) {
        tracing::debug!(state = state.label(), "flow transition");
        self.state_tx.send_replace(state.clone());
    }

    fn log_failure(&self, err: &AppError) {
        // The user sees one generic message; the cause (transport vs
        // contract violation vs upstream) must stay diagnosable in logs.
        tracing::error!(kind = err.kind(), error = %err, "analysis failed");
    }
}
