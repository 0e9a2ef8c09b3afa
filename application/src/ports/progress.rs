//! Progress notification port
//!
//! Defines the interface for reporting progress while engines are
//! dispatched during a consultation or deliberation.

/// How a single engine invocation ended
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    Succeeded { confidence: f64 },
    Failed { reason: String },
    TimedOut { timeout_ms: u64 },
}

impl EngineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineOutcome::Succeeded { .. })
    }
}

/// Callback for progress updates during dispatch
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the engine set is selected, before any invocation starts
    fn on_dispatch_start(&self, total_engines: usize);

    /// Called as each engine settles (completion order, not selection order)
    fn on_engine_complete(&self, engine_id: &str, outcome: &EngineOutcome);

    /// Called after every dispatched invocation has settled
    fn on_dispatch_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _total_engines: usize) {}
    fn on_engine_complete(&self, _engine_id: &str, _outcome: &EngineOutcome) {}
    fn on_dispatch_complete(&self) {}
}
