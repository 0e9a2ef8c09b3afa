//! Registered engine handle
//!
//! Wraps an [`Engine`] with the mutable state the registry tracks for it:
//! lifecycle status and running statistics. The engine itself is shared,
//! never copied.

use crate::ports::engine::{Engine, EngineError, EvaluationContext};
use council_domain::{EngineProfile, EngineStats, EngineStatus, Insight};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct EngineState {
    status: EngineStatus,
    stats: EngineStats,
}

/// An engine as held by the registry
pub struct RegisteredEngine {
    engine: Arc<dyn Engine>,
    state: Mutex<EngineState>,
}

impl RegisteredEngine {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            state: Mutex::new(EngineState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        self.engine.profile().id()
    }

    pub fn profile(&self) -> &EngineProfile {
        self.engine.profile()
    }

    /// The wrapped engine
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    pub fn status(&self) -> EngineStatus {
        self.state().status
    }

    pub fn stats(&self) -> EngineStats {
        self.state().stats.clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.status() == EngineStatus::Disabled
    }

    /// Enable (back to `Idle`) or disable the engine
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.state();
        state.status = match (enabled, state.status) {
            (false, _) => EngineStatus::Disabled,
            (true, EngineStatus::Disabled) => EngineStatus::Idle,
            (true, current) => current,
        };
    }

    /// Run one evaluation, driving status and statistics.
    ///
    /// `Idle/Error → Evaluating → Idle` on success, `→ Error` on failure.
    /// A disabled engine keeps its `Disabled` status throughout.
    pub async fn invoke(
        &self,
        input: &str,
        context: &EvaluationContext,
    ) -> Result<Insight, EngineError> {
        self.begin();
        let result = self.engine.evaluate(input, context).await;
        self.settle(&result);
        result
    }

    pub(crate) fn begin(&self) {
        self.transition(EngineStatus::Evaluating);
    }

    /// Fold a finished evaluation into status and statistics.
    pub(crate) fn settle(&self, result: &Result<Insight, EngineError>) {
        match result {
            Ok(insight) => {
                let mut state = self.state();
                state.stats.record_success(insight);
                if state.status != EngineStatus::Disabled {
                    state.status = EngineStatus::Idle;
                }
            }
            Err(e) => self.record_failure(e.to_string()),
        }
    }

    /// Record a failure that happened outside `evaluate`'s own result
    /// (timeout, panic).
    pub fn record_failure(&self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(engine = %self.id(), reason = %reason, "Engine invocation failed");
        let mut state = self.state();
        state.stats.record_failure(reason);
        if state.status != EngineStatus::Disabled {
            state.status = EngineStatus::Error;
        }
    }

    pub fn record_timeout(&self, timeout: Duration) {
        self.record_failure(format!("timed out after {}ms", timeout.as_millis()));
    }

    fn transition(&self, status: EngineStatus) {
        let mut state = self.state();
        if state.status != EngineStatus::Disabled {
            state.status = status;
        }
    }

    /// Serializable view for persistence and diagnostics
    pub fn snapshot(&self) -> EngineSnapshot {
        let state = self.state();
        EngineSnapshot {
            profile: self.profile().clone(),
            status: state.status,
            stats: state.stats.clone(),
        }
    }
}

impl std::fmt::Debug for RegisteredEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredEngine")
            .field("id", &self.id())
            .field("status", &self.status())
            .finish()
    }
}

/// Profile, status and statistics of one engine at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub profile: EngineProfile,
    pub status: EngineStatus,
    pub stats: EngineStats,
}
