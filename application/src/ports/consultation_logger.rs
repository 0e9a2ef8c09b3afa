//! Port for structured consultation logging.
//!
//! Defines the [`ConsultationLogger`] trait for recording consultation
//! events (completed consultations, contained engine failures, deliberation
//! outcomes) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures machine-readable
//! records (JSONL) that a persistence collaborator may keep.

use serde_json::Value;

/// A structured consultation event for logging.
pub struct ConsultationEvent {
    /// Event type identifier (e.g., "consultation_completed", "engine_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConsultationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging consultation events.
///
/// `log` is synchronous and non-fallible; logging failures never disturb
/// a consultation.
pub trait ConsultationLogger: Send + Sync {
    fn log(&self, event: ConsultationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConsultationLogger;

impl ConsultationLogger for NoConsultationLogger {
    fn log(&self, _event: ConsultationEvent) {}
}
