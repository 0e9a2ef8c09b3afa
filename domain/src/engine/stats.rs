//! Running statistics kept per engine (diagnostics only)

use crate::engine::insight::Insight;
use serde::{Deserialize, Serialize};

/// Invocation statistics for one engine
///
/// Never read by synthesis; exposed for diagnostics and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineStats {
    /// Successful invocations
    pub invocations: u64,
    /// Failed or timed-out invocations
    pub failures: u64,
    /// Sum of confidences over successful invocations
    pub cumulative_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insight: Option<Insight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl EngineStats {
    /// Record a successful invocation
    pub fn record_success(&mut self, insight: &Insight) {
        self.invocations += 1;
        self.cumulative_confidence += insight.confidence().value();
        self.last_insight = Some(insight.clone());
    }

    /// Record a failed invocation
    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.failures += 1;
        self.last_error = Some(reason.into());
    }

    /// Mean confidence of successful invocations (0.0 when none)
    pub fn average_confidence(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.cumulative_confidence / self.invocations as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_success_and_failure() {
        let mut stats = EngineStats::default();
        assert_eq!(stats.average_confidence(), 0.0);

        stats.record_success(&Insight::new("a", "d", "p", "one", 0.2));
        stats.record_success(&Insight::new("a", "d", "p", "two", 0.4));
        stats.record_failure("boom");

        assert_eq!(stats.invocations, 2);
        assert_eq!(stats.failures, 1);
        assert!((stats.average_confidence() - 0.3).abs() < 1e-9);
        assert_eq!(stats.last_insight.as_ref().unwrap().content(), "two");
        assert_eq!(stats.last_error.as_deref(), Some("boom"));
    }
}
