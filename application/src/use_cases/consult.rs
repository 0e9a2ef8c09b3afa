//! Consultation input and output types.
//!
//! [`ConsultOptions`] narrows which engines take part and how their insights
//! are combined; [`ConsultationResult`] is what the caller gets back. A
//! consultation never fails: degraded quality shows up as fewer insights,
//! recorded failures and a lower overall confidence.

use super::dispatch::EngineFailure;
use council_domain::{Insight, SynthesisStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call options of a consultation
///
/// Selection precedence: an explicit `engines` list wins, then
/// `domains`/`capabilities`, then every registered engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsultOptions {
    /// Domains to consult (union across domains)
    pub domains: Vec<String>,
    /// Capability tags every selected engine must advertise
    pub capabilities: Vec<String>,
    /// Explicit engine ids; unknown ids are silently dropped
    pub engines: Vec<String>,
    /// Overrides the orchestrator's default strategy
    pub strategy: Option<SynthesisStrategy>,
    /// Overrides the orchestrator's engine cap
    pub max_engines: Option<usize>,
    /// Overrides the orchestrator's per-engine timeout
    pub timeout: Option<Duration>,
}

impl ConsultOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn with_capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.push(tag.into());
        self
    }

    pub fn with_capabilities<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_engines<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_strategy(mut self, strategy: SynthesisStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_max_engines(mut self, max: usize) -> Self {
        self.max_engines = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Aggregate facts about one consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationMetadata {
    pub strategy: SynthesisStrategy,
    /// Engines dispatched
    pub selected: usize,
    pub succeeded: usize,
    /// Engines whose evaluation errored or panicked
    pub failed: usize,
    pub timed_out: usize,
    pub elapsed_ms: u64,
    /// RFC 3339 completion time
    pub timestamp: String,
    /// Set when selection matched nothing
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_engines: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of [`Orchestrator::consult`](super::orchestrator::Orchestrator::consult)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationResult {
    pub question: String,
    /// Insights that succeeded in time, in selection order
    pub insights: Vec<Insight>,
    /// `None` when no insight survived
    pub synthesis: Option<Insight>,
    /// Ids of every dispatched engine, in selection order
    pub consulted: Vec<String>,
    /// Confidence of the synthesis, `0.0` without one
    pub overall_confidence: f64,
    #[serde(default)]
    pub failures: Vec<EngineFailure>,
    pub metadata: ConsultationMetadata,
}

impl ConsultationResult {
    pub fn has_synthesis(&self) -> bool {
        self.synthesis.is_some()
    }

    /// Whether any dispatched engine failed to contribute
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn synthesis_content(&self) -> Option<&str> {
        self.synthesis.as_ref().map(Insight::content)
    }
}
