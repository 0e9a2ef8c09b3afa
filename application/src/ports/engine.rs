//! Engine port
//!
//! Defines the single evaluation contract every capability provider
//! implements. Concrete engines implement [`Engine`] directly; engines too
//! simple to warrant a type are built from a callback with
//! [`FnEngine`](super::functional_engine::FnEngine). The registry and the
//! orchestrator cannot tell the two apart.

use crate::use_cases::consult::ConsultOptions;
use async_trait::async_trait;
use council_domain::{EngineProfile, Insight};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors raised by an engine's own `evaluate`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Evaluation failed: {0}")]
    Failed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Evaluation cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn failed(message: impl Into<String>) -> Self {
        EngineError::Failed(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }
}

/// How the engine is being invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationMode {
    /// Part of a multi-engine consultation
    #[default]
    Consult,
    /// Part of a dilemma deliberation
    Deliberate,
    /// Direct single-engine invocation
    Direct,
}

/// Context passed to every evaluation
///
/// Carries the original query options and a cancellation token that is
/// cancelled when the invocation's time budget expires. Honoring the token
/// is best effort; the orchestrator never depends on it.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    pub mode: InvocationMode,
    /// Options of the consultation that triggered this invocation
    pub options: ConsultOptions,
    /// Traditions requested by a deliberation (empty otherwise)
    pub traditions: Vec<String>,
    /// Time budget granted to this invocation, once dispatched
    pub timeout: Option<Duration>,
    pub cancellation: CancellationToken,
}

impl EvaluationContext {
    pub fn new(mode: InvocationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: ConsultOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_traditions(mut self, traditions: Vec<String>) -> Self {
        self.traditions = traditions;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Derive the context for one dispatched invocation: a child token and
    /// the granted budget.
    pub fn for_invocation(&self, timeout: Duration) -> Self {
        Self {
            mode: self.mode,
            options: self.options.clone(),
            traditions: self.traditions.clone(),
            timeout: Some(timeout),
            cancellation: self.cancellation.child_token(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// A pluggable, domain-scoped capability provider
///
/// `evaluate` either produces a complete [`Insight`] or fails with an
/// [`EngineError`]; there is no partial output. Insight construction clamps
/// confidence to the ceiling, so implementations cannot exceed it.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Immutable identity of this engine
    fn profile(&self) -> &EngineProfile;

    fn id(&self) -> &str {
        self.profile().id()
    }

    fn has_capability(&self, tag: &str) -> bool {
        self.profile().has_capability(tag)
    }

    fn in_domain(&self, domain: &str) -> bool {
        self.profile().in_domain(domain)
    }

    /// Turn an input into a scored insight
    async fn evaluate(
        &self,
        input: &str,
        context: &EvaluationContext,
    ) -> Result<Insight, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        profile: EngineProfile,
    }

    #[async_trait]
    impl Engine for Echo {
        fn profile(&self) -> &EngineProfile {
            &self.profile
        }

        async fn evaluate(
            &self,
            input: &str,
            _context: &EvaluationContext,
        ) -> Result<Insight, EngineError> {
            if input.is_empty() {
                return Err(EngineError::invalid_input("empty input"));
            }
            Ok(self.profile.insight(input, 0.9))
        }
    }

    fn echo() -> Echo {
        Echo {
            profile: EngineProfile::builder("echo")
                .domain("testing")
                .subdomain("mirrors")
                .capability("repeat")
                .build()
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_concrete_engine_output_is_clamped() {
        let engine = echo();
        let insight = engine
            .evaluate("hello", &EvaluationContext::default())
            .await
            .unwrap();
        assert_eq!(insight.content(), "hello");
        assert_eq!(insight.confidence().value(), 0.618);
    }

    #[tokio::test]
    async fn test_concrete_engine_error() {
        let err = echo()
            .evaluate("", &EvaluationContext::default())
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidInput("empty input".to_string()));
    }

    #[test]
    fn test_default_membership_queries() {
        let engine = echo();
        assert_eq!(engine.id(), "echo");
        assert!(engine.has_capability("repeat"));
        assert!(!engine.has_capability("shout"));
        assert!(engine.in_domain("mirrors"));
    }

    #[test]
    fn test_invocation_context_uses_child_token() {
        let parent = EvaluationContext::new(InvocationMode::Consult);
        let child = parent.for_invocation(Duration::from_millis(50));
        assert_eq!(child.timeout, Some(Duration::from_millis(50)));

        child.cancellation.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.for_invocation(Duration::from_millis(50));
        parent.cancellation.cancel();
        assert!(other.is_cancelled());
    }
}
