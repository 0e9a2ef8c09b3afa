//! Orchestrator use case
//!
//! Selects engines from a [`SharedRegistry`], dispatches a question to all of
//! them concurrently and reduces the surviving insights with a
//! [`SynthesisStrategy`].

use super::consult::{ConsultOptions, ConsultationMetadata, ConsultationResult};
use super::dispatch::{
    DispatchOutcome, EngineFailure, FailureKind, Invocation, dispatch, invoke_with_budget,
};
use crate::config::OrchestratorConfig;
use crate::ports::consultation_logger::{
    ConsultationEvent, ConsultationLogger, NoConsultationLogger,
};
use crate::ports::engine::{EngineError, EvaluationContext, InvocationMode};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::registry::{EngineQuery, EngineRegistry, RegisteredEngine, SharedRegistry};
use council_domain::{Insight, synthesize};
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors of a direct single-engine invocation
///
/// `consult` and `deliberate` never return these; they contain failures.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Engine not found: {0}")]
    NotFound(String),

    #[error("Engine is disabled: {0}")]
    Disabled(String),

    #[error("Engine {engine} timed out after {}ms", .timeout.as_millis())]
    Timeout { engine: String, timeout: Duration },

    #[error("Engine {engine} failed: {source}")]
    ProviderFailure {
        engine: String,
        #[source]
        source: EngineError,
    },
}

/// Consults registered engines and synthesizes their answers
pub struct Orchestrator {
    pub(crate) registry: SharedRegistry,
    pub(crate) config: OrchestratorConfig,
    pub(crate) logger: Arc<dyn ConsultationLogger>,
}

impl Orchestrator {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            config: OrchestratorConfig::default(),
            logger: Arc::new(NoConsultationLogger),
        }
    }

    /// Orchestrator over the process-wide default registry
    pub fn with_global_registry() -> Self {
        Self::new(EngineRegistry::global())
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConsultationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Consult engines without progress reporting
    pub async fn consult(&self, input: &str, options: ConsultOptions) -> ConsultationResult {
        self.consult_with_progress(input, options, &NoProgress).await
    }

    /// Consult engines, reporting each settled invocation to `progress`.
    ///
    /// Never fails. Engines that error, panic or exceed their budget are
    /// recorded in `failures` and contribute nothing.
    pub async fn consult_with_progress(
        &self,
        input: &str,
        options: ConsultOptions,
        progress: &dyn ProgressNotifier,
    ) -> ConsultationResult {
        let started = Instant::now();
        let strategy = options.strategy.unwrap_or(self.config.default_strategy);
        let timeout = options.timeout.unwrap_or(self.config.default_timeout);
        let max_engines = options.max_engines.unwrap_or(self.config.max_engines);

        let engines = self.select(&options, max_engines);
        let consulted: Vec<String> = engines.iter().map(|e| e.id().to_string()).collect();

        info!(
            strategy = %strategy,
            engines = engines.len(),
            timeout_ms = timeout.as_millis() as u64,
            "Starting consultation"
        );

        if engines.is_empty() {
            warn!("No engines matched the consultation");
            let result = ConsultationResult {
                question: input.to_string(),
                insights: Vec::new(),
                synthesis: None,
                consulted,
                overall_confidence: 0.0,
                failures: Vec::new(),
                metadata: ConsultationMetadata {
                    strategy,
                    selected: 0,
                    succeeded: 0,
                    failed: 0,
                    timed_out: 0,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    no_engines: true,
                    note: Some("no engines matched the selection".to_string()),
                },
            };
            self.log_consultation(&result);
            return result;
        }

        let context = EvaluationContext::new(InvocationMode::Consult).with_options(options);
        let outcome = dispatch(&engines, input, &context, timeout, progress).await;
        let timed_out = outcome.count(FailureKind::Timeout);
        let DispatchOutcome { insights, failures } = outcome;
        self.log_failures(&failures);

        let synthesis = synthesize(strategy, &insights);
        let overall_confidence = synthesis
            .as_ref()
            .map(|s| s.confidence().value())
            .unwrap_or(0.0);
        let note = synthesis
            .is_none()
            .then(|| "no engine produced an insight".to_string());

        let result = ConsultationResult {
            question: input.to_string(),
            metadata: ConsultationMetadata {
                strategy,
                selected: engines.len(),
                succeeded: insights.len(),
                failed: failures.len() - timed_out,
                timed_out,
                elapsed_ms: started.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
                no_engines: false,
                note,
            },
            insights,
            synthesis,
            consulted,
            overall_confidence,
            failures,
        };

        info!(
            succeeded = result.metadata.succeeded,
            failed = result.metadata.failed,
            timed_out = result.metadata.timed_out,
            confidence = overall_confidence,
            elapsed_ms = result.metadata.elapsed_ms,
            "Consultation complete"
        );
        self.log_consultation(&result);
        result
    }

    /// Invoke one engine directly.
    ///
    /// Unlike `consult`, an unknown id, a timeout or the engine's own error
    /// are returned to the caller.
    pub async fn evaluate_with(&self, id: &str, input: &str) -> Result<Insight, OrchestratorError> {
        let engine = self
            .read_registry(|registry| registry.get(id))
            .ok_or_else(|| OrchestratorError::NotFound(id.to_string()))?;
        if engine.is_disabled() {
            return Err(OrchestratorError::Disabled(id.to_string()));
        }

        let timeout = self.config.default_timeout;
        let context = EvaluationContext::new(InvocationMode::Direct).for_invocation(timeout);
        debug!(engine = %id, timeout_ms = timeout.as_millis() as u64, "Direct invocation");

        match invoke_with_budget(&engine, input, &context, timeout).await {
            Invocation::Succeeded(insight) => Ok(insight),
            Invocation::Failed(source) => Err(OrchestratorError::ProviderFailure {
                engine: id.to_string(),
                source,
            }),
            Invocation::Panicked => Err(OrchestratorError::ProviderFailure {
                engine: id.to_string(),
                source: EngineError::failed("engine panicked"),
            }),
            Invocation::TimedOut(timeout) => Err(OrchestratorError::Timeout {
                engine: id.to_string(),
                timeout,
            }),
        }
    }

    /// Snapshot the selected engines under one read lock.
    ///
    /// The union order is kept when truncating to `max_engines`. With no
    /// selectors only enabled engines are candidates, so the cap is filled
    /// by engines that will run; explicit and filtered selections drop
    /// disabled engines after truncation.
    fn select(&self, options: &ConsultOptions, max_engines: usize) -> Vec<Arc<RegisteredEngine>> {
        self.read_registry(|registry| {
            let mut selected: Vec<Arc<RegisteredEngine>> = if !options.engines.is_empty() {
                options
                    .engines
                    .iter()
                    .filter_map(|id| {
                        let engine = registry.get(id);
                        if engine.is_none() {
                            debug!(engine = %id, "Dropping unknown engine id");
                        }
                        engine
                    })
                    .collect()
            } else if !options.domains.is_empty() {
                options
                    .domains
                    .iter()
                    .flat_map(|domain| {
                        registry.query(
                            &EngineQuery::new()
                                .domain(domain.clone())
                                .capabilities(options.capabilities.iter().cloned()),
                        )
                    })
                    .collect()
            } else if !options.capabilities.is_empty() {
                registry.query(
                    &EngineQuery::new().capabilities(options.capabilities.iter().cloned()),
                )
            } else {
                registry
                    .all()
                    .into_iter()
                    .filter(|engine| !engine.is_disabled())
                    .collect()
            };

            let mut seen = HashSet::new();
            selected.retain(|engine| seen.insert(engine.id().to_string()));
            selected.truncate(max_engines);
            selected.retain(|engine| !engine.is_disabled());
            selected
        })
    }

    pub(crate) fn read_registry<T>(&self, f: impl FnOnce(&EngineRegistry) -> T) -> T {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        f(&registry)
    }

    pub(crate) fn log_failures(&self, failures: &[EngineFailure]) {
        for failure in failures {
            let event_type = match failure.kind {
                FailureKind::Timeout => "engine_timed_out",
                FailureKind::Error | FailureKind::Panic => "engine_failed",
            };
            self.logger.log(ConsultationEvent::new(
                event_type,
                json!({
                    "engine_id": failure.engine_id,
                    "kind": failure.kind,
                    "message": failure.message,
                }),
            ));
        }
    }

    fn log_consultation(&self, result: &ConsultationResult) {
        self.logger.log(ConsultationEvent::new(
            "consultation_completed",
            json!({
                "question": result.question,
                "consulted": result.consulted,
                "overall_confidence": result.overall_confidence,
                "synthesis": result.synthesis_content(),
                "metadata": result.metadata,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::functional_engine::{Evaluation, functional_engine};
    use council_domain::{EngineProfile, SynthesisStrategy};
    use std::sync::Mutex;

    fn engine(id: &str, domain: &str, tags: &[&str], confidence: f64) -> Arc<dyn crate::Engine> {
        let profile = EngineProfile::builder(id)
            .domain(domain)
            .capabilities(tags.iter().copied())
            .build()
            .unwrap();
        let name = id.to_string();
        functional_engine(profile, move |_input, _ctx| {
            let name = name.clone();
            async move { Ok(Evaluation::new(format!("{} says yes", name), confidence)) }
        })
    }

    fn failing(id: &str) -> Arc<dyn crate::Engine> {
        let profile = EngineProfile::builder(id)
            .domain("logic")
            .capability("check")
            .build()
            .unwrap();
        functional_engine(profile, |_input, _ctx| async move {
            Err(EngineError::failed("no opinion"))
        })
    }

    fn orchestrator() -> Orchestrator {
        let mut registry = EngineRegistry::new();
        registry
            .register(engine("beta", "logic", &["check"], 0.4))
            .unwrap()
            .register(engine("alpha", "logic", &["check", "prove"], 0.6))
            .unwrap()
            .register(engine("gamma", "risk", &["check"], 0.5))
            .unwrap();
        Orchestrator::new(registry.into_shared())
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConsultationLogger for RecordingLogger {
        fn log(&self, event: ConsultationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_consult_all_engines_in_registration_order() {
        let result = orchestrator().consult("q", ConsultOptions::new()).await;
        assert_eq!(result.consulted, vec!["beta", "alpha", "gamma"]);
        assert_eq!(result.insights.len(), 3);
        assert!((result.overall_confidence - 0.5).abs() < 1e-9);
        assert_eq!(result.metadata.strategy, SynthesisStrategy::WeightedAverage);
        assert_eq!(result.metadata.succeeded, 3);
    }

    #[tokio::test]
    async fn test_explicit_engines_win_and_unknown_are_dropped() {
        let options = ConsultOptions::new()
            .with_engines(["gamma", "missing", "beta", "gamma"])
            .with_domain("logic");
        let result = orchestrator().consult("q", options).await;
        assert_eq!(result.consulted, vec!["gamma", "beta"]);
    }

    #[tokio::test]
    async fn test_domain_union_is_deduplicated() {
        let options = ConsultOptions::new()
            .with_domains(["risk", "logic", "risk"])
            .with_capability("check");
        let result = orchestrator().consult("q", options).await;
        assert_eq!(result.consulted, vec!["gamma", "alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_capability_only_selection() {
        let options = ConsultOptions::new().with_capability("prove");
        let result = orchestrator().consult("q", options).await;
        assert_eq!(result.consulted, vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_select_all_skips_disabled_before_capping() {
        let orchestrator = orchestrator();
        orchestrator
            .read_registry(|r| r.set_enabled("beta", false))
            .unwrap();

        let result = orchestrator
            .consult("q", ConsultOptions::new().with_max_engines(2))
            .await;
        assert_eq!(result.consulted, vec!["alpha", "gamma"]);
    }

    #[tokio::test]
    async fn test_explicit_selection_drops_disabled_after_capping() {
        let orchestrator = orchestrator();
        orchestrator
            .read_registry(|r| r.set_enabled("beta", false))
            .unwrap();

        let options = ConsultOptions::new()
            .with_engines(["beta", "alpha", "gamma"])
            .with_max_engines(2);
        let result = orchestrator.consult("q", options).await;
        assert_eq!(result.consulted, vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_empty_selection_is_not_an_error() {
        let result = orchestrator()
            .consult("q", ConsultOptions::new().with_domain("astrology"))
            .await;
        assert!(result.insights.is_empty());
        assert!(result.synthesis.is_none());
        assert_eq!(result.overall_confidence, 0.0);
        assert!(result.metadata.no_engines);
        assert!(result.metadata.note.is_some());
    }

    #[tokio::test]
    async fn test_failures_are_contained_and_logged() {
        let mut registry = EngineRegistry::new();
        registry
            .register(engine("ok", "logic", &["check"], 0.3))
            .unwrap()
            .register(failing("broken"))
            .unwrap();
        let logger = Arc::new(RecordingLogger::default());
        let orchestrator = Orchestrator::new(registry.into_shared()).with_logger(logger.clone());

        let result = orchestrator
            .consult(
                "q",
                ConsultOptions::new().with_strategy(SynthesisStrategy::HighestConfidence),
            )
            .await;

        assert_eq!(result.insights.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].engine_id, "broken");
        assert_eq!(result.metadata.failed, 1);
        assert_eq!(result.metadata.timed_out, 0);
        assert!(result.is_degraded());
        assert!((result.overall_confidence - 0.3).abs() < 1e-9);
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["engine_failed", "consultation_completed"]
        );
    }

    #[tokio::test]
    async fn test_evaluate_with() {
        let orchestrator = orchestrator();
        let insight = orchestrator.evaluate_with("alpha", "q").await.unwrap();
        assert_eq!(insight.engine_id(), "alpha");
        assert_eq!(insight.content(), "alpha says yes");

        let err = orchestrator.evaluate_with("nobody", "q").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NotFound(id) if id == "nobody"));
    }

    #[tokio::test]
    async fn test_evaluate_with_raises_engine_failure() {
        let mut registry = EngineRegistry::new();
        registry.register(failing("broken")).unwrap();
        let orchestrator = Orchestrator::new(registry.into_shared());

        let err = orchestrator.evaluate_with("broken", "q").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::ProviderFailure { ref engine, .. } if engine == "broken"));
    }

    #[tokio::test]
    async fn test_evaluate_with_rejects_disabled() {
        let orchestrator = orchestrator();
        orchestrator
            .read_registry(|r| r.set_enabled("alpha", false))
            .unwrap();
        let err = orchestrator.evaluate_with("alpha", "q").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Disabled(_)));
    }
}
