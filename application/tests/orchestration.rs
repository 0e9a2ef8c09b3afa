//! End-to-end behaviour of registry and orchestrator together.

use async_trait::async_trait;
use council_application::{
    ConsultOptions, DeliberateOptions, Engine, EngineError, EngineRegistry, EvaluationContext,
    Evaluation, FailureKind, Orchestrator, OrchestratorConfig, OrchestratorError, RegistryError,
    functional_engine,
};
use council_domain::{
    CONFIDENCE_CEILING, EngineProfile, EngineStatus, Insight, SynthesisStrategy,
    UNRESOLVED_CONFIDENCE,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn profile(id: &str, domain: &str) -> EngineProfile {
    EngineProfile::builder(id)
        .domain(domain)
        .capability("assess")
        .build()
        .unwrap()
}

fn answering(id: &str, domain: &str, confidence: f64) -> Arc<dyn Engine> {
    functional_engine(profile(id, domain), move |input, _ctx| async move {
        Ok(Evaluation::new(format!("answer to {}", input), confidence))
    })
}

/// Concrete engine that never answers within any reasonable budget
struct Stalling {
    profile: EngineProfile,
}

#[async_trait]
impl Engine for Stalling {
    fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    async fn evaluate(
        &self,
        _input: &str,
        _context: &EvaluationContext,
    ) -> Result<Insight, EngineError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(self.profile.insight("too late", 0.6))
    }
}

fn ethics(id: &str, tradition: &str, confidence: f64) -> Arc<dyn Engine> {
    let profile = EngineProfile::builder(id)
        .domain("ethics")
        .capability("judge")
        .tradition(tradition)
        .build()
        .unwrap();
    functional_engine(profile, move |_dilemma, _ctx| async move {
        Ok(Evaluation::new("it depends", confidence))
    })
}

#[tokio::test]
async fn stalled_engine_is_dropped_and_consult_completes() {
    let mut registry = EngineRegistry::new();
    registry
        .register(answering("quick", "logic", 0.5))
        .unwrap()
        .register_engine(Stalling {
            profile: profile("stuck", "logic"),
        })
        .unwrap();
    let shared = registry.into_shared();
    let orchestrator = Orchestrator::new(Arc::clone(&shared))
        .with_config(OrchestratorConfig::default().with_default_timeout(Duration::from_millis(100)));

    let started = Instant::now();
    let result = orchestrator.consult("2+2", ConsultOptions::new()).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result.consulted, vec!["quick", "stuck"]);
    assert_eq!(result.insights.len(), 1);
    assert_eq!(result.insights[0].engine_id(), "quick");
    assert_eq!(result.metadata.timed_out, 1);
    assert_eq!(result.failures[0].kind, FailureKind::Timeout);
    assert_eq!(result.synthesis_content(), Some("answer to 2+2"));

    let stuck = shared.read().unwrap().get("stuck").unwrap();
    assert_eq!(stuck.status(), EngineStatus::Error);
    assert_eq!(stuck.stats().failures, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_blocking_past_its_budget_contributes_nothing() {
    let blocking = functional_engine(profile("blocking", "logic"), |_input, _ctx| async move {
        std::thread::sleep(Duration::from_millis(500));
        Ok(Evaluation::new("late answer", 0.6))
    });
    let mut registry = EngineRegistry::new();
    registry
        .register(answering("quick", "logic", 0.5))
        .unwrap()
        .register(blocking)
        .unwrap();
    let orchestrator = Orchestrator::new(registry.into_shared());

    let result = orchestrator
        .consult(
            "2+2",
            ConsultOptions::new().with_timeout(Duration::from_millis(100)),
        )
        .await;

    assert_eq!(result.insights.len(), 1);
    assert_eq!(result.insights[0].engine_id(), "quick");
    assert_eq!(result.metadata.timed_out, 1);
    assert_eq!(result.failures[0].engine_id, "blocking");
    assert_eq!(result.synthesis_content(), Some("answer to 2+2"));
}

#[tokio::test]
async fn zero_matching_engines_yields_empty_result() {
    let orchestrator = Orchestrator::new(EngineRegistry::new().into_shared());

    let result = orchestrator.consult("anything", ConsultOptions::new()).await;

    assert!(result.insights.is_empty());
    assert!(result.synthesis.is_none());
    assert_eq!(result.overall_confidence, 0.0);
    assert!(result.metadata.no_engines);
}

#[tokio::test]
async fn every_strategy_respects_the_ceiling() {
    let mut registry = EngineRegistry::new();
    registry
        .register(answering("a", "logic", 0.9))
        .unwrap()
        .register(answering("b", "logic", 0.7))
        .unwrap()
        .register(answering("c", "risk", 1.5))
        .unwrap();
    let orchestrator = Orchestrator::new(registry.into_shared());

    for strategy in SynthesisStrategy::ALL {
        let result = orchestrator
            .consult("q", ConsultOptions::new().with_strategy(strategy))
            .await;
        assert!(result.overall_confidence <= CONFIDENCE_CEILING, "{strategy}");
        assert!(
            result
                .insights
                .iter()
                .all(|i| i.confidence().value() <= CONFIDENCE_CEILING)
        );
    }
}

#[tokio::test]
async fn consensus_falls_back_on_disagreement() {
    let mut registry = EngineRegistry::new();
    registry
        .register(answering("low", "risk", 0.2))
        .unwrap()
        .register(answering("high", "risk", 0.8))
        .unwrap()
        .register(answering("mid", "risk", 0.5))
        .unwrap();
    let orchestrator = Orchestrator::new(registry.into_shared());

    let result = orchestrator
        .consult(
            "q",
            ConsultOptions::new()
                .with_domain("risk")
                .with_strategy(SynthesisStrategy::Consensus),
        )
        .await;

    assert_eq!(result.overall_confidence, UNRESOLVED_CONFIDENCE);
}

#[tokio::test]
async fn max_engines_keeps_union_order() {
    let mut registry = EngineRegistry::new();
    for (id, domain) in [("r2", "risk"), ("l1", "logic"), ("r1", "risk")] {
        registry.register(answering(id, domain, 0.3)).unwrap();
    }
    let orchestrator = Orchestrator::new(registry.into_shared());

    let result = orchestrator
        .consult(
            "q",
            ConsultOptions::new()
                .with_domains(["risk", "logic"])
                .with_max_engines(2),
        )
        .await;

    assert_eq!(result.consulted, vec!["r1", "r2"]);
}

#[tokio::test]
async fn direct_invocation_raises() {
    let mut registry = EngineRegistry::new();
    registry
        .register_engine(Stalling {
            profile: profile("stuck", "logic"),
        })
        .unwrap();
    let orchestrator = Orchestrator::new(registry.into_shared())
        .with_config(OrchestratorConfig::default().with_default_timeout(Duration::from_millis(50)));

    let err = orchestrator.evaluate_with("ghost", "q").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotFound(_)));

    let err = orchestrator.evaluate_with("stuck", "q").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Timeout { .. }));
    assert_eq!(err.to_string(), "Engine stuck timed out after 50ms");
}

#[tokio::test]
async fn deliberation_counts_cross_tradition_tensions() {
    let mut registry = EngineRegistry::new();
    registry
        .register(ethics("kant", "duty", 0.5))
        .unwrap()
        .register(ethics("ross", "duty", 0.45))
        .unwrap()
        .register(ethics("noddings", "care", 0.4))
        .unwrap();
    let orchestrator = Orchestrator::new(registry.into_shared());

    let result = orchestrator
        .deliberate("break a promise?", DeliberateOptions::new())
        .await;

    assert_eq!(result.positions.len(), 3);
    assert_eq!(result.tensions.len(), 2);
    assert!(
        result
            .tensions
            .iter()
            .all(|t| t.first_tradition != t.second_tradition)
    );
    assert!(result.recommendation.is_some());
    assert!(result.confidence.value() <= CONFIDENCE_CEILING);
}

#[test]
fn duplicate_registration_leaves_indices_untouched() {
    let mut registry = EngineRegistry::new();
    registry.register(answering("a", "logic", 0.3)).unwrap();

    let err = registry.register(answering("a", "risk", 0.3)).unwrap_err();

    assert!(matches!(err, RegistryError::Duplicate(id) if id == "a"));
    assert!(registry.get_by_domain("risk").is_empty());
    assert_eq!(registry.get_by_domain("logic").len(), 1);
    assert_eq!(registry.len(), 1);
}
