//! Deliberation use case
//!
//! Gathers positions from the engines of the deliberation domain, surfaces
//! the tensions between differing traditions and forms a recommendation
//! with the dialectic rule.

use super::dispatch::{DispatchOutcome, EngineFailure, FailureKind, dispatch};
use super::orchestrator::Orchestrator;
use crate::ports::consultation_logger::ConsultationEvent;
use crate::ports::engine::{EvaluationContext, InvocationMode};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::registry::RegisteredEngine;
use council_domain::{
    Confidence, Insight, Position, SynthesisStrategy, Tension, find_tensions, synthesize,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Per-call options of a deliberation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliberateOptions {
    /// Restrict to engines of these traditions (all when empty)
    pub traditions: Vec<String>,
    /// Overrides the orchestrator's per-engine timeout
    pub timeout: Option<Duration>,
}

impl DeliberateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traditions<I, S>(mut self, traditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traditions.extend(traditions.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationMetadata {
    pub domain: String,
    pub selected: usize,
    pub positions: usize,
    pub tensions: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub elapsed_ms: u64,
    pub timestamp: String,
}

/// Outcome of [`Orchestrator::deliberate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub dilemma: String,
    /// Positions in selection order
    pub positions: Vec<Position>,
    pub tensions: Vec<Tension>,
    /// Dialectic synthesis of the positions, if any survived
    pub recommendation: Option<Insight>,
    /// Recommendation confidence, or the unresolved default
    pub confidence: Confidence,
    #[serde(default)]
    pub failures: Vec<EngineFailure>,
    pub metadata: DeliberationMetadata,
}

impl DeliberationResult {
    /// Distinct traditions that took a position, in first-seen order
    pub fn traditions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for position in &self.positions {
            if !seen.contains(&position.tradition.as_str()) {
                seen.push(&position.tradition);
            }
        }
        seen
    }
}

impl Orchestrator {
    pub async fn deliberate(&self, dilemma: &str, options: DeliberateOptions) -> DeliberationResult {
        self.deliberate_with_progress(dilemma, options, &NoProgress)
            .await
    }

    /// Deliberate a dilemma. Never fails; engine failures are contained.
    pub async fn deliberate_with_progress(
        &self,
        dilemma: &str,
        options: DeliberateOptions,
        progress: &dyn ProgressNotifier,
    ) -> DeliberationResult {
        let started = Instant::now();
        let domain = self.config.deliberation_domain.clone();
        let timeout = options.timeout.unwrap_or(self.config.default_timeout);
        let engines = self.select_deliberators(&domain, &options.traditions);

        info!(
            domain = %domain,
            engines = engines.len(),
            traditions = ?options.traditions,
            "Starting deliberation"
        );
        if engines.is_empty() {
            warn!(domain = %domain, "No engines available for deliberation");
        }

        let context =
            EvaluationContext::new(InvocationMode::Deliberate).with_traditions(options.traditions);
        let outcome = dispatch(&engines, dilemma, &context, timeout, progress).await;
        let timed_out = outcome.count(FailureKind::Timeout);
        let DispatchOutcome { insights, failures } = outcome;
        self.log_failures(&failures);

        let recommendation = synthesize(SynthesisStrategy::Dialectic, &insights);
        let confidence = recommendation
            .as_ref()
            .map(Insight::confidence)
            .unwrap_or(Confidence::UNRESOLVED);
        let positions: Vec<Position> = insights.into_iter().map(Position::from_insight).collect();
        let tensions = find_tensions(&positions);

        let result = DeliberationResult {
            dilemma: dilemma.to_string(),
            metadata: DeliberationMetadata {
                domain,
                selected: engines.len(),
                positions: positions.len(),
                tensions: tensions.len(),
                failed: failures.len() - timed_out,
                timed_out,
                elapsed_ms: started.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            positions,
            tensions,
            recommendation,
            confidence,
            failures,
        };

        info!(
            positions = result.metadata.positions,
            tensions = result.metadata.tensions,
            confidence = %result.confidence,
            "Deliberation complete"
        );
        self.logger.log(ConsultationEvent::new(
            "deliberation_completed",
            json!({
                "dilemma": result.dilemma,
                "traditions": result.traditions(),
                "tensions": result.tensions.iter().map(Tension::label).collect::<Vec<_>>(),
                "confidence": result.confidence,
                "metadata": result.metadata,
            }),
        ));
        result
    }

    fn select_deliberators(&self, domain: &str, traditions: &[String]) -> Vec<Arc<RegisteredEngine>> {
        self.read_registry(|registry| {
            registry
                .get_by_domain(domain)
                .into_iter()
                .filter(|engine| !engine.is_disabled())
                .filter(|engine| {
                    traditions.is_empty()
                        || engine
                            .profile()
                            .tradition()
                            .is_some_and(|t| traditions.iter().any(|wanted| wanted == t))
                })
                .collect()
        })
    }
}
