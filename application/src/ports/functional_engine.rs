//! Functional engines: providers built from a plain evaluation callback.
//!
//! ```ignore
//! let engine = FnEngine::new(profile, |input, _ctx| async move {
//!     Ok(Evaluation::new(format!("{} looks fine", input), 0.4))
//! });
//! registry.register(Arc::new(engine))?;
//! ```

use super::engine::{Engine, EngineError, EvaluationContext};
use async_trait::async_trait;
use council_domain::{Confidence, EngineProfile, Insight};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

/// What a callback returns; turned into an [`Insight`] attributed to the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub content: String,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl Evaluation {
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence,
            reasoning: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the insight; the confidence clamp happens in [`Insight::new`]
    pub fn into_insight(self, profile: &EngineProfile) -> Insight {
        let mut insight = profile
            .insight(self.content, Confidence::new(self.confidence))
            .with_reasoning(self.reasoning);
        for (key, value) in self.metadata {
            insight = insight.with_metadata(key, value);
        }
        insight
    }
}

/// Engine whose evaluation is a callback
pub struct FnEngine<F> {
    profile: EngineProfile,
    evaluate: F,
}

impl<F, Fut> FnEngine<F>
where
    F: Fn(String, EvaluationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Evaluation, EngineError>> + Send + 'static,
{
    pub fn new(profile: EngineProfile, evaluate: F) -> Self {
        Self { profile, evaluate }
    }
}

#[async_trait]
impl<F, Fut> Engine for FnEngine<F>
where
    F: Fn(String, EvaluationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Evaluation, EngineError>> + Send + 'static,
{
    fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    async fn evaluate(
        &self,
        input: &str,
        context: &EvaluationContext,
    ) -> Result<Insight, EngineError> {
        let evaluation = (self.evaluate)(input.to_string(), context.clone()).await?;
        Ok(evaluation.into_insight(&self.profile))
    }
}

/// Wrap a callback into a shareable engine
pub fn functional_engine<F, Fut>(profile: EngineProfile, evaluate: F) -> Arc<dyn Engine>
where
    F: Fn(String, EvaluationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Evaluation, EngineError>> + Send + 'static,
{
    Arc::new(FnEngine::new(profile, evaluate))
}
