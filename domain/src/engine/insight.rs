//! Insight value object: the output of one engine invocation.

use crate::core::confidence::Confidence;
use crate::util::current_timestamp_ms;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable, confidence-bounded output of an engine
///
/// Fields are read-only once the insight is shared; the `with_*` methods
/// consume the value and are meant for construction only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    engine_id: String,
    domain: String,
    perspective: String,
    content: String,
    confidence: Confidence,
    #[serde(default)]
    reasoning: Vec<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    created_at: u64,
}

impl Insight {
    /// Create an insight. Confidence is clamped to the ceiling.
    pub fn new(
        engine_id: impl Into<String>,
        domain: impl Into<String>,
        perspective: impl Into<String>,
        content: impl Into<String>,
        confidence: impl Into<Confidence>,
    ) -> Self {
        Self {
            engine_id: engine_id.into(),
            domain: domain.into(),
            perspective: perspective.into(),
            content: content.into(),
            confidence: confidence.into(),
            reasoning: Vec::new(),
            metadata: Map::new(),
            created_at: current_timestamp_ms(),
        }
    }

    /// Append one supporting statement
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    /// Append supporting statements in order
    pub fn with_reasoning<I, S>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reasoning.extend(reasons.into_iter().map(Into::into));
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn perspective(&self) -> &str {
        &self.perspective
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Creation time in milliseconds since the Unix epoch
    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped_at_creation() {
        let insight = Insight::new("e", "d", "p", "c", 0.99);
        assert_eq!(insight.confidence().value(), 0.618);

        let insight = Insight::new("e", "d", "p", "c", Confidence::new(0.3));
        assert_eq!(insight.confidence().value(), 0.3);
    }

    #[test]
    fn test_builders() {
        let insight = Insight::new("e", "d", "p", "c", 0.5)
            .with_reason("first")
            .with_reasoning(["second", "third"])
            .with_metadata("weight", 2);

        assert_eq!(insight.reasoning(), ["first", "second", "third"]);
        assert_eq!(insight.metadata()["weight"], 2);
        assert!(insight.created_at() > 0);
    }

    #[test]
    fn test_deserialized_confidence_is_clamped() {
        let json = r#"{"engine_id":"e","domain":"d","perspective":"p","content":"c","confidence":3.0}"#;
        let insight: Insight = serde_json::from_str(json).unwrap();
        assert_eq!(insight.confidence().value(), 0.618);
        assert!(insight.reasoning().is_empty());
    }
}
