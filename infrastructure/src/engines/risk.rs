//! Risk engine: weighted hazard terms

use super::matched_cues;
use async_trait::async_trait;
use council_application::{Engine, EngineError, EvaluationContext};
use council_domain::{DomainError, EngineProfile, Insight};

/// Hazard terms and their severity (1-3)
const HAZARDS: [(&str, u32); 10] = [
    ("irreversible", 3),
    ("production", 2),
    ("delete", 3),
    ("money", 2),
    ("legal", 2),
    ("security", 3),
    ("deadline", 1),
    ("untested", 2),
    ("health", 3),
    ("experimental", 1),
];

/// Coarse risk level derived from total severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    fn from_score(score: u32) -> Self {
        match score {
            0..=1 => RiskLevel::Low,
            2..=4 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Scores hazards mentioned in a proposal.
///
/// Declares a dependency on the logic engine: an inconsistent proposal
/// should be untangled before its risk is weighed.
#[derive(Debug)]
pub struct RiskEngine {
    profile: EngineProfile,
}

impl RiskEngine {
    pub fn new() -> Result<Self, DomainError> {
        let profile = EngineProfile::builder("risk")
            .name("Risk Engine")
            .domain("risk")
            .subdomain("operations")
            .capabilities(["risk-assessment"])
            .dependency("logic")
            .description("Scores the hazards a proposal mentions")
            .build()?;
        Ok(Self { profile })
    }
}

#[async_trait]
impl Engine for RiskEngine {
    fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    async fn evaluate(&self, input: &str, context: &EvaluationContext) -> Result<Insight, EngineError> {
        if context.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if input.trim().is_empty() {
            return Err(EngineError::invalid_input("nothing to assess"));
        }

        let terms: Vec<&str> = HAZARDS.iter().map(|(term, _)| *term).collect();
        let hits = matched_cues(input, &terms);
        let score: u32 = HAZARDS
            .iter()
            .filter(|(term, _)| hits.contains(term))
            .map(|(_, severity)| severity)
            .sum();
        let level = RiskLevel::from_score(score);

        let content = if hits.is_empty() {
            "Risk is low: no known hazards are mentioned.".to_string()
        } else {
            format!(
                "Risk is {}: watch for {}.",
                level.as_str(),
                hits.join(", ")
            )
        };
        // More named hazards make the assessment better grounded
        let confidence = 0.3 + 0.05 * hits.len() as f64;

        let insight = self
            .profile
            .insight(content, confidence)
            .with_reasoning(hits.iter().map(|h| format!("hazard '{}'", h)))
            .with_metadata("level", level.as_str())
            .with_metadata("score", score);
        Ok(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn evaluate(input: &str) -> Insight {
        RiskEngine::new()
            .unwrap()
            .evaluate(input, &EvaluationContext::default())
            .await
            .unwrap()
    }

    #[test]
    fn test_declares_logic_dependency() {
        let engine = RiskEngine::new().unwrap();
        assert_eq!(engine.profile().dependencies(), ["logic"]);
    }

    #[tokio::test]
    async fn test_scores_hazards() {
        let insight = evaluate("Delete the production security logs").await;
        assert_eq!(insight.metadata()["level"], "high");
        assert_eq!(insight.metadata()["score"], 8);
        assert_eq!(insight.reasoning().len(), 3);
        assert!((insight.confidence().value() - 0.45).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_hazards_is_low() {
        let insight = evaluate("Rename a variable").await;
        assert_eq!(insight.metadata()["level"], "low");
        assert!(insight.content().starts_with("Risk is low"));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::High);
    }
}
