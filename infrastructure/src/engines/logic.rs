//! Logic engine: structural consistency of a statement

use super::matched_cues;
use async_trait::async_trait;
use council_application::{Engine, EngineError, EvaluationContext};
use council_domain::{DomainError, EngineProfile, Insight};

/// Pairs of cues that cannot both hold of the same claim
const OPPOSITES: [(&str, &str); 4] = [
    ("always", "never"),
    ("all ", "none"),
    ("everyone", "no one"),
    ("must ", "must not"),
];

const STRUCTURE_CUES: [&str; 5] = ["if ", "then", "because", "therefore", "unless"];

/// Flags contradictory quantifiers and reports argument structure
#[derive(Debug)]
pub struct LogicEngine {
    profile: EngineProfile,
}

impl LogicEngine {
    pub fn new() -> Result<Self, DomainError> {
        let profile = EngineProfile::builder("logic")
            .name("Logic Engine")
            .domain("logic")
            .subdomain("consistency")
            .capabilities(["consistency-check", "argument-analysis"])
            .description("Checks statements for contradictory quantifiers and argument structure")
            .build()?;
        Ok(Self { profile })
    }

    fn contradictions(input: &str) -> Vec<String> {
        let lowered = input.to_lowercase();
        OPPOSITES
            .iter()
            .filter(|(a, b)| {
                // "must not" contains "must "; only count it when a bare "must " also appears
                let a_hits = lowered.matches(a).count();
                let b_hits = lowered.matches(b).count();
                if b.starts_with(a) {
                    b_hits > 0 && a_hits > b_hits
                } else {
                    a_hits > 0 && b_hits > 0
                }
            })
            .map(|(a, b)| format!("'{}' vs '{}'", a.trim(), b.trim()))
            .collect()
    }
}

#[async_trait]
impl Engine for LogicEngine {
    fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    async fn evaluate(&self, input: &str, context: &EvaluationContext) -> Result<Insight, EngineError> {
        if context.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if input.trim().is_empty() {
            return Err(EngineError::invalid_input("nothing to analyze"));
        }

        let contradictions = Self::contradictions(input);
        let structure = matched_cues(input, &STRUCTURE_CUES);

        let (content, confidence) = if !contradictions.is_empty() {
            (
                format!(
                    "The statement is internally inconsistent: {}.",
                    contradictions.join(", ")
                ),
                0.55,
            )
        } else if !structure.is_empty() {
            (
                "No contradiction found; the argument is explicitly structured.".to_string(),
                0.5,
            )
        } else {
            (
                "No contradiction found, but the claim gives no explicit reasoning.".to_string(),
                0.4,
            )
        };

        let mut insight = self
            .profile
            .insight(content, confidence)
            .with_metadata("contradictions", contradictions.clone())
            .with_metadata("structure", structure.clone());
        for contradiction in contradictions {
            insight = insight.with_reason(format!("opposing quantifiers {}", contradiction));
        }
        for cue in structure {
            insight = insight.with_reason(format!("connective '{}'", cue.trim()));
        }
        Ok(insight)
    }
}
