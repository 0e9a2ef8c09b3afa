//! Ethics traditions as callback engines

use super::matched_cues;
use council_application::{Engine, EngineError, Evaluation, functional_engine};
use council_domain::{DELIBERATION_DOMAIN, DomainError, EngineProfile};
use std::sync::Arc;

/// A normative tradition and the cues it reacts to
#[derive(Debug, Clone, Copy)]
pub struct Tradition {
    pub id: &'static str,
    pub name: &'static str,
    pub tradition: &'static str,
    pub subdomain: &'static str,
    pub question: &'static str,
    pub cues: &'static [&'static str],
    /// Confidence without any matching cue
    pub base_confidence: f64,
}

pub const ETHICS_TRADITIONS: [Tradition; 4] = [
    Tradition {
        id: "utilitarian",
        name: "Utilitarian Ethics",
        tradition: "consequentialism",
        subdomain: "consequences",
        question: "Which option produces the greatest overall wellbeing?",
        cues: &["harm", "benefit", "outcome", "people", "save", "cost", "suffer"],
        base_confidence: 0.35,
    },
    Tradition {
        id: "deontological",
        name: "Deontological Ethics",
        tradition: "deontology",
        subdomain: "duties",
        question: "Which duties, rights and promises are at stake?",
        cues: &["lie", "promise", "duty", "right", "law", "rule", "consent"],
        base_confidence: 0.35,
    },
    Tradition {
        id: "virtue",
        name: "Virtue Ethics",
        tradition: "virtue",
        subdomain: "character",
        question: "What would a person of good character do here?",
        cues: &["honest", "courage", "fair", "kind", "loyal", "integrity"],
        base_confidence: 0.3,
    },
    Tradition {
        id: "care",
        name: "Care Ethics",
        tradition: "care",
        subdomain: "relationships",
        question: "Which relationships and dependencies need protecting?",
        cues: &["friend", "family", "child", "trust", "vulnerable", "care"],
        base_confidence: 0.3,
    },
];

/// Build the engine for one tradition
pub fn ethics_engine(tradition: Tradition) -> Result<Arc<dyn Engine>, DomainError> {
    let profile = EngineProfile::builder(tradition.id)
        .name(tradition.name)
        .domain(DELIBERATION_DOMAIN)
        .subdomain(tradition.subdomain)
        .capabilities(["ethical-analysis", "dilemma"])
        .tradition(tradition.tradition)
        .description(tradition.question)
        .build()?;

    Ok(functional_engine(profile, move |dilemma, _context| async move {
        if dilemma.trim().is_empty() {
            return Err(EngineError::invalid_input("empty dilemma"));
        }

        let cues = matched_cues(&dilemma, tradition.cues);
        let confidence = tradition.base_confidence + 0.05 * cues.len() as f64;
        let content = if cues.is_empty() {
            format!(
                "{} No {} concerns stand out; weigh the options on that question first.",
                tradition.question, tradition.tradition
            )
        } else {
            format!(
                "{} The dilemma turns on {}.",
                tradition.question,
                cues.join(", ")
            )
        };

        let mut evaluation = Evaluation::new(content, confidence)
            .with_reason(format!("viewed through {}", tradition.tradition))
            .with_metadata("cues", cues.clone());
        for cue in cues {
            evaluation = evaluation.with_reason(format!("mentions '{}'", cue));
        }
        Ok(evaluation)
    }))
}

/// All four traditions
pub fn ethics_engines() -> Result<Vec<Arc<dyn Engine>>, DomainError> {
    ETHICS_TRADITIONS.into_iter().map(ethics_engine).collect()
}
