//! Reduction of many insights into one.
//!
//! All functions are pure: they read the surviving insights in selection
//! order and return a freshly constructed [`Insight`] whose confidence went
//! through the same clamp as any engine output.

use super::strategy::SynthesisStrategy;
use crate::core::confidence::{CONFIDENCE_CEILING, Confidence};
use crate::engine::insight::Insight;
use serde_json::json;

/// Engine id attributed to synthesized insights
pub const SYNTHESIS_ENGINE_ID: &str = "synthesis";

/// Variance below which consensus is declared
pub const CONSENSUS_VARIANCE_THRESHOLD: f64 = 0.01;

/// Multiplier applied to the mean confidence when consensus is reached
pub const CONSENSUS_BOOST: f64 = 1.1;

/// Reduce insights with the given strategy.
///
/// Zero insights yield `None`; a single insight is returned as is.
pub fn synthesize(strategy: SynthesisStrategy, insights: &[Insight]) -> Option<Insight> {
    match insights {
        [] => None,
        [only] => Some(only.clone()),
        _ => Some(match strategy {
            SynthesisStrategy::WeightedAverage => weighted_average(insights),
            SynthesisStrategy::HighestConfidence => highest_confidence(insights),
            SynthesisStrategy::Consensus => consensus(insights),
            SynthesisStrategy::MultiPerspective => multi_perspective(insights),
            SynthesisStrategy::Dialectic => dialectic(insights),
        }),
    }
}

/// Population variance of the insight confidences
pub fn confidence_variance(insights: &[Insight]) -> f64 {
    if insights.is_empty() {
        return 0.0;
    }
    let n = insights.len() as f64;
    let mean = insights.iter().map(|i| i.confidence().value()).sum::<f64>() / n;
    insights
        .iter()
        .map(|i| (i.confidence().value() - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Pick thesis and antithesis indices.
///
/// The thesis is the most confident insight (first wins ties). The
/// antithesis is the most confident insight from a different perspective,
/// or the runner-up when every insight shares one perspective.
pub fn dialectic_pair(insights: &[Insight]) -> Option<(usize, usize)> {
    if insights.len() < 2 {
        return None;
    }
    let ranked = rank_by_confidence(insights);
    let thesis = ranked[0];
    let thesis_perspective = insights[thesis].perspective();
    let antithesis = ranked[1..]
        .iter()
        .copied()
        .find(|&i| insights[i].perspective() != thesis_perspective)
        .unwrap_or(ranked[1]);
    Some((thesis, antithesis))
}

/// Indices sorted by descending confidence; stable for ties
fn rank_by_confidence(insights: &[Insight]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..insights.len()).collect();
    ranked.sort_by(|&a, &b| {
        insights[b]
            .confidence()
            .value()
            .total_cmp(&insights[a].confidence().value())
    });
    ranked
}

fn shared_domain(insights: &[Insight]) -> String {
    let first = insights[0].domain();
    if insights.iter().all(|i| i.domain() == first) {
        first.to_string()
    } else {
        "multi-domain".to_string()
    }
}

fn engine_ids(insights: &[Insight]) -> Vec<String> {
    insights.iter().map(|i| i.engine_id().to_string()).collect()
}

fn tagged_lines(insights: &[Insight]) -> String {
    insights
        .iter()
        .map(|i| format!("[{}] {}", i.perspective(), i.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn synthesized(
    strategy: SynthesisStrategy,
    insights: &[Insight],
    content: String,
    confidence: Confidence,
) -> Insight {
    Insight::new(
        SYNTHESIS_ENGINE_ID,
        shared_domain(insights),
        strategy.as_str(),
        content,
        confidence,
    )
    .with_metadata("strategy", strategy.as_str())
    .with_metadata("source_count", insights.len())
    .with_metadata("sources", engine_ids(insights))
}

fn weighted_average(insights: &[Insight]) -> Insight {
    let confidence = Confidence::mean(insights.iter().map(Insight::confidence));
    synthesized(
        SynthesisStrategy::WeightedAverage,
        insights,
        tagged_lines(insights),
        confidence,
    )
    .with_reasoning(
        insights
            .iter()
            .map(|i| format!("{} reported {}", i.perspective(), i.confidence())),
    )
}

/// Returns the winning insight itself. Its confidence was clamped when it
/// was created, so no second clamp happens here.
fn highest_confidence(insights: &[Insight]) -> Insight {
    let mut best = &insights[0];
    for insight in &insights[1..] {
        if insight.confidence() > best.confidence() {
            best = insight;
        }
    }
    best.clone()
}

fn consensus(insights: &[Insight]) -> Insight {
    let variance = confidence_variance(insights);
    if variance >= CONSENSUS_VARIANCE_THRESHOLD {
        return multi_perspective(insights)
            .with_metadata("consensus", false)
            .with_metadata("variance", variance);
    }

    let mean = Confidence::mean(insights.iter().map(Insight::confidence));
    let boosted = Confidence::new((mean.value() * CONSENSUS_BOOST).min(CONFIDENCE_CEILING));
    synthesized(
        SynthesisStrategy::Consensus,
        insights,
        format!(
            "Consensus across {} engines:\n\n{}",
            insights.len(),
            tagged_lines(insights)
        ),
        boosted,
    )
    .with_reason(format!("confidence variance {:.4} below threshold", variance))
    .with_metadata("consensus", true)
    .with_metadata("variance", variance)
}

fn multi_perspective(insights: &[Insight]) -> Insight {
    let perspectives: Vec<serde_json::Value> = insights
        .iter()
        .map(|i| {
            json!({
                "engine_id": i.engine_id(),
                "perspective": i.perspective(),
                "content": i.content(),
                "confidence": i.confidence().value(),
            })
        })
        .collect();

    synthesized(
        SynthesisStrategy::MultiPerspective,
        insights,
        format!(
            "{} perspectives without resolution:\n\n{}",
            insights.len(),
            tagged_lines(insights)
        ),
        Confidence::UNRESOLVED,
    )
    .with_metadata("perspectives", perspectives)
}

fn dialectic(insights: &[Insight]) -> Insight {
    // len >= 2 is guaranteed by `synthesize`
    let Some((t, a)) = dialectic_pair(insights) else {
        return insights[0].clone();
    };
    let (thesis, antithesis) = (&insights[t], &insights[a]);
    let confidence = Confidence::mean([thesis.confidence(), antithesis.confidence()]);

    let content = format!(
        "Thesis [{}]: {}\n\nAntithesis [{}]: {}\n\nSynthesis: weigh {} against {}; both positions carry part of the answer.",
        thesis.perspective(),
        thesis.content(),
        antithesis.perspective(),
        antithesis.content(),
        thesis.perspective(),
        antithesis.perspective(),
    );

    synthesized(SynthesisStrategy::Dialectic, insights, content, confidence)
        .with_reason(format!(
            "thesis from {} ({})",
            thesis.engine_id(),
            thesis.confidence()
        ))
        .with_reason(format!(
            "antithesis from {} ({})",
            antithesis.engine_id(),
            antithesis.confidence()
        ))
        .with_metadata("thesis", thesis.engine_id())
        .with_metadata("antithesis", antithesis.engine_id())
}
