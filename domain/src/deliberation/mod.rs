//! Deliberation domain: positions taken by engines of competing traditions
//! and the tensions between them.

use crate::engine::insight::Insight;
use serde::{Deserialize, Serialize};

/// Default domain whose engines take part in deliberation
pub const DELIBERATION_DOMAIN: &str = "ethics";

/// The stance one engine takes on a dilemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Engine that produced the position
    pub engine_id: String,
    /// Tradition the engine speaks for (falls back to its perspective label)
    pub tradition: String,
    /// The engine's insight on the dilemma
    pub insight: Insight,
}

impl Position {
    pub fn new(engine_id: impl Into<String>, tradition: impl Into<String>, insight: Insight) -> Self {
        Self {
            engine_id: engine_id.into(),
            tradition: tradition.into(),
            insight,
        }
    }

    /// Build a position from an insight, taking the tradition from its perspective
    pub fn from_insight(insight: Insight) -> Self {
        Self {
            engine_id: insight.engine_id().to_string(),
            tradition: insight.perspective().to_string(),
            insight,
        }
    }
}

/// Disagreement between two positions of different traditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tension {
    pub first_engine: String,
    pub first_tradition: String,
    pub second_engine: String,
    pub second_tradition: String,
}

impl Tension {
    /// Short label, e.g. `"virtue vs duty"`
    pub fn label(&self) -> String {
        format!("{} vs {}", self.first_tradition, self.second_tradition)
    }

    /// Whether this tension involves the given engine
    pub fn involves(&self, engine_id: &str) -> bool {
        self.first_engine == engine_id || self.second_engine == engine_id
    }
}

/// One tension per unordered pair of positions whose traditions differ.
///
/// Pairs are emitted in position order (`i < j`); same-tradition pairs
/// produce nothing.
pub fn find_tensions(positions: &[Position]) -> Vec<Tension> {
    let mut tensions = Vec::new();
    for (i, first) in positions.iter().enumerate() {
        for second in &positions[i + 1..] {
            if first.tradition != second.tradition {
                tensions.push(Tension {
                    first_engine: first.engine_id.clone(),
                    first_tradition: first.tradition.clone(),
                    second_engine: second.engine_id.clone(),
                    second_tradition: second.tradition.clone(),
                });
            }
        }
    }
    tensions
}
