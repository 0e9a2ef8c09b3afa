//! Synthesis strategy selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// How surviving insights are reduced to one combined insight
///
/// | Strategy | Resulting confidence |
/// |----------|---------------------|
/// | `WeightedAverage` | mean of inputs, clamped |
/// | `HighestConfidence` | the winner's confidence, unchanged |
/// | `Consensus` | mean × 1.1 when variance < 0.01, else multi-perspective |
/// | `MultiPerspective` | fixed 0.382 |
/// | `Dialectic` | mean of thesis and antithesis, clamped |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisStrategy {
    #[default]
    WeightedAverage,
    HighestConfidence,
    Consensus,
    MultiPerspective,
    Dialectic,
}

impl SynthesisStrategy {
    /// All strategies, in display order
    pub const ALL: [SynthesisStrategy; 5] = [
        SynthesisStrategy::WeightedAverage,
        SynthesisStrategy::HighestConfidence,
        SynthesisStrategy::Consensus,
        SynthesisStrategy::MultiPerspective,
        SynthesisStrategy::Dialectic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisStrategy::WeightedAverage => "weighted-average",
            SynthesisStrategy::HighestConfidence => "highest-confidence",
            SynthesisStrategy::Consensus => "consensus",
            SynthesisStrategy::MultiPerspective => "multi-perspective",
            SynthesisStrategy::Dialectic => "dialectic",
        }
    }

    /// Get a human-readable description of this strategy
    pub fn description(&self) -> &'static str {
        match self {
            SynthesisStrategy::WeightedAverage => "Concatenate all insights; mean confidence",
            SynthesisStrategy::HighestConfidence => "Keep the single most confident insight",
            SynthesisStrategy::Consensus => {
                "Boost agreement when confidences cluster, else keep all perspectives"
            }
            SynthesisStrategy::MultiPerspective => "Keep every perspective; report disagreement",
            SynthesisStrategy::Dialectic => "Pair the strongest thesis with its best antithesis",
        }
    }
}

impl fmt::Display for SynthesisStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SynthesisStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "weighted-average" | "weighted" | "average" => Ok(SynthesisStrategy::WeightedAverage),
            "highest-confidence" | "highest" => Ok(SynthesisStrategy::HighestConfidence),
            "consensus" => Ok(SynthesisStrategy::Consensus),
            "multi-perspective" | "multi" => Ok(SynthesisStrategy::MultiPerspective),
            "dialectic" => Ok(SynthesisStrategy::Dialectic),
            _ => Err(format!("Invalid SynthesisStrategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_weighted_average() {
        assert_eq!(SynthesisStrategy::default(), SynthesisStrategy::WeightedAverage);
    }

    #[test]
    fn test_parse_names_and_aliases() {
        for strategy in SynthesisStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<SynthesisStrategy>().unwrap(), strategy);
        }
        assert_eq!(
            "HIGHEST_CONFIDENCE".parse::<SynthesisStrategy>().unwrap(),
            SynthesisStrategy::HighestConfidence
        );
        assert!("majority".parse::<SynthesisStrategy>().is_err());
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&SynthesisStrategy::MultiPerspective).unwrap();
        assert_eq!(json, "\"multi-perspective\"");
    }
}
