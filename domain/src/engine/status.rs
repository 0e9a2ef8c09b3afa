//! Engine lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registered engine
///
/// Transitions are driven by the engine's own invocation:
/// `Idle → Evaluating → Idle` on success, `Evaluating → Error` on failure or
/// timeout. `Disabled` is set explicitly and excludes the engine from dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    #[default]
    Idle,
    Evaluating,
    Error,
    Disabled,
}

impl EngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Evaluating => "evaluating",
            EngineStatus::Error => "error",
            EngineStatus::Disabled => "disabled",
        }
    }

    /// Whether the engine may be dispatched
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, EngineStatus::Disabled)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EngineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(EngineStatus::Idle),
            "evaluating" => Ok(EngineStatus::Evaluating),
            "error" => Ok(EngineStatus::Error),
            "disabled" => Ok(EngineStatus::Disabled),
            _ => Err(format!("Invalid EngineStatus: {}", s)),
        }
    }
}
