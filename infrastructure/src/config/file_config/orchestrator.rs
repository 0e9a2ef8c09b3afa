//! Orchestrator configuration from TOML (`[orchestrator]` section)
//!
//! ```toml
//! [orchestrator]
//! strategy = "consensus"
//! timeout_ms = 3000
//! max_engines = 6
//! deliberation_domain = "ethics"
//! ```

use council_application::config::{DEFAULT_ENGINE_TIMEOUT, DEFAULT_MAX_ENGINES};
use council_domain::{DELIBERATION_DOMAIN, SynthesisStrategy};
use serde::{Deserialize, Serialize};

/// Raw orchestrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Default synthesis strategy
    pub strategy: SynthesisStrategy,
    /// Per-engine timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum number of engines consulted at once
    pub max_engines: usize,
    /// Domain whose engines take part in deliberation
    pub deliberation_domain: String,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            strategy: SynthesisStrategy::default(),
            timeout_ms: DEFAULT_ENGINE_TIMEOUT.as_millis() as u64,
            max_engines: DEFAULT_MAX_ENGINES,
            deliberation_domain: DELIBERATION_DOMAIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_deserialize() {
        let config: FileOrchestratorConfig = toml::from_str(r#"strategy = "dialectic""#).unwrap();
        assert_eq!(config.strategy, SynthesisStrategy::Dialectic);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result: Result<FileOrchestratorConfig, _> = toml::from_str(r#"strategy = "vote""#);
        assert!(result.is_err());
    }
}
