//! Orchestrator configuration: defaults applied when a consultation does
//! not override them.

use council_domain::{DELIBERATION_DOMAIN, SynthesisStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-engine time budget
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default cap on the number of engines consulted at once
pub const DEFAULT_MAX_ENGINES: usize = 10;

/// Static parameters of an [`Orchestrator`](crate::use_cases::orchestrator::Orchestrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Strategy used when a consultation names none
    pub default_strategy: SynthesisStrategy,
    /// Per-engine timeout used when a consultation names none
    pub default_timeout: Duration,
    /// Engine cap used when a consultation names none
    pub max_engines: usize,
    /// Domain whose engines take part in deliberation
    pub deliberation_domain: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_strategy: SynthesisStrategy::default(),
            default_timeout: DEFAULT_ENGINE_TIMEOUT,
            max_engines: DEFAULT_MAX_ENGINES,
            deliberation_domain: DELIBERATION_DOMAIN.to_string(),
        }
    }
}

impl OrchestratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_strategy(mut self, strategy: SynthesisStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_max_engines(mut self, max: usize) -> Self {
        self.max_engines = max;
        self
    }

    pub fn with_deliberation_domain(mut self, domain: impl Into<String>) -> Self {
        self.deliberation_domain = domain.into();
        self
    }
}
