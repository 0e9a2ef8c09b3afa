//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod orchestrator;
mod output;

pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::FileOutputConfig;

use council_application::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("orchestrator.timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("orchestrator.max_engines cannot be 0")]
    InvalidMaxEngines,

    #[error("orchestrator.deliberation_domain cannot be empty")]
    EmptyDeliberationDomain,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Orchestrator defaults
    pub orchestrator: FileOrchestratorConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Structured consultation log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every detected problem.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let orchestrator = &self.orchestrator;

        if orchestrator.timeout_ms == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if orchestrator.max_engines == 0 {
            issues.push(ConfigValidationError::InvalidMaxEngines);
        }
        if orchestrator.deliberation_domain.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyDeliberationDomain);
        }

        issues
    }

    /// Convert into the application's orchestrator configuration.
    ///
    /// Fails with the first validation problem.
    pub fn to_orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigValidationError> {
        if let Some(issue) = self.validate().into_iter().next() {
            return Err(issue);
        }

        let orchestrator = &self.orchestrator;
        Ok(OrchestratorConfig::default()
            .with_default_strategy(orchestrator.strategy)
            .with_default_timeout(Duration::from_millis(orchestrator.timeout_ms))
            .with_max_engines(orchestrator.max_engines)
            .with_deliberation_domain(orchestrator.deliberation_domain.trim()))
    }

    /// Render as TOML (used to print the effective configuration)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
