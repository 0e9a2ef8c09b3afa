//! Application-level configuration.
//!
//! - [`OrchestratorConfig`]: default strategy, per-engine timeout, engine
//!   cap and deliberation domain

pub mod orchestrator_config;

pub use orchestrator_config::{DEFAULT_ENGINE_TIMEOUT, DEFAULT_MAX_ENGINES, OrchestratorConfig};
