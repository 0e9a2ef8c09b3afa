//! Built-in engine catalogue
//!
//! A small set of deterministic, keyword-driven engines so the CLI has
//! something to consult out of the box. Ethics traditions are built from
//! callbacks with [`functional_engine`](council_application::functional_engine);
//! [`LogicEngine`] and [`RiskEngine`] are concrete implementations.

mod ethics;
mod logic;
mod risk;

pub use ethics::{ETHICS_TRADITIONS, Tradition, ethics_engine, ethics_engines};
pub use logic::LogicEngine;
pub use risk::RiskEngine;

use council_application::{Engine, EngineRegistry, RegistryError};
use council_domain::DomainError;
use std::sync::Arc;
use thiserror::Error;

/// Failure to assemble the built-in catalogue
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("invalid built-in engine: {0}")]
    Profile(#[from] DomainError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Every built-in engine, in registration order
pub fn builtin_engines() -> Result<Vec<Arc<dyn Engine>>, BuiltinError> {
    let mut engines = ethics_engines()?;
    engines.push(Arc::new(LogicEngine::new()?));
    engines.push(Arc::new(RiskEngine::new()?));
    Ok(engines)
}

/// Register every built-in engine into `registry`
pub fn register_builtins(registry: &mut EngineRegistry) -> Result<(), BuiltinError> {
    for engine in builtin_engines()? {
        registry.register(engine)?;
    }
    Ok(())
}

/// Cues from `cues` found in `text` (case-insensitive, whole-text substring)
pub(crate) fn matched_cues<'c>(text: &str, cues: &[&'c str]) -> Vec<&'c str> {
    let lowered = text.to_lowercase();
    cues.iter()
        .copied()
        .filter(|cue| lowered.contains(cue))
        .collect()
}
