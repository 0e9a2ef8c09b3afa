//! Infrastructure layer for engine-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the JSONL
//! consultation log and the built-in engine catalogue.

pub mod config;
pub mod engines;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOrchestratorConfig,
    FileOutputConfig,
};
pub use engines::{BuiltinError, LogicEngine, RiskEngine, builtin_engines, register_builtins};
pub use logging::JsonlConsultationLogger;
