//! Application layer for engine-council
//!
//! This crate contains the engine port, the engine registry, the
//! orchestration use cases and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorConfig;
pub use ports::{
    consultation_logger::{ConsultationEvent, ConsultationLogger, NoConsultationLogger},
    engine::{Engine, EngineError, EvaluationContext, InvocationMode},
    functional_engine::{Evaluation, FnEngine, functional_engine},
    progress::{EngineOutcome, NoProgress, ProgressNotifier},
};
pub use registry::{
    EngineQuery, EngineRegistry, EngineSnapshot, RegisteredEngine, RegistryError, RegistryStats,
    SharedRegistry,
};
pub use use_cases::consult::{ConsultOptions, ConsultationMetadata, ConsultationResult};
pub use use_cases::deliberate::{DeliberateOptions, DeliberationMetadata, DeliberationResult};
pub use use_cases::orchestrator::{Orchestrator, OrchestratorError};
pub use use_cases::{EngineFailure, FailureKind};
