//! Use cases for the application layer

pub mod consult;
pub mod deliberate;
pub(crate) mod dispatch;
pub mod orchestrator;

pub use dispatch::{EngineFailure, FailureKind};
