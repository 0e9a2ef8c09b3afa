//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that engines and infrastructure adapters
//! must implement.

pub mod consultation_logger;
pub mod engine;
pub mod functional_engine;
pub mod progress;
