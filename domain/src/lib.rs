//! Domain layer for engine-council
//!
//! This crate contains the core data of the council: engine profiles,
//! insights, the confidence ceiling and the synthesis strategies. It has no
//! dependencies on runtime, infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Engine
//!
//! A unit of pluggable expertise identified by an [`EngineProfile`]: id,
//! domain and subdomains, capability tags, and declared dependencies.
//!
//! ## Insight
//!
//! The immutable output of one engine invocation. Its [`Confidence`] can
//! never exceed [`CONFIDENCE_CEILING`] (≈ 0.618).
//!
//! ## Synthesis
//!
//! A [`SynthesisStrategy`] reduces the surviving insights of a consultation
//! to one combined insight.

pub mod config;
pub mod core;
pub mod deliberation;
pub mod engine;
pub mod synthesis;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    confidence::{CONFIDENCE_CEILING, Confidence, UNRESOLVED_CONFIDENCE},
    error::DomainError,
};
pub use deliberation::{DELIBERATION_DOMAIN, Position, Tension, find_tensions};
pub use engine::{
    EngineProfile, EngineProfileBuilder, EngineProfileRecord, EngineStats, EngineStatus, Insight,
};
pub use synthesis::{SynthesisStrategy, dialectic_pair, synthesize};
