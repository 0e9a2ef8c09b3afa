//! Engine domain: identity, status, statistics and output of a capability provider.
//!
//! An engine is a unit of pluggable expertise. The domain layer only knows
//! its data; the evaluation contract itself is an application port.

pub mod insight;
pub mod profile;
pub mod stats;
pub mod status;

pub use insight::Insight;
pub use profile::{EngineProfile, EngineProfileBuilder, EngineProfileRecord};
pub use stats::EngineStats;
pub use status::EngineStatus;
